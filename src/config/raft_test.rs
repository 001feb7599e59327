use super::ElectionConfig;
use super::RaftConfig;
use super::ReplicationConfig;
use super::SnapshotConfig;

/// # Case 1: Defaults are valid
#[test]
fn test_default_config_case1() {
    let config = RaftConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(1000, config.election.election_timeout_ms);
    assert_eq!(200, config.replication.heartbeat_interval_ms);
    assert_eq!(64, config.replication.max_entries_per_append);
}

/// # Case 2: Zero timeouts and batch sizes are rejected
#[test]
fn test_zero_values_rejected_case2() {
    let config = RaftConfig {
        election: ElectionConfig {
            election_timeout_ms: 0,
        },
        ..RaftConfig::default()
    };
    assert!(config.validate().is_err());

    let config = RaftConfig {
        replication: ReplicationConfig {
            heartbeat_interval_ms: 0,
            ..ReplicationConfig::default()
        },
        ..RaftConfig::default()
    };
    assert!(config.validate().is_err());

    let config = RaftConfig {
        replication: ReplicationConfig {
            max_entries_per_append: 0,
            ..ReplicationConfig::default()
        },
        ..RaftConfig::default()
    };
    assert!(config.validate().is_err());

    let config = RaftConfig {
        snapshot: SnapshotConfig {
            log_entries_threshold: 0,
        },
        ..RaftConfig::default()
    };
    assert!(config.validate().is_err());
}
