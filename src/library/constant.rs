use std::sync::LazyLock;

pub static VERSION: LazyLock<String> = LazyLock::new(|| env!("CARGO_PKG_VERSION").to_string());

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_AVAILABILITY_ZONE: &str = "us-west-2b";
pub const DEFAULT_KEYWORD: &str = "backup";
pub const DEFAULT_DEVICE: &str = "/dev/sdf";
pub const DEFAULT_MOUNT_POINT: &str = "/mnt";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 120;
