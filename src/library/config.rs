use std::time::Duration;

/// Process-wide immutable configuration, built once at startup and passed by
/// reference to every stage.
#[derive(Clone, Debug)]
pub struct Config {
    pub region: String,
    pub availability_zone: String,
    pub instance_id: String,
    pub ssh_command: String,
    pub device: String,
    pub mount_point: String,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Config {
    /// The first partition of the attached device, e.g. `/dev/sdf` -> `/dev/sdf1`.
    pub fn partition_device(&self) -> String {
        format!("{}1", self.device)
    }
}
