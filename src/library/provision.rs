use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use tokio::time::Instant;

use crate::library::config::Config;

/// Volume lifecycle state as reported by the provider, reduced to what the
/// provisioner cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VolumeStatus {
    Creating,
    Available,
    Error,
    Other(String),
}

/// The narrow slice of the EC2 API the provisioner needs. Implemented by the
/// real client in `ec2` and by a recording fake in tests.
#[async_trait]
pub trait VolumeOps {
    async fn create_volume(
        &self,
        snapshot_id: &str,
        availability_zone: &str,
    ) -> anyhow::Result<String>;

    async fn volume_status(&self, volume_id: &str) -> anyhow::Result<VolumeStatus>;

    async fn attach_volume(
        &self,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> anyhow::Result<()>;

    async fn delete_volume(&self, volume_id: &str) -> anyhow::Result<()>;
}

/// Creates a volume from the snapshot, waits for it to become available and
/// attaches it to the configured instance. Returns the volume id.
///
/// The attach call is never issued before the create call succeeded. If the
/// attach fails, the just-created volume is deleted (best effort) so a failed
/// run does not leak a volume into the account.
pub async fn provision(
    ops: &impl VolumeOps,
    snapshot_id: &str,
    config: &Config,
) -> anyhow::Result<String> {
    let volume_id = ops
        .create_volume(snapshot_id, &config.availability_zone)
        .await
        .with_context(|| format!("failed to create a volume from {snapshot_id}"))?;

    log::info!(
        "created volume {volume_id} from {snapshot_id} in {}",
        config.availability_zone
    );

    wait_until_available(ops, &volume_id, config.poll_interval, config.poll_timeout).await?;

    if let Err(attach_error) = ops
        .attach_volume(&volume_id, &config.instance_id, &config.device)
        .await
    {
        if let Err(delete_error) = ops.delete_volume(&volume_id).await {
            log::warn!("could not delete volume {volume_id} after failed attach: {delete_error:#}");
        }

        return Err(attach_error.context(format!(
            "failed to attach volume {volume_id} to {}",
            config.instance_id
        )));
    }

    Ok(volume_id)
}

/// Bounded poll loop on the volume state. Replaces a fixed pre-attach delay so
/// the attach is only issued once the provider reports the volume available.
async fn wait_until_available(
    ops: &impl VolumeOps,
    volume_id: &str,
    interval: Duration,
    timeout: Duration,
) -> anyhow::Result<()> {
    let deadline = Instant::now() + timeout;

    loop {
        let status = ops
            .volume_status(volume_id)
            .await
            .with_context(|| format!("failed to check the state of volume {volume_id}"))?;

        match status {
            VolumeStatus::Available => return Ok(()),
            VolumeStatus::Error => {
                return Err(anyhow!("volume {volume_id} entered the error state"));
            }
            status => {
                if Instant::now() >= deadline {
                    return Err(anyhow!(
                        "volume {volume_id} did not become available within {}s (last state: {status:?})",
                        timeout.as_secs()
                    ));
                }

                log::debug!("volume {volume_id} is {status:?}, waiting");
                tokio::time::sleep(interval).await;
            }
        }
    }
}
