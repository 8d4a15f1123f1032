use anyhow::Context;
use tokio::process::Command;

use crate::library::config::Config;

/// Mounts the first partition of the attached device on the instance by
/// running the configured SSH command with a trailing mount command. A failed
/// mount is logged but does not stop the run; the operator can still inspect
/// the instance in the interactive session.
pub async fn mount_volume(config: &Config) -> anyhow::Result<()> {
    let mount = format!(
        "sudo mount {} {}",
        config.partition_device(),
        config.mount_point
    );
    let command_line = format!("{} '{}'", config.ssh_command, mount);

    log::debug!("running: {command_line}");

    let status = Command::new("sh")
        .arg("-c")
        .arg(&command_line)
        .status()
        .await
        .context("failed to run the SSH client for the mount step")?;

    if !status.success() {
        log::warn!("mount command exited with {status}, the volume may not be mounted");
    }

    Ok(())
}

/// Opens an interactive SSH session on the instance, inheriting the terminal,
/// and blocks until the operator exits it.
pub async fn open_session(config: &Config) -> anyhow::Result<()> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(&config.ssh_command)
        .status()
        .await
        .context("failed to run the SSH client for the interactive session")?;

    log::info!("SSH session ended with {status}");

    Ok(())
}
