use clap::{Parser, ValueEnum};
use console::style;
use indoc::indoc;
use inquire::Text;

use crate::library::{
    config::Config,
    constant::{
        DEFAULT_AVAILABILITY_ZONE, DEFAULT_DEVICE, DEFAULT_KEYWORD, DEFAULT_MOUNT_POINT,
        DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_REGION, VERSION,
    },
    ec2::{self, Ec2Volumes},
    progress::create_spinner,
    provision::provision,
    shell,
    snapshot::{FilterOptions, ensure_matches, filter_snapshots, select_snapshot},
    table,
};

/// Search account-visible EBS snapshots across all regions and mount one on
/// an instance over SSH.
#[derive(Parser, Debug)]
#[command(name = "snapscout")]
#[command(version, about = "EBS Snapshot Search & Mount Tool", long_about = None)]
pub struct Cli {
    /// Region used for the initial API connection.
    #[arg(long, env = "SNAPSCOUT_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Availability zone the volume is created in. Must match the target
    /// instance's zone.
    #[arg(long, env = "SNAPSCOUT_AZ", default_value = DEFAULT_AVAILABILITY_ZONE)]
    pub availability_zone: String,

    /// Instance the volume is attached to.
    #[arg(long, env = "SNAPSCOUT_INSTANCE_ID")]
    pub instance_id: String,

    /// SSH command reaching the instance, e.g. "ssh -i key.pem ec2-user@host".
    #[arg(long, env = "SNAPSCOUT_SSH_CMD")]
    pub ssh_command: String,

    /// Keyword to look for in snapshot descriptions. Repeatable.
    #[arg(long = "keyword", default_values_t = [DEFAULT_KEYWORD.to_string()])]
    pub keywords: Vec<String>,

    /// Match keywords case-insensitively.
    #[arg(long, default_value_t = false)]
    pub ignore_case: bool,

    /// List a snapshot once even when it matches several keywords.
    #[arg(long, default_value_t = false)]
    pub dedup: bool,

    /// Device path the volume is attached at.
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Remote mount point for the first partition of the device.
    #[arg(long, default_value = DEFAULT_MOUNT_POINT)]
    pub mount_point: String,

    /// Listing format.
    #[arg(long, value_enum, default_value_t = Output::Table)]
    pub output: Output,

    /// Seconds between volume state checks.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Seconds to wait for the created volume to become available.
    #[arg(long, default_value_t = DEFAULT_POLL_TIMEOUT_SECS)]
    pub poll_timeout_secs: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Output {
    Table,
    Json,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config {
            region: self.region.clone(),
            availability_zone: self.availability_zone.clone(),
            instance_id: self.instance_id.clone(),
            ssh_command: self.ssh_command.clone(),
            device: self.device.clone(),
            mount_point: self.mount_point.clone(),
            poll_interval: std::time::Duration::from_secs(self.poll_interval_secs),
            poll_timeout: std::time::Duration::from_secs(self.poll_timeout_secs),
        }
    }
}

fn print_header() {
    let banner = indoc! {r"
                                                   __
       ___ ___  ___ ____  ___ _______  __ __ ____/ /_
      (_-</ _ \/ _ `/ _ \(_-</ __/ _ \/ // / __/ __/
     /___/_//_/\_,_/ .__/___/\__/\___/\_,_/\__/\__/
                  /_/
    "};

    println!("{}", style(banner).cyan());
    println!("snapscout v{} - search account-visible EBS snapshots", *VERSION);
    println!("Predefined snapshot filters: encrypted=false, status=completed\n");
}

pub async fn run(args: Cli) -> anyhow::Result<()> {
    print_header();

    let config = args.to_config();
    let filter_options = FilterOptions {
        ignore_case: args.ignore_case,
        dedup: args.dedup,
    };

    let shared_config = ec2::load_config(&config.region).await;
    let client = aws_sdk_ec2::Client::new(&shared_config);

    let spinner = create_spinner("Requesting snapshots...".to_string())?;
    let fetched = async {
        let regions = ec2::fetch_regions(&client).await?;
        let snapshots = ec2::fetch_snapshots(&shared_config, &regions).await?;

        Ok::<_, anyhow::Error>((regions, snapshots))
    }
    .await;
    spinner.finish_and_clear();

    let (regions, snapshots) = fetched?;

    println!(
        "{}",
        style(format!(
            "[*] Found {} snapshots across {} regions",
            snapshots.len(),
            regions.len()
        ))
        .green()
    );

    let filtered = filter_snapshots(&snapshots, &args.keywords, filter_options);

    ensure_matches(&filtered, &args.keywords)?;

    match args.output {
        Output::Table => table::print_snapshot_table(&filtered),
        Output::Json => table::print_snapshot_json(&filtered)?,
    }

    let input = Text::new("Choose a snapshot (the corresponding number):").prompt()?;
    let chosen = select_snapshot(&filtered, &input)?;

    println!(
        "{}",
        style(format!("[*] Creating a volume from {}", chosen.id)).green()
    );

    let spinner = create_spinner("Waiting for the volume to become available...".to_string())?;
    let provisioned = provision(&Ec2Volumes::new(client), &chosen.id, &config).await;
    spinner.finish_and_clear();

    let volume_id = provisioned?;

    println!(
        "{}",
        style(format!(
            "[*] Volume {volume_id} attached to {} at {}",
            config.instance_id, config.device
        ))
        .green()
    );

    println!(
        "{}",
        style(format!(
            "[*] Mounting {} at {} and opening a session",
            config.partition_device(),
            config.mount_point
        ))
        .green()
    );

    shell::mount_volume(&config).await?;
    shell::open_session(&config).await?;

    Ok(())
}
