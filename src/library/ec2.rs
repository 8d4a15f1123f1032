use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::{Client, types::Filter, types::VolumeState};
use chrono::{DateTime, Utc};

use crate::library::{
    provision::{VolumeOps, VolumeStatus},
    snapshot::SnapshotRecord,
};

pub async fn load_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

fn region_client(config: &SdkConfig, region: &str) -> Client {
    let config = aws_sdk_ec2::config::Builder::from(config)
        .region(Region::new(region.to_string()))
        .build();

    Client::from_conf(config)
}

pub async fn fetch_regions(client: &Client) -> anyhow::Result<Vec<String>> {
    let response = client
        .describe_regions()
        .send()
        .await
        .context("failed to enumerate regions")?;

    Ok(response
        .regions()
        .iter()
        .filter_map(|region| region.region_name().map(str::to_string))
        .collect())
}

/// Lists completed, unencrypted snapshots in every given region, in region
/// order. Both filters are applied server-side; pagination is exhausted.
pub async fn fetch_snapshots(
    config: &SdkConfig,
    regions: &[String],
) -> anyhow::Result<Vec<SnapshotRecord>> {
    let mut snapshots = Vec::new();

    for region in regions {
        let client = region_client(config, region);

        let mut pages = client
            .describe_snapshots()
            .filters(Filter::builder().name("status").values("completed").build())
            .filters(Filter::builder().name("encrypted").values("false").build())
            .into_paginator()
            .items()
            .send();

        while let Some(snapshot) = pages.next().await {
            let snapshot =
                snapshot.with_context(|| format!("failed to list snapshots in {region}"))?;

            snapshots.push(to_record(snapshot, region));
        }

        log::debug!("{region}: {} snapshots so far", snapshots.len());
    }

    Ok(snapshots)
}

fn to_record(snapshot: aws_sdk_ec2::types::Snapshot, region: &str) -> SnapshotRecord {
    SnapshotRecord {
        id: snapshot.snapshot_id().unwrap_or_default().to_string(),
        description: snapshot.description().unwrap_or_default().to_string(),
        size_gib: snapshot.volume_size().unwrap_or(0),
        start_time: snapshot
            .start_time()
            .and_then(|time| DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos())),
        region: region.to_string(),
    }
}

/// Volume provisioning against the real EC2 API, scoped to the client's
/// configured region.
pub struct Ec2Volumes {
    client: Client,
}

impl Ec2Volumes {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VolumeOps for Ec2Volumes {
    async fn create_volume(
        &self,
        snapshot_id: &str,
        availability_zone: &str,
    ) -> anyhow::Result<String> {
        let response = self
            .client
            .create_volume()
            .availability_zone(availability_zone)
            .snapshot_id(snapshot_id)
            .send()
            .await?;

        response
            .volume_id()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("create-volume returned no volume id"))
    }

    async fn volume_status(&self, volume_id: &str) -> anyhow::Result<VolumeStatus> {
        let response = self
            .client
            .describe_volumes()
            .volume_ids(volume_id)
            .send()
            .await?;

        let state = response
            .volumes()
            .first()
            .and_then(|volume| volume.state())
            .ok_or_else(|| anyhow!("volume {volume_id} not found"))?;

        Ok(match state {
            VolumeState::Available => VolumeStatus::Available,
            VolumeState::Creating => VolumeStatus::Creating,
            VolumeState::Error => VolumeStatus::Error,
            other => VolumeStatus::Other(other.as_str().to_string()),
        })
    }

    async fn attach_volume(
        &self,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> anyhow::Result<()> {
        self.client
            .attach_volume()
            .instance_id(instance_id)
            .volume_id(volume_id)
            .device(device)
            .send()
            .await?;

        Ok(())
    }

    async fn delete_volume(&self, volume_id: &str) -> anyhow::Result<()> {
        self.client
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await?;

        Ok(())
    }
}
