// src/system.rs

//! Default resource checks backed by `sysinfo`.
//!
//! Each check samples one resource and reports DOWN once utilization reaches
//! its threshold (90% unless configured otherwise).

use crate::config::ResourceThresholds;
use crate::error::CheckError;
use crate::health::{CheckResult, HealthCheck, HealthIndicator, Status};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sysinfo::{Disks, System};
use tokio::sync::Mutex;
use tracing::debug;

const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Default utilization (percent) at which a resource check turns DOWN.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 90.0;

/// Shared `sysinfo` handle for the resource checks.
///
/// Refreshing mutates the `System`, so it sits behind a mutex. Refreshes run
/// on the blocking pool.
#[derive(Debug, Clone)]
pub struct SystemSampler {
    system: Arc<Mutex<System>>,
}

impl SystemSampler {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }

    /// Global CPU usage in percent, measured over one sysinfo update interval.
    pub async fn cpu_percent(&self) -> Result<f64, CheckError> {
        let system = Arc::clone(&self.system);
        tokio::task::spawn_blocking(move || system.blocking_lock().refresh_cpu_usage()).await?;

        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

        let system = Arc::clone(&self.system);
        let usage = tokio::task::spawn_blocking(move || {
            let mut sys = system.blocking_lock();
            sys.refresh_cpu_usage();
            sys.global_cpu_usage()
        })
        .await?;

        Ok(round1(f64::from(usage).clamp(0.0, 100.0)))
    }

    /// Memory utilization in percent and available memory in MB.
    pub async fn memory(&self) -> Result<(f64, u64), CheckError> {
        let system = Arc::clone(&self.system);
        let (total, available) = tokio::task::spawn_blocking(move || {
            let mut sys = system.blocking_lock();
            sys.refresh_memory();
            (sys.total_memory(), sys.available_memory())
        })
        .await?;

        let used = total.saturating_sub(available);
        Ok((round1(usage_percent(used, total)), available / BYTES_PER_MB))
    }

    /// Disk utilization in percent and free space in GB for `mount_point`.
    ///
    /// Falls back to the largest disk when nothing is mounted there.
    pub async fn disk(&self, mount_point: &Path) -> Result<(f64, u64), CheckError> {
        let mount_point = mount_point.to_path_buf();
        let usage = tokio::task::spawn_blocking(move || {
            let disks = Disks::new_with_refreshed_list();
            disks
                .iter()
                .find(|disk| disk.mount_point() == mount_point.as_path())
                .or_else(|| disks.iter().max_by_key(|disk| disk.total_space()))
                .map(|disk| (disk.total_space(), disk.available_space()))
        })
        .await?;

        let (total, available) =
            usage.ok_or_else(|| CheckError::failed("no disks visible to the process"))?;
        let used = total.saturating_sub(available);
        Ok((round1(usage_percent(used, total)), available / BYTES_PER_GB))
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// `used / total` as a percentage; zero when `total` is zero.
pub fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// DOWN once `percent` reaches `threshold`.
pub fn threshold_status(percent: f64, threshold: f64) -> Status {
    if percent >= threshold {
        Status::Down
    } else {
        Status::Up
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct CpuCheck {
    sampler: SystemSampler,
    threshold: f64,
}

impl CpuCheck {
    pub fn new(sampler: SystemSampler, threshold: f64) -> Self {
        Self { sampler, threshold }
    }
}

#[async_trait]
impl HealthIndicator for CpuCheck {
    async fn check(&self) -> Result<CheckResult, CheckError> {
        let cpu_percent = self.sampler.cpu_percent().await?;
        debug!(cpu_percent, threshold = self.threshold, "Sampled CPU usage");

        Ok(CheckResult::new(threshold_status(cpu_percent, self.threshold))
            .with_detail("cpu_percent", cpu_percent))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCheck {
    sampler: SystemSampler,
    threshold: f64,
}

impl MemoryCheck {
    pub fn new(sampler: SystemSampler, threshold: f64) -> Self {
        Self { sampler, threshold }
    }
}

#[async_trait]
impl HealthIndicator for MemoryCheck {
    async fn check(&self) -> Result<CheckResult, CheckError> {
        let (memory_percent, memory_available_mb) = self.sampler.memory().await?;
        debug!(memory_percent, memory_available_mb, "Sampled memory usage");

        Ok(CheckResult::new(threshold_status(memory_percent, self.threshold))
            .with_detail("memory_percent", memory_percent)
            .with_detail("memory_available_mb", memory_available_mb))
    }
}

#[derive(Debug, Clone)]
pub struct DiskCheck {
    sampler: SystemSampler,
    threshold: f64,
    mount_point: PathBuf,
}

impl DiskCheck {
    pub fn new(sampler: SystemSampler, threshold: f64, mount_point: impl Into<PathBuf>) -> Self {
        Self {
            sampler,
            threshold,
            mount_point: mount_point.into(),
        }
    }
}

#[async_trait]
impl HealthIndicator for DiskCheck {
    async fn check(&self) -> Result<CheckResult, CheckError> {
        let (disk_percent, disk_free_gb) = self.sampler.disk(&self.mount_point).await?;
        debug!(disk_percent, disk_free_gb, mount_point = %self.mount_point.display(), "Sampled disk usage");

        Ok(CheckResult::new(threshold_status(disk_percent, self.threshold))
            .with_detail("disk_percent", disk_percent)
            .with_detail("disk_free_gb", disk_free_gb))
    }
}

/// Built-in checks selectable by short name from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinCheck {
    Cpu,
    Memory,
    Disk,
}

impl BuiltinCheck {
    /// Name the check is reported under.
    pub fn check_name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu_health",
            Self::Memory => "memory_health",
            Self::Disk => "disk_health",
        }
    }

    pub fn build(self, sampler: &SystemSampler, thresholds: &ResourceThresholds) -> HealthCheck {
        let sampler = sampler.clone();
        match self {
            Self::Cpu => HealthCheck::new(self.check_name(), CpuCheck::new(sampler, thresholds.cpu_percent)),
            Self::Memory => {
                HealthCheck::new(self.check_name(), MemoryCheck::new(sampler, thresholds.memory_percent))
            }
            Self::Disk => HealthCheck::new(
                self.check_name(),
                DiskCheck::new(sampler, thresholds.disk_percent, thresholds.disk_mount_point.clone()),
            ),
        }
    }
}
