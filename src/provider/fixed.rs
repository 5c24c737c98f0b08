//! `FixedProviders`: a canned snapshot.
//!
//! Useful for hosts that gather metrics elsewhere and for tests, which can
//! check how often each query ran.

use super::{
    BatteryInfo, CpuInfo, DiskInfo, GpuInfo, GtkThemeInfo, HostInfo, MemoryInfo, OsInfo,
    Providers, ThemeInfo, UserInfo,
};
use std::collections::HashMap;

/// Providers answering from fixed data.
#[derive(Debug, Clone, Default)]
pub struct FixedProviders {
    /// Returned by `os()`.
    pub os: OsInfo,
    /// Returned by `host()`.
    pub host: HostInfo,
    /// Returned by `user()`.
    pub user: UserInfo,
    /// Returned by `cpu()`.
    pub cpu: CpuInfo,
    /// Indexed by `gpu(index)`.
    pub gpus: Vec<GpuInfo>,
    /// Returned by `ram()`.
    pub ram: MemoryInfo,
    /// Returned by `swap()`.
    pub swap: MemoryInfo,
    /// Searched by mount point in `disk(path)`, listed by `volumes()`.
    pub disks: Vec<DiskInfo>,
    /// Returned by `battery()`.
    pub battery: Option<BatteryInfo>,
    /// Returned by `theme()`.
    pub theme: ThemeInfo,
    /// Returned by `gtk_theme(_)` for every version.
    pub gtk_theme: GtkThemeInfo,
    queries: HashMap<&'static str, usize>,
    clears: usize,
}

impl FixedProviders {
    /// Create providers with every field defaulted.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the named query (`"cpu"`, `"disk"`...) ran.
    pub fn query_count(&self, query: &str) -> usize {
        self.queries.get(query).copied().unwrap_or(0)
    }

    /// Total queries across every kind.
    pub fn total_queries(&self) -> usize {
        self.queries.values().sum()
    }

    /// How many times `clear_cache` ran.
    pub const fn clear_count(&self) -> usize {
        self.clears
    }

    fn record(&mut self, query: &'static str) {
        *self.queries.entry(query).or_insert(0) += 1;
    }
}

impl Providers for FixedProviders {
    fn os(&mut self) -> OsInfo {
        self.record("os");
        self.os.clone()
    }

    fn host(&mut self) -> HostInfo {
        self.record("host");
        self.host.clone()
    }

    fn user(&mut self) -> UserInfo {
        self.record("user");
        self.user.clone()
    }

    fn cpu(&mut self) -> CpuInfo {
        self.record("cpu");
        self.cpu.clone()
    }

    fn gpu(&mut self, index: u16) -> Option<GpuInfo> {
        self.record("gpu");
        self.gpus.get(usize::from(index)).cloned()
    }

    fn ram(&mut self) -> MemoryInfo {
        self.record("ram");
        self.ram
    }

    fn swap(&mut self) -> MemoryInfo {
        self.record("swap");
        self.swap
    }

    fn disk(&mut self, path: &str) -> Option<DiskInfo> {
        self.record("disk");
        self.disks.iter().find(|d| d.mountdir == path).cloned()
    }

    fn volumes(&mut self) -> Vec<DiskInfo> {
        self.record("volumes");
        self.disks.clone()
    }

    fn battery(&mut self) -> Option<BatteryInfo> {
        self.record("battery");
        self.battery.clone()
    }

    fn theme(&mut self) -> ThemeInfo {
        self.record("theme");
        self.theme.clone()
    }

    fn gtk_theme(&mut self, _version: u8) -> GtkThemeInfo {
        self.record("gtk_theme");
        self.gtk_theme.clone()
    }

    fn clear_cache(&mut self) {
        self.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_queries() {
        let mut providers = FixedProviders::new();
        providers.cpu.name = "Ryzen".into();

        assert_eq!(providers.cpu().name, "Ryzen");
        providers.cpu();
        providers.ram();

        assert_eq!(providers.query_count("cpu"), 2);
        assert_eq!(providers.query_count("ram"), 1);
        assert_eq!(providers.query_count("gpu"), 0);
        assert_eq!(providers.total_queries(), 3);
    }

    #[test]
    fn test_disk_lookup_by_mount() {
        let mut providers = FixedProviders::new();
        providers.disks.push(DiskInfo {
            mountdir: "/".into(),
            ..DiskInfo::default()
        });

        assert!(providers.disk("/").is_some());
        assert!(providers.disk("/home").is_none());
        assert!(providers.gpu(0).is_none());
    }
}
