//! Provider module: where metric values come from.
//!
//! The renderer never reads the system itself. It asks a [`Providers`]
//! implementation for plain snapshot structs and caches what it converted.
//!
//! - [`FixedProviders`]: a fixed snapshot, counting every query
//! - [`SystemProviders`]: live values from `sysinfo` and the environment
//!
//! Fields that may be missing on a platform are `Option`; a `None` makes the
//! line that references it disappear from the output.

mod fixed;
mod system;

pub use fixed::FixedProviders;
pub use system::SystemProviders;

use crate::config::DiskVolumeTypes;

/// Operating system identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsInfo {
    /// Pretty distribution name (`Arch Linux`).
    pub name: String,
    /// Distribution id (`arch`).
    pub name_id: String,
    /// Version id (`24.04`).
    pub version_id: Option<String>,
    /// Version codename (`noble`).
    pub version_codename: Option<String>,
    /// Kernel name (`Linux`).
    pub kernel_name: String,
    /// Kernel release.
    pub kernel_version: String,
    /// Host name.
    pub hostname: String,
    /// Seconds since boot.
    pub uptime_secs: u64,
    /// Installed package summary.
    pub packages: Option<String>,
    /// Init system name.
    pub initsys_name: Option<String>,
    /// Init system version.
    pub initsys_version: Option<String>,
}

/// Machine identity, exposed as the `system` module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    /// Board or product vendor.
    pub vendor: String,
    /// Product name.
    pub name: String,
    /// Product version.
    pub version: String,
    /// CPU architecture (`x86_64`).
    pub arch: String,
}

/// The current user session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    /// Login name.
    pub name: String,
    /// Full shell path.
    pub shell_path: Option<String>,
    /// Shell name.
    pub shell_name: Option<String>,
    /// Shell version.
    pub shell_version: Option<String>,
    /// Desktop environment.
    pub de_name: Option<String>,
    /// Desktop environment version.
    pub de_version: Option<String>,
    /// Window manager.
    pub wm_name: Option<String>,
    /// Window manager version.
    pub wm_version: Option<String>,
    /// Terminal emulator.
    pub terminal_name: Option<String>,
    /// Terminal emulator version.
    pub terminal_version: Option<String>,
}

/// Processor summary. Frequencies are in GHz.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuInfo {
    /// Model name.
    pub name: String,
    /// Online logical processors.
    pub nproc: u64,
    /// Current frequency.
    pub freq_cur: f64,
    /// Maximum frequency.
    pub freq_max: f64,
    /// Minimum frequency.
    pub freq_min: f64,
    /// Firmware frequency limit.
    pub freq_bios_limit: f64,
    /// Package temperature in Celsius.
    pub temp_celsius: Option<f64>,
}

/// One graphics adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuInfo {
    /// Device name.
    pub name: String,
    /// Short vendor name (`AMD`).
    pub vendor: String,
    /// Full vendor name.
    pub vendor_long: String,
}

/// RAM or swap usage in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Capacity.
    pub total: u64,
    /// In use.
    pub used: u64,
    /// Available.
    pub free: u64,
}

/// A mounted volume. Sizes are in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskInfo {
    /// Mount point.
    pub mountdir: String,
    /// Backing device.
    pub device: String,
    /// Filesystem type (`ext4`).
    pub fs_type: String,
    /// Capacity.
    pub total: u64,
    /// Available.
    pub free: u64,
    /// In use.
    pub used: u64,
    /// Volume classes.
    pub types: DiskVolumeTypes,
}

/// Battery state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryInfo {
    /// Charge percentage (0-100).
    pub percentage: f64,
    /// Charging status (`Discharging`).
    pub status: String,
    /// Cell technology (`Li-ion`).
    pub technology: String,
    /// Manufacturer.
    pub vendor: String,
    /// Model name.
    pub name: String,
    /// Temperature in Celsius.
    pub temp_celsius: Option<f64>,
}

/// Cursor theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeInfo {
    /// Cursor theme name.
    pub cursor: Option<String>,
    /// Cursor size.
    pub cursor_size: Option<String>,
}

/// GTK theme for one toolkit version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GtkThemeInfo {
    /// Theme name.
    pub name: Option<String>,
    /// Icon theme.
    pub icons: Option<String>,
    /// Font.
    pub font: Option<String>,
}

/// Source of every metric the template language can reference.
///
/// Implementations may cache their own lookups; [`Providers::clear_cache`] is
/// called at the start of every render.
pub trait Providers {
    /// Operating system identity.
    fn os(&mut self) -> OsInfo;
    /// Machine identity.
    fn host(&mut self) -> HostInfo;
    /// Current user session.
    fn user(&mut self) -> UserInfo;
    /// Processor.
    fn cpu(&mut self) -> CpuInfo;
    /// Graphics adapter by index, `None` if there is no such adapter.
    fn gpu(&mut self, index: u16) -> Option<GpuInfo>;
    /// Physical memory.
    fn ram(&mut self) -> MemoryInfo;
    /// Swap space.
    fn swap(&mut self) -> MemoryInfo;
    /// The volume mounted at `path`, `None` if nothing is mounted there.
    fn disk(&mut self, path: &str) -> Option<DiskInfo>;
    /// Every mounted volume.
    fn volumes(&mut self) -> Vec<DiskInfo>;
    /// Battery, `None` on machines without one.
    fn battery(&mut self) -> Option<BatteryInfo>;
    /// Cursor theme.
    fn theme(&mut self) -> ThemeInfo;
    /// GTK theme for toolkit `version`.
    fn gtk_theme(&mut self, version: u8) -> GtkThemeInfo;
    /// Drop cached lookups so the next query reads fresh values.
    fn clear_cache(&mut self);
}
