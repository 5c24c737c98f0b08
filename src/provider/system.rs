//! `SystemProviders`: live metrics from `sysinfo` and the process environment.
//!
//! Every lookup is cached until `clear_cache`, so a render that references a
//! field many times reads the system once.

use super::{
    BatteryInfo, CpuInfo, DiskInfo, GpuInfo, GtkThemeInfo, HostInfo, MemoryInfo, OsInfo,
    Providers, ThemeInfo, UserInfo,
};
use crate::config::DiskVolumeTypes;
use std::env;
use std::path::Path;
use sysinfo::{Components, Disks, System};

/// Mount points that are not interesting to a person looking at disk usage.
const HIDDEN_MOUNT_PREFIXES: [&str; 7] = ["/boot", "/efi", "/snap", "/run", "/sys", "/proc", "/dev"];

/// Providers backed by the running system.
///
/// GPUs and batteries are not read: lines using them are dropped. Hosts
/// that need them can wrap this type and answer those two queries.
pub struct SystemProviders {
    system: System,
    os: Option<OsInfo>,
    host: Option<HostInfo>,
    user: Option<UserInfo>,
    cpu: Option<CpuInfo>,
    ram: Option<MemoryInfo>,
    swap: Option<MemoryInfo>,
    volumes: Option<Vec<DiskInfo>>,
}

impl SystemProviders {
    /// Create providers with nothing read yet.
    pub fn new() -> Self {
        Self {
            system: System::new(),
            os: None,
            host: None,
            user: None,
            cpu: None,
            ram: None,
            swap: None,
            volumes: None,
        }
    }

    fn read_os() -> OsInfo {
        OsInfo {
            name: System::name().unwrap_or_default(),
            name_id: System::distribution_id(),
            version_id: System::os_version(),
            version_codename: None,
            kernel_name: env::consts::OS.to_owned(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            hostname: System::host_name().unwrap_or_default(),
            uptime_secs: System::uptime(),
            packages: None,
            initsys_name: None,
            initsys_version: None,
        }
    }

    fn read_host() -> HostInfo {
        let read = |name: &str| {
            std::fs::read_to_string(Path::new("/sys/devices/virtual/dmi/id").join(name))
                .map(|s| s.trim().to_owned())
                .unwrap_or_default()
        };
        HostInfo {
            vendor: read("board_vendor"),
            name: read("product_name"),
            version: read("product_version"),
            arch: System::cpu_arch().unwrap_or_else(|| env::consts::ARCH.to_owned()),
        }
    }

    fn read_user() -> UserInfo {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        let shell_path = var("SHELL");
        let shell_name = shell_path.as_deref().and_then(|path| {
            Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });
        UserInfo {
            name: var("USER").or_else(|| var("USERNAME")).unwrap_or_default(),
            shell_path,
            shell_name,
            shell_version: None,
            de_name: var("XDG_CURRENT_DESKTOP"),
            de_version: None,
            wm_name: None,
            wm_version: None,
            terminal_name: var("TERM_PROGRAM").or_else(|| var("TERM")),
            terminal_version: var("TERM_PROGRAM_VERSION"),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn read_cpu(&mut self) -> CpuInfo {
        self.system.refresh_cpu();
        let cpus = self.system.cpus();
        let mhz: Vec<u64> = cpus.iter().map(sysinfo::Cpu::frequency).collect();
        let ghz = |value: Option<&u64>| value.map_or(0.0, |mhz| *mhz as f64 / 1000.0);

        let components = Components::new_with_refreshed_list();
        let temp_celsius = components
            .list()
            .iter()
            .find(|c| {
                let label = c.label().to_lowercase();
                label.contains("package") || label.contains("tctl") || label.contains("cpu")
            })
            .map(|c| f64::from(c.temperature()));

        CpuInfo {
            name: cpus.first().map(|c| c.brand().trim().to_owned()).unwrap_or_default(),
            nproc: cpus.len() as u64,
            freq_cur: ghz(mhz.first()),
            freq_max: ghz(mhz.iter().max()),
            freq_min: ghz(mhz.iter().min()),
            freq_bios_limit: 0.0,
            temp_celsius,
        }
    }

    fn read_volumes() -> Vec<DiskInfo> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .map(|disk| {
                let mountdir = disk.mount_point().to_string_lossy().into_owned();
                let total = disk.total_space();
                let free = disk.available_space();
                let types = if HIDDEN_MOUNT_PREFIXES
                    .iter()
                    .any(|prefix| mountdir.starts_with(prefix))
                {
                    DiskVolumeTypes::HIDDEN
                } else if disk.is_removable() {
                    DiskVolumeTypes::EXTERNAL
                } else {
                    DiskVolumeTypes::REGULAR
                };
                DiskInfo {
                    device: disk.name().to_string_lossy().into_owned(),
                    fs_type: disk.file_system().to_string_lossy().into_owned(),
                    mountdir,
                    total,
                    free,
                    used: total.saturating_sub(free),
                    types,
                }
            })
            .collect()
    }
}

impl Default for SystemProviders {
    fn default() -> Self {
        Self::new()
    }
}

impl Providers for SystemProviders {
    fn os(&mut self) -> OsInfo {
        self.os.get_or_insert_with(Self::read_os).clone()
    }

    fn host(&mut self) -> HostInfo {
        self.host.get_or_insert_with(Self::read_host).clone()
    }

    fn user(&mut self) -> UserInfo {
        self.user.get_or_insert_with(Self::read_user).clone()
    }

    fn cpu(&mut self) -> CpuInfo {
        if let Some(cpu) = &self.cpu {
            return cpu.clone();
        }
        let cpu = self.read_cpu();
        self.cpu = Some(cpu.clone());
        cpu
    }

    /// Not implemented, always `None`.
    fn gpu(&mut self, _index: u16) -> Option<GpuInfo> {
        None
    }

    fn ram(&mut self) -> MemoryInfo {
        if let Some(ram) = self.ram {
            return ram;
        }
        self.system.refresh_memory();
        let ram = MemoryInfo {
            total: self.system.total_memory(),
            used: self.system.used_memory(),
            free: self.system.available_memory(),
        };
        self.ram = Some(ram);
        ram
    }

    fn swap(&mut self) -> MemoryInfo {
        if let Some(swap) = self.swap {
            return swap;
        }
        self.system.refresh_memory();
        let swap = MemoryInfo {
            total: self.system.total_swap(),
            used: self.system.used_swap(),
            free: self.system.free_swap(),
        };
        self.swap = Some(swap);
        swap
    }

    fn disk(&mut self, path: &str) -> Option<DiskInfo> {
        self.volumes().into_iter().find(|d| d.mountdir == path)
    }

    fn volumes(&mut self) -> Vec<DiskInfo> {
        self.volumes.get_or_insert_with(Self::read_volumes).clone()
    }

    /// Not implemented, always `None`.
    fn battery(&mut self) -> Option<BatteryInfo> {
        None
    }

    fn theme(&mut self) -> ThemeInfo {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        ThemeInfo {
            cursor: var("XCURSOR_THEME"),
            cursor_size: var("XCURSOR_SIZE"),
        }
    }

    fn gtk_theme(&mut self, _version: u8) -> GtkThemeInfo {
        GtkThemeInfo {
            name: env::var("GTK_THEME").ok().filter(|v| !v.is_empty()),
            icons: None,
            font: None,
        }
    }

    fn clear_cache(&mut self) {
        self.os = None;
        self.host = None;
        self.user = None;
        self.cpu = None;
        self.ram = None;
        self.swap = None;
        self.volumes = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_and_battery_unavailable() {
        let mut providers = SystemProviders::new();
        assert!(providers.gpu(0).is_none());
        assert!(providers.battery().is_none());
    }
}
