//! Render configuration.
//!
//! [`Config`] is a plain struct with sensible defaults. Hosts fill it from
//! whatever file format they like; the only textual surface here is the
//! `name=value` syntax used by [`Config::apply_override`] and
//! [`Config::add_alias`].

use crate::error::{Error, Result};
use bitflags::bitflags;
use std::str::FromStr;

/// Where the ascii art goes relative to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoPosition {
    /// Art on the left, layout aligned in a column to its right.
    #[default]
    Left,
    /// Art lines first, then the layout.
    Top,
    /// Layout first, then the art lines.
    Bottom,
}

impl FromStr for LogoPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(Error::invalid_value("config.logo-position", s)),
        }
    }
}

bitflags! {
    /// Volume classes used by the `auto.disk` expansion.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DiskVolumeTypes: u8 {
        /// Pseudo or system mounts that are normally not interesting.
        const HIDDEN = 1 << 2;
        /// Ordinary fixed volumes.
        const REGULAR = 1 << 3;
        /// Removable or external volumes.
        const EXTERNAL = 1 << 4;
        /// Mounted read-only.
        const READ_ONLY = 1 << 5;
    }
}

impl std::fmt::Debug for DiskVolumeTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl DiskVolumeTypes {
    /// Parse a comma separated list such as `regular,removable`.
    pub fn parse_list(list: &str) -> Result<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .try_fold(Self::empty(), |acc, item| {
                let flag = match item {
                    "hidden" => Self::HIDDEN,
                    "regular" => Self::REGULAR,
                    "external" | "removable" => Self::EXTERNAL,
                    "read-only" => Self::READ_ONLY,
                    _ => return Err(Error::invalid_value("auto.disk.display-types", item)),
                };
                Ok(acc | flag)
            })
    }
}

/// The eight named colors, each a color token (`!#FF0000`, `#00ff00`...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteConfig {
    /// `black`
    pub black: String,
    /// `red`
    pub red: String,
    /// `green`
    pub green: String,
    /// `yellow`
    pub yellow: String,
    /// `blue`
    pub blue: String,
    /// `magenta`
    pub magenta: String,
    /// `cyan`
    pub cyan: String,
    /// `white`
    pub white: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            black: "!#000000".into(),
            red: "!#FF0000".into(),
            green: "!#00FF00".into(),
            yellow: "!#FFFF00".into(),
            blue: "!#0000FF".into(),
            magenta: "!#FF00FF".into(),
            cyan: "!#00FFFF".into(),
            white: "!#FFFFFF".into(),
        }
    }
}

impl PaletteConfig {
    /// Names in ANSI order (30 black .. 37 white).
    pub const NAMES: [&'static str; 8] = [
        "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
    ];

    /// Look up a color token by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "black" => &self.black,
            "red" => &self.red,
            "green" => &self.green,
            "yellow" => &self.yellow,
            "blue" => &self.blue,
            "magenta" => &self.magenta,
            "cyan" => &self.cyan,
            "white" => &self.white,
            _ => return None,
        };
        Some(value)
    }

    /// Look up a color token by ANSI index (0 = black .. 7 = white).
    pub fn by_index(&self, index: usize) -> Option<&str> {
        self.get(Self::NAMES.get(index)?)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "black" => &mut self.black,
            "red" => &mut self.red,
            "green" => &mut self.green,
            "yellow" => &mut self.yellow,
            "blue" => &mut self.blue,
            "magenta" => &mut self.magenta,
            "cyan" => &mut self.cyan,
            "white" => &mut self.white,
            _ => return None,
        };
        Some(value)
    }
}

/// Settings for the `$<auto.disk>` expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoDiskConfig {
    /// Line template. `%1` mount dir, `%2` device, `%3` filesystem,
    /// `%4` total, `%5` free, `%6` used, `%7` used percentage, `%8` free percentage.
    pub format: String,
    /// Volume classes to show.
    pub display_types: DiskVolumeTypes,
    /// Show volumes whose device was already listed.
    pub show_duplicated: bool,
}

impl Default for AutoDiskConfig {
    fn default() -> Self {
        Self {
            format: "${auto}Disk (%1): $<disk(%1)>".into(),
            display_types: DiskVolumeTypes::REGULAR | DiskVolumeTypes::EXTERNAL,
            show_duplicated: false,
        }
    }
}

/// Suffixes for the automatic uptime format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptimeConfig {
    /// After the day count.
    pub days: String,
    /// After the hour count.
    pub hours: String,
    /// After the minute count.
    pub mins: String,
    /// After the second count.
    pub secs: String,
}

impl Default for UptimeConfig {
    fn default() -> Self {
        Self {
            days: " days".into(),
            hours: " hours".into(),
            mins: " mins".into(),
            secs: " secs".into(),
        }
    }
}

/// Everything one render reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Layout templates, one per output line.
    pub layout: Vec<String>,
    /// Ascii art selector (a path, or `os` for the distro logo). Resolved by the host.
    pub source_path: String,
    /// Repeated by `$<title_sep>`.
    pub title_sep: String,
    /// Token after which (or before which) a color reset is injected in
    /// every layout line. Empty disables it.
    pub sep_reset: String,
    /// Inject the reset after the token instead of before it.
    pub sep_reset_after: bool,
    /// Where the art goes.
    pub logo_position: LogoPosition,
    /// Gap between the widest art line and the layout column.
    pub offset: usize,
    /// Spaces before every art line.
    pub logo_padding_left: usize,
    /// Empty lines before the art.
    pub logo_padding_top: usize,
    /// Empty lines before the layout.
    pub layout_padding_top: usize,
    /// Use powers of 1000 (`kB`, `MB`) instead of 1024 (`KiB`, `MiB`).
    pub use_si_byte_unit: bool,
    /// `name=value` color aliases, consulted before anything else.
    pub alias_colors: Vec<(String, String)>,
    /// Percentage colors for low, medium and high values.
    pub percentage_colors: [String; 3],
    /// Named colors.
    pub palette: PaletteConfig,
    /// `$<auto.disk>` settings.
    pub auto_disk: AutoDiskConfig,
    /// Uptime suffixes.
    pub uptime: UptimeConfig,
    /// Skip parsing and showing the ascii art.
    pub disable_source: bool,
    /// Drop every color tag.
    pub disable_colors: bool,
    /// Render only the ascii art.
    pub print_logo_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            source_path: "os".into(),
            title_sep: "-".into(),
            sep_reset: ":".into(),
            sep_reset_after: false,
            logo_position: LogoPosition::Left,
            offset: 5,
            logo_padding_left: 0,
            logo_padding_top: 0,
            layout_padding_top: 0,
            use_si_byte_unit: false,
            alias_colors: vec![("purple".into(), "magenta".into())],
            percentage_colors: ["green".into(), "yellow".into(), "red".into()],
            palette: PaletteConfig::default(),
            auto_disk: AutoDiskConfig::default(),
            uptime: UptimeConfig::default(),
            disable_source: false,
            disable_colors: false,
            print_logo_only: false,
        }
    }
}

fn default_layout() -> Vec<String> {
    [
        "$<title>",
        "$<title_sep>",
        "${auto}OS: $<os.name> $<system.arch>",
        "${auto}Host: $<system.host>",
        "${auto}Kernel: $<os.kernel>",
        "${auto}Uptime: $<os.uptime>",
        "${auto}Terminal: $<user.terminal>",
        "${auto}Shell: $<user.shell>",
        "${auto}Theme: $<theme-gtk3.name>",
        "${auto}CPU: $<cpu>",
        "${auto}GPU: $<gpu>",
        "${auto}RAM: $<ram>",
        "${auto}Swap: $<swap>",
        "$<auto.disk>",
        "${auto}Battery: $<battery>",
        "",
        "$<colors>",
        "$<colors_light>",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Register a color alias from `name=value`.
    pub fn add_alias(&mut self, entry: &str) -> Result<()> {
        let (name, value) = split_entry("alias color", entry)?;
        self.alias_colors.push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    /// Look up a color alias. The most recently added alias wins.
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.alias_colors
            .iter()
            .rev()
            .find(|(alias, _)| alias == name)
            .map(|(_, value)| value.as_str())
    }

    /// Apply a `name=value` override. Names without a dot are read as
    /// `config.<name>`.
    pub fn apply_override(&mut self, entry: &str) -> Result<()> {
        let (name, value) = split_entry("override option", entry)?;
        let name = if name.contains('.') {
            name.to_owned()
        } else {
            format!("config.{name}")
        };

        match name.as_str() {
            "config.source-path" => self.source_path = value.to_owned(),
            "config.title-sep" => self.title_sep = value.to_owned(),
            "config.sep-reset" => self.sep_reset = value.to_owned(),
            "config.sep-reset-after" => self.sep_reset_after = parse_bool(&name, value)?,
            "config.logo-position" => self.logo_position = value.parse()?,
            "config.offset" => self.offset = parse_usize(&name, value)?,
            "config.logo-padding-left" => self.logo_padding_left = parse_usize(&name, value)?,
            "config.logo-padding-top" => self.logo_padding_top = parse_usize(&name, value)?,
            "config.layout-padding-top" => self.layout_padding_top = parse_usize(&name, value)?,
            "config.use-SI-byte-unit" => self.use_si_byte_unit = parse_bool(&name, value)?,
            "config.disable-source" => self.disable_source = parse_bool(&name, value)?,
            "config.disable-colors" => self.disable_colors = parse_bool(&name, value)?,
            "config.percentage-colors" => self.percentage_colors = parse_triple(&name, value)?,

            "auto.disk.fmt" => self.auto_disk.format = value.to_owned(),
            "auto.disk.display-types" => {
                self.auto_disk.display_types = DiskVolumeTypes::parse_list(value)?;
            }
            "auto.disk.show-duplicated" => {
                self.auto_disk.show_duplicated = parse_bool(&name, value)?;
            }

            "os.uptime.days" => self.uptime.days = value.to_owned(),
            "os.uptime.hours" => self.uptime.hours = value.to_owned(),
            "os.uptime.mins" => self.uptime.mins = value.to_owned(),
            "os.uptime.secs" => self.uptime.secs = value.to_owned(),

            other => {
                let slot = other
                    .strip_prefix("palette.")
                    .and_then(|color| self.palette.get_mut(color))
                    .ok_or_else(|| Error::UnknownConfigProperty(name.clone()))?;
                *slot = value.to_owned();
            }
        }
        Ok(())
    }
}

fn split_entry<'a>(what: &'static str, entry: &'a str) -> Result<(&'a str, &'a str)> {
    entry.split_once('=').ok_or_else(|| Error::MissingSeparator {
        what,
        input: entry.to_owned(),
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_value(name, value)),
    }
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_value(name, value))
}

fn parse_triple(name: &str, value: &str) -> Result<[String; 3]> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [low, mid, high] => Ok([(*low).to_owned(), (*mid).to_owned(), (*high).to_owned()]),
        _ => Err(Error::invalid_value(name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.offset, 5);
        assert_eq!(config.sep_reset, ":");
        assert_eq!(config.logo_position, LogoPosition::Left);
        assert_eq!(config.alias("purple"), Some("magenta"));
        assert_eq!(config.palette.by_index(1), Some("!#FF0000"));
        assert_eq!(config.palette.by_index(8), None);
    }

    #[test]
    fn test_override_without_prefix() {
        let mut config = Config::default();
        config.apply_override("offset=2").unwrap();
        config.apply_override("config.logo-position=top").unwrap();
        config.apply_override("use-SI-byte-unit=true").unwrap();

        assert_eq!(config.offset, 2);
        assert_eq!(config.logo_position, LogoPosition::Top);
        assert!(config.use_si_byte_unit);
    }

    #[test]
    fn test_override_nested_tables() {
        let mut config = Config::default();
        config.apply_override("auto.disk.display-types=regular,hidden").unwrap();
        config.apply_override("os.uptime.mins=m").unwrap();
        config.apply_override("palette.red=#aa0000").unwrap();
        config.apply_override("percentage-colors=blue, cyan, magenta").unwrap();

        assert_eq!(
            config.auto_disk.display_types,
            DiskVolumeTypes::REGULAR | DiskVolumeTypes::HIDDEN
        );
        assert_eq!(config.uptime.mins, "m");
        assert_eq!(config.palette.red, "#aa0000");
        assert_eq!(config.percentage_colors[2], "magenta");
    }

    #[test]
    fn test_override_unknown_is_fatal() {
        let mut config = Config::default();
        assert_eq!(
            config.apply_override("nope=1"),
            Err(Error::UnknownConfigProperty("config.nope".into()))
        );
        assert_eq!(
            config.apply_override("palette.orange=#ff8800"),
            Err(Error::UnknownConfigProperty("palette.orange".into()))
        );
    }

    #[test]
    fn test_override_bad_value() {
        let mut config = Config::default();
        assert!(matches!(
            config.apply_override("offset=wide"),
            Err(Error::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.apply_override("sep-reset-after=maybe"),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_alias_requires_equals() {
        let mut config = Config::default();
        assert!(matches!(
            config.add_alias("orange"),
            Err(Error::MissingSeparator { .. })
        ));
        config.add_alias("orange=#ff8800").unwrap();
        config.add_alias("purple=#800080").unwrap();

        assert_eq!(config.alias("orange"), Some("#ff8800"));
        assert_eq!(config.alias("purple"), Some("#800080"));
    }
}
