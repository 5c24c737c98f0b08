//! Per-module member tables, summaries and the built-in modules.

use super::format::{auto_divide_bytes, divide_bytes, format_uptime, percentage_of, split_uptime};
use super::{colored_percentage, escape_template, ModuleKind, MAGIC_LINE};
use crate::config::DiskVolumeTypes;
use crate::error::Result;
use crate::parse::{self, RenderContext};
use crate::provider::{DiskInfo, MemoryInfo};
use crate::text::RichText;
use crate::value::TaggedValue;
use std::collections::HashSet;

fn missing() -> TaggedValue {
    TaggedValue::from(MAGIC_LINE)
}

fn optional(value: Option<String>) -> TaggedValue {
    value.map_or_else(missing, TaggedValue::Text)
}

/// `name version`, or just `name` without a version.
fn with_version(name: Option<String>, version: Option<String>) -> TaggedValue {
    match (name, version) {
        (Some(name), Some(version)) => TaggedValue::Text(format!("{name} {version}")),
        (Some(name), None) => TaggedValue::Text(name),
        (None, _) => missing(),
    }
}

fn temperature(celsius: Option<f64>, unit: char) -> TaggedValue {
    let Some(celsius) = celsius else {
        return missing();
    };
    TaggedValue::Real(match unit {
        'F' => celsius * 9.0 / 5.0 + 32.0,
        'K' => celsius + 273.15,
        _ => celsius,
    })
}

/// Resolve a whole-module tag.
pub(super) fn summary(ctx: &mut RenderContext<'_>, kind: &ModuleKind) -> Result<TaggedValue> {
    let template = match kind {
        ModuleKind::Cpu => "$<cpu.name> ($<cpu.nproc>) @ $<cpu.freq_max> GHz".to_owned(),
        ModuleKind::Gpu(index) => {
            if ctx.providers.gpu(*index).is_none() {
                return Ok(missing());
            }
            format!("$<gpu{index}.vendor> $<gpu{index}.name>")
        }
        ModuleKind::Ram => "$<ram.used> / $<ram.total> ($<ram.used_perc>)".to_owned(),
        ModuleKind::Swap => {
            if ctx.providers.swap().total == 0 {
                return Ok(TaggedValue::from("Disabled"));
            }
            "$<swap.used> / $<swap.total> ($<swap.used_perc>)".to_owned()
        }
        ModuleKind::Disk(path) => return disk_summary(ctx, path),
        ModuleKind::Battery => {
            if ctx.providers.battery().is_none() {
                return Ok(missing());
            }
            "$<battery.perc> [$<battery.status>]".to_owned()
        }
        ModuleKind::Title => "${auto2}$<user.name>${0}@${auto2}$<os.hostname>".to_owned(),
        ModuleKind::TitleSep => return Ok(title_separator(ctx)),
        ModuleKind::Colors => palette_row(40, "   ", false),
        ModuleKind::ColorsLight => palette_row(100, "   ", false),
        ModuleKind::ColorsSymbol(symbol) => palette_row(30, symbol, true),
        ModuleKind::ColorsLightSymbol(symbol) => palette_row(90, symbol, true),
        ModuleKind::Os
        | ModuleKind::System
        | ModuleKind::User
        | ModuleKind::Theme
        | ModuleKind::GtkTheme(_)
        | ModuleKind::Auto => {
            tracing::warn!(module = ?kind, "module has no summary, name a member");
            return Ok(missing());
        }
    };
    parse::parse_nested(&template, ctx).map(TaggedValue::Rich)
}

/// Eight palette cells starting at SGR code `first`.
fn palette_row(first: u8, cell: &str, pad: bool) -> String {
    let cell = escape_template(cell);
    let mut row = String::new();
    for code in first..first + 8 {
        row.push_str("${\x1b[");
        row.push_str(&code.to_string());
        row.push_str("m}");
        if pad {
            row.push(' ');
            row.push_str(&cell);
            row.push(' ');
        } else {
            row.push_str(&cell);
        }
    }
    row.push_str("${0}");
    row
}

fn title_separator(ctx: &mut RenderContext<'_>) -> TaggedValue {
    let user = ctx.providers.user();
    let os = ctx.providers.os();
    let title = RichText::plain(format!("{}@{}", user.name, os.hostname));
    TaggedValue::Text(ctx.config.title_sep.repeat(title.glyph_count()))
}

fn disk_summary(ctx: &mut RenderContext<'_>, path: &str) -> Result<TaggedValue> {
    let Some(disk) = ctx.providers.disk(path) else {
        return Ok(missing());
    };
    let name = format!("disk({})", escape_template(path));
    let template = format!(
        "$<{name}.used> / $<{name}.total> ($<{name}.used_perc>) - $<{name}.fs>"
    );
    let mut rich = parse::parse_nested(&template, ctx)?;

    let labels = describe_types(disk.types);
    if !labels.is_empty() {
        rich.push_str(&format!(" [{labels}]"));
    }
    Ok(TaggedValue::Rich(rich))
}

/// Labels of the notable volume classes, `External, Read-only`.
fn describe_types(types: DiskVolumeTypes) -> String {
    [
        (DiskVolumeTypes::EXTERNAL, "External"),
        (DiskVolumeTypes::HIDDEN, "Hidden"),
        (DiskVolumeTypes::READ_ONLY, "Read-only"),
    ]
    .into_iter()
    .filter(|(flag, _)| types.contains(*flag))
    .map(|(_, label)| label)
    .collect::<Vec<_>>()
    .join(", ")
}

/// Resolve one member of a module.
pub(super) fn member(
    ctx: &mut RenderContext<'_>,
    kind: &ModuleKind,
    member: &str,
) -> Result<TaggedValue> {
    let value = match kind {
        ModuleKind::Os => os_member(ctx, member),
        ModuleKind::System => system_member(ctx, member),
        ModuleKind::User => user_member(ctx, member),
        ModuleKind::Cpu => cpu_member(ctx, member),
        ModuleKind::Gpu(index) => gpu_member(ctx, *index, member),
        ModuleKind::Ram => {
            let ram = ctx.providers.ram();
            memory_member(ctx, ram, member)?
        }
        ModuleKind::Swap => {
            let swap = ctx.providers.swap();
            memory_member(ctx, swap, member)?
        }
        ModuleKind::Disk(path) => disk_member(ctx, path, member)?,
        ModuleKind::Battery => battery_member(ctx, member)?,
        ModuleKind::Theme => theme_member(ctx, member),
        ModuleKind::GtkTheme(version) => gtk_member(ctx, *version, member),
        ModuleKind::Auto
        | ModuleKind::Title
        | ModuleKind::TitleSep
        | ModuleKind::Colors
        | ModuleKind::ColorsLight
        | ModuleKind::ColorsSymbol(_)
        | ModuleKind::ColorsLightSymbol(_) => return summary(ctx, kind),
    };

    Ok(value.unwrap_or_else(|| {
        tracing::warn!(module = ?kind, member, "unknown module member");
        missing()
    }))
}

type Member = Option<TaggedValue>;

fn os_member(ctx: &mut RenderContext<'_>, member: &str) -> Member {
    let os = ctx.providers.os();
    let (days, hours, mins, secs) = split_uptime(os.uptime_secs);
    let value = match member {
        "name" => TaggedValue::Text(os.name),
        "name_id" => TaggedValue::Text(os.name_id),
        "version_id" => optional(os.version_id),
        "version_codename" => optional(os.version_codename),
        "kernel" => TaggedValue::Text(format!("{} {}", os.kernel_name, os.kernel_version)),
        "kernel_name" => TaggedValue::Text(os.kernel_name),
        "kernel_version" => TaggedValue::Text(os.kernel_version),
        "hostname" => TaggedValue::Text(os.hostname),
        "pkgs" | "packages" => optional(os.packages),
        "initsys_name" => optional(os.initsys_name),
        "initsys_version" => optional(os.initsys_version),
        "uptime" => TaggedValue::Text(format_uptime(os.uptime_secs, &ctx.config.uptime)),
        "uptime_secs" => TaggedValue::Count(secs),
        "uptime_mins" => TaggedValue::Count(mins),
        "uptime_hours" => TaggedValue::Count(hours),
        "uptime_days" => TaggedValue::Count(days),
        _ => return None,
    };
    Some(value)
}

fn system_member(ctx: &mut RenderContext<'_>, member: &str) -> Member {
    let host = ctx.providers.host();
    let value = match member {
        "host" => {
            let parts = [host.vendor, host.name, host.version];
            let joined: Vec<&str> = parts
                .iter()
                .map(String::as_str)
                .filter(|part| !part.is_empty())
                .collect();
            if joined.is_empty() {
                missing()
            } else {
                TaggedValue::Text(joined.join(" "))
            }
        }
        "host_name" => TaggedValue::Text(host.name),
        "host_vendor" => TaggedValue::Text(host.vendor),
        "host_version" => TaggedValue::Text(host.version),
        "arch" => TaggedValue::Text(host.arch),
        _ => return None,
    };
    Some(value)
}

fn user_member(ctx: &mut RenderContext<'_>, member: &str) -> Member {
    let user = ctx.providers.user();
    let value = match member {
        "name" => TaggedValue::Text(user.name),
        "shell" => with_version(user.shell_name, user.shell_version),
        "shell_name" => optional(user.shell_name),
        "shell_path" => optional(user.shell_path),
        "shell_version" => optional(user.shell_version),
        "de_name" => optional(user.de_name),
        "de_version" => optional(user.de_version),
        "wm_name" => optional(user.wm_name),
        "wm_version" => optional(user.wm_version),
        "terminal" => with_version(user.terminal_name, user.terminal_version),
        "terminal_name" => optional(user.terminal_name),
        "terminal_version" => optional(user.terminal_version),
        _ => return None,
    };
    Some(value)
}

fn cpu_member(ctx: &mut RenderContext<'_>, member: &str) -> Member {
    let cpu = ctx.providers.cpu();
    let value = match member {
        "name" => TaggedValue::Text(cpu.name),
        "nproc" => TaggedValue::Count(cpu.nproc),
        "freq_cur" => TaggedValue::Real(cpu.freq_cur),
        "freq_max" => TaggedValue::Real(cpu.freq_max),
        "freq_min" => TaggedValue::Real(cpu.freq_min),
        "freq_bios_limit" => TaggedValue::Real(cpu.freq_bios_limit),
        "temp_C" => temperature(cpu.temp_celsius, 'C'),
        "temp_F" => temperature(cpu.temp_celsius, 'F'),
        "temp_K" => temperature(cpu.temp_celsius, 'K'),
        _ => return None,
    };
    Some(value)
}

fn gpu_member(ctx: &mut RenderContext<'_>, index: u16, member: &str) -> Member {
    let Some(gpu) = ctx.providers.gpu(index) else {
        return Some(missing());
    };
    let value = match member {
        "name" => TaggedValue::Text(gpu.name),
        "vendor" => TaggedValue::Text(gpu.vendor),
        "vendor_long" => TaggedValue::Text(gpu.vendor_long),
        _ => return None,
    };
    Some(value)
}

/// The members shared by `ram`, `swap` and `disk(path)`.
fn memory_member(
    ctx: &mut RenderContext<'_>,
    amounts: MemoryInfo,
    member: &str,
) -> Result<Member> {
    let si = ctx.config.use_si_byte_unit;
    let value = match member {
        "used" => TaggedValue::Text(auto_divide_bytes(amounts.used, si).to_string()),
        "free" => TaggedValue::Text(auto_divide_bytes(amounts.free, si).to_string()),
        "total" => TaggedValue::Text(auto_divide_bytes(amounts.total, si).to_string()),
        "used_perc" | "used_percentage" => TaggedValue::Rich(colored_percentage(
            ctx,
            percentage_of(amounts.used, amounts.total),
            false,
        )?),
        "free_perc" | "free_percentage" => TaggedValue::Rich(colored_percentage(
            ctx,
            percentage_of(amounts.free, amounts.total),
            true,
        )?),
        _ => {
            let Some((which, unit)) = member.split_once('-') else {
                return Ok(None);
            };
            let bytes = match which {
                "used" => amounts.used,
                "free" => amounts.free,
                "total" => amounts.total,
                _ => return Ok(None),
            };
            return Ok(divide_bytes(bytes, unit).map(TaggedValue::Real));
        }
    };
    Ok(Some(value))
}

fn disk_member(ctx: &mut RenderContext<'_>, path: &str, member: &str) -> Result<Member> {
    let Some(disk) = ctx.providers.disk(path) else {
        return Ok(Some(missing()));
    };
    let DiskInfo {
        mountdir,
        device,
        fs_type,
        total,
        free,
        used,
        types,
    } = disk;
    let value = match member {
        "fs" => TaggedValue::Text(fs_type),
        "device" => TaggedValue::Text(device),
        "mountdir" => TaggedValue::Text(mountdir),
        "types" => TaggedValue::Text(describe_types(types)),
        _ => return memory_member(ctx, MemoryInfo { total, used, free }, member),
    };
    Ok(Some(value))
}

fn battery_member(ctx: &mut RenderContext<'_>, member: &str) -> Result<Member> {
    let Some(battery) = ctx.providers.battery() else {
        return Ok(Some(missing()));
    };
    let value = match member {
        "perc" | "percentage" => {
            TaggedValue::Rich(colored_percentage(ctx, battery.percentage, true)?)
        }
        "status" => TaggedValue::Text(battery.status),
        "technology" => TaggedValue::Text(battery.technology),
        "vendor" | "manufacturer" => TaggedValue::Text(battery.vendor),
        "name" => TaggedValue::Text(battery.name),
        "temp_C" => temperature(battery.temp_celsius, 'C'),
        "temp_F" => temperature(battery.temp_celsius, 'F'),
        "temp_K" => temperature(battery.temp_celsius, 'K'),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn theme_member(ctx: &mut RenderContext<'_>, member: &str) -> Member {
    let theme = ctx.providers.theme();
    let value = match member {
        "cursor" => with_version(theme.cursor, theme.cursor_size.map(|size| format!("({size}px)"))),
        "cursor_name" => optional(theme.cursor),
        "cursor_size" => optional(theme.cursor_size),
        _ => return None,
    };
    Some(value)
}

fn gtk_member(ctx: &mut RenderContext<'_>, version: u8, member: &str) -> Member {
    let gtk = ctx.providers.gtk_theme(version);
    let value = match member {
        "name" => optional(gtk.name),
        "icons" => optional(gtk.icons),
        "font" => optional(gtk.font),
        _ => return None,
    };
    Some(value)
}

/// Resolve a member of `auto`, whose lines are spliced into the layout in
/// place of the line holding the tag. Outside the layout there is no line
/// to replace, so the tag renders empty.
pub(super) fn expanding(ctx: &mut RenderContext<'_>, member: Option<&str>) -> Result<TaggedValue> {
    if !ctx.parsing_layout {
        tracing::debug!(?member, "auto module outside the layout, ignored");
        return Ok(TaggedValue::from(""));
    }
    match member {
        Some("disk") => auto_disk(ctx),
        _ => {
            tracing::warn!(?member, "unknown auto module member");
            Ok(missing())
        }
    }
}

fn auto_disk(ctx: &mut RenderContext<'_>) -> Result<TaggedValue> {
    let config = ctx.config;
    let settings = &config.auto_disk;
    let mut seen = HashSet::new();
    let lines: Vec<String> = ctx
        .providers
        .volumes()
        .into_iter()
        .filter(|disk| settings.display_types.intersects(disk.types))
        .filter(|disk| settings.show_duplicated || seen.insert(disk.device.clone()))
        .map(|disk| expand_disk_format(&settings.format, &disk))
        .collect();

    if lines.is_empty() {
        return Ok(missing());
    }
    tracing::debug!(count = lines.len(), "expanding auto.disk");
    for line in lines {
        ctx.sep_reset_applied = false;
        let line = ctx.inject_separator_reset(&line).into_owned();
        let parsed = parse::parse_nested(&line, ctx)?;
        ctx.spliced.push(parsed);
    }
    Ok(TaggedValue::from(""))
}

/// Replace `%1`..`%8` in an auto.disk line template.
fn expand_disk_format(format: &str, disk: &DiskInfo) -> String {
    let mountdir = escape_template(&disk.mountdir);
    let member = |name: &str| format!("$<disk({mountdir}).{name}>");

    let mut line = String::with_capacity(format.len() + mountdir.len());
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        let expansion = if c == '%' {
            match chars.peek() {
                Some('1') => Some(mountdir.clone()),
                Some('2') => Some(escape_template(&disk.device)),
                Some('3') => Some(escape_template(&disk.fs_type)),
                Some('4') => Some(member("total")),
                Some('5') => Some(member("free")),
                Some('6') => Some(member("used")),
                Some('7') => Some(member("used_perc")),
                Some('8') => Some(member("free_perc")),
                _ => None,
            }
        } else {
            None
        };
        match expansion {
            Some(expansion) => {
                chars.next();
                line.push_str(&expansion);
            }
            None => line.push(c),
        }
    }
    line
}
