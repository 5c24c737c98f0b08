//! Fetch demo: render live system information beside an ascii art logo.
//!
//! ```text
//! cargo run --example fetch -- [--logo-only] [ART_FILE] [config.key=value ...]
//! ```
//!
//! Set `RUST_LOG=tagfetch=debug` to see what each render does.

use std::io::Write;
use tagfetch::{render, Config, SystemProviders, TerminalOutput};

const DEFAULT_ART: &str = "\
${auto}       .--.
${auto}      |o_o |
${auto}      |:_/ |
${auto}     //   \\\\ \\\\
${auto}    (|     | )
${auto}   /'\\\\_   _/`\\\\
${auto}   \\\\___)=(___/";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagfetch=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::default();
    let mut art = None;
    for arg in std::env::args().skip(1) {
        if arg == "--logo-only" {
            config.print_logo_only = true;
        } else if arg.contains('=') {
            config.apply_override(&arg)?;
        } else {
            art = Some(std::fs::read_to_string(&arg)?);
        }
    }

    let mut providers = SystemProviders::new();
    let output = render(
        &config,
        &mut providers,
        art.as_deref().unwrap_or(DEFAULT_ART),
    )?;

    for diagnostic in &output.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let mut terminal = TerminalOutput::for_stdout();
    terminal.write_render(&output);
    let mut stdout = std::io::stdout().lock();
    terminal.flush_to(&mut stdout)?;
    stdout.flush()?;

    Ok(())
}
