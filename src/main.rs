mod classify;
mod cli;
mod core;
mod error;
mod http;
mod payload;
mod probe;
mod reporting;
mod scan;
mod validation;

#[cfg(test)]
mod testing;

use clap::Parser;
use cli::args::{Cli, OutputFormat};
use crate::core::context::Context;
use crate::core::engine::Engine;
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
 ╔════════════════════════════════════════════════════════════════════╗
 ║                                                                    ║
 ║   ██████╗ ██████╗  ██████╗ ██████╗ ███████╗                        ║
 ║   ██╔══██╗██╔══██╗██╔═══██╗██╔══██╗██╔════╝                        ║
 ║   ██████╔╝██████╔╝██║   ██║██████╔╝█████╗                          ║
 ║   ██╔═══╝ ██╔══██╗██║   ██║██╔══██╗██╔══╝                          ║
 ║   ██║     ██║  ██║╚██████╔╝██████╔╝███████╗                        ║
 ║   ╚═╝     ╚═╝  ╚═╝ ╚═════╝ ╚═════╝ ╚══════╝  work                  ║
 ║                                                                    ║
 ║   CRLF · LFI · SSTI · XSS · Open Redirect                          ║
 ║                                                                    ║
 ╚════════════════════════════════════════════════════════════════════╝
"#;

fn print_banner() {
    // stderr, so stdout stays clean for the report
    eprintln!("\x1b[36m{}\x1b[0m", BANNER); // Cyan color
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Show banner for normal runs unless --no-banner, --quiet or JSON output
    if !cli.no_banner && !cli.quiet && cli.format == OutputFormat::Text {
        print_banner();
    }

    init_tracing(&cli);

    let ctx = Context::from_cli(cli)?;
    let engine = Engine::new(ctx)?;
    let results = engine.run().await?;

    if results.iter().any(|r| r.cancelled) {
        std::process::exit(130);
    }

    Ok(())
}
