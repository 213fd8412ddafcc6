//! Rankline - Entry Point
//!
//! Prints rank info for XP totals and manages tier files.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rankline::data::{export_default_tiers, load_or_default, load_tier_table};
use rankline::settings::load_settings;
use rankline::{OutputFormat, RankInfo, TierTable};

#[derive(Parser, Debug)]
#[command(author, version, about = "Show rank progression for XP totals", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,

    /// RON tier file, overriding the configured one
    #[arg(long, value_name = "PATH")]
    tiers: Option<PathBuf>,

    /// One JSON object per XP value
    #[arg(long, conflicts_with = "text")]
    json: bool,

    /// One readable line per XP value
    #[arg(long)]
    text: bool,

    /// Lifetime XP totals
    #[arg(value_name = "XP", required = true, allow_negative_numbers = true)]
    xp: Vec<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Cmd {
    /// Write the built-in tier table as RON
    ExportTiers { path: PathBuf },
    /// Validate a RON tier file
    CheckTiers { path: PathBuf },
}

impl Cli {
    fn output(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else if self.text {
            Some(OutputFormat::Text)
        } else {
            None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings();

    env_logger::Builder::new()
        .parse_filters(&settings.log_filter)
        .target(env_logger::Target::Stderr)
        .init();

    log::debug!("Starting Rankline v{} with {:?}", env!("CARGO_PKG_VERSION"), settings);

    match &cli.cmd {
        Some(Cmd::ExportTiers { path }) => {
            export_default_tiers(path).with_context(|| format!("exporting tiers to {:?}", path))?;
            println!("Wrote default tiers to {}", path.display());
        }
        Some(Cmd::CheckTiers { path }) => {
            let table = load_tier_table(path).with_context(|| format!("checking {:?}", path))?;
            println!(
                "{}: {} tiers, {} levels, max rank '{}' at {} XP",
                path.display(),
                table.len(),
                table.total_levels(),
                table.terminal().name,
                table.terminal().base_xp
            );
        }
        None => {
            let table = resolve_table(cli.tiers.as_deref(), settings.tiers_path.as_deref())?;
            let output = cli.output().unwrap_or(settings.output);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for arg in &cli.xp {
                let info = rank_for(&table, arg)?;
                writeln!(out, "{}", render(&info, arg, output)?)?;
            }
        }
    }

    Ok(())
}

/// A tier file named on the command line must load; a configured one may fall back
fn resolve_table(explicit: Option<&Path>, configured: Option<&Path>) -> Result<TierTable> {
    match explicit {
        Some(path) => load_tier_table(path).with_context(|| format!("loading tiers from {:?}", path)),
        None => Ok(load_or_default(configured)),
    }
}

fn rank_for<'a>(table: &'a TierTable, arg: &str) -> Result<RankInfo<'a>> {
    if let Ok(xp) = arg.parse::<u64>() {
        return Ok(table.rank_info(xp));
    }
    let xp: i64 = arg.parse().with_context(|| format!("'{}' is not an XP value", arg))?;
    Ok(table.rank_info_checked(xp)?)
}

fn render(info: &RankInfo<'_>, xp: &str, output: OutputFormat) -> Result<String> {
    Ok(match output {
        OutputFormat::Json => serde_json::to_string(info)?,
        OutputFormat::Text => format!(
            "{:>10}  {:<18} {:>6}/{:<6} XP  {:5.1}%",
            xp,
            info.label(),
            info.xp_in_level,
            info.xp_for_next_level,
            info.progress_percent
        ),
    })
}
