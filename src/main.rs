//! # Refit CLI
//!
//! Usage:
//!   refit data/Map001.json data/CommonEvents.json
//!   refit --font msgothic.ttc --font-family "MS Gothic" --font-size 24 data/*.json
//!   refit --mode collapse data/Map001.json -o collapsed.json

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use refit::config::{MeasureConfig, ReflowConfig, ReflowMode};
use refit::detect::PatternBoundary;
use refit::engine::{ReflowEngine, ReflowReport};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Reflow pre-wrapped dialogue in game data files to fit the message window.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Data files to rewrite. Files are only written when something changed.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// JSON configuration file. Flags below override its values.
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Character bound used when no font or cell width is given.
    #[arg(long)]
    max_chars: Option<usize>,

    /// Pixel bound of the message window.
    #[arg(long)]
    max_width: Option<u32>,

    /// TrueType/OpenType font (or collection) used to measure text.
    #[arg(long, value_name = "FILE", requires = "font_family")]
    font: Option<PathBuf>,

    /// Family name of the face to pick from --font.
    #[arg(long)]
    font_family: Option<String>,

    /// Font size in pixels.
    #[arg(long, default_value_t = 24)]
    font_size: u32,

    /// Measure with a fixed pixel width per display cell instead of a font.
    #[arg(long, conflicts_with = "font")]
    cell_width: Option<u32>,

    /// Write the result here instead of in place (single input only).
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Log every rewritten window.
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Merge and re-wrap to the bound.
    Reflow,
    /// Merge each message into one line for translation.
    Collapse,
}

impl From<ModeArg> for ReflowMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Reflow => ReflowMode::Reflow,
            ModeArg::Collapse => ReflowMode::Collapse,
        }
    }
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ReflowConfig> {
        let mut config = match &self.config {
            Some(path) => ReflowConfig::from_path(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => ReflowConfig::default(),
        };
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(max_chars) = self.max_chars {
            config.max_chars = max_chars;
        }
        if let Some(max_width) = self.max_width {
            config.max_width_px = max_width;
        }
        if let (Some(path), Some(family)) = (&self.font, &self.font_family) {
            config.measure = Some(MeasureConfig::Font {
                family: family.clone(),
                size_px: self.font_size,
                path: path.clone(),
            });
        } else if let Some(cell_width_px) = self.cell_width {
            config.measure = Some(MeasureConfig::Monospace { cell_width_px });
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if cli.output.is_some() && cli.files.len() > 1 {
        bail!("--output can only be used with a single input file");
    }

    let config = cli.resolve_config()?;
    let boundary = PatternBoundary::from_config(&config)?;
    // Opened once for every file, and before any file is touched.
    let measure = refit::measure::open(config.measure.as_ref())?;
    let engine = ReflowEngine::new(&config, &boundary, measure.as_deref());

    let mut total = ReflowReport::default();
    for path in &cli.files {
        let input = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let (output, report) = match refit::document::reflow_json(&input, &engine) {
            Ok(result) => result,
            Err(e) => {
                warn!(file = %path.display(), "skipping: {e}");
                continue;
            }
        };
        total.absorb(report);

        let Some(output) = output_text(&input, output, cli.output.is_some()) else {
            continue;
        };
        if cli.dry_run {
            if report.is_modified() {
                info!(
                    file = %path.display(),
                    windows = report.windows_rewritten,
                    "would fix line lengths"
                );
            }
            continue;
        }
        let target = cli.output.as_ref().unwrap_or(path);
        if report.is_modified() {
            info!(file = %target.display(), windows = report.windows_rewritten, "fixing line lengths");
        } else {
            info!(file = %target.display(), "nothing to fix, writing input unchanged");
        }
        fs::write(target, output).with_context(|| format!("writing {}", target.display()))?;
    }

    info!(
        windows = total.windows_rewritten,
        removed = total.lines_removed,
        added = total.lines_added,
        "done"
    );
    Ok(())
}

/// What to write for one input: the reflowed text, or the input itself when
/// an explicit output file was asked for and nothing changed.
fn output_text(input: &str, reflowed: Option<String>, explicit_target: bool) -> Option<String> {
    match reflowed {
        Some(text) => Some(text),
        None if explicit_target => Some(input.to_string()),
        None => None,
    }
}
