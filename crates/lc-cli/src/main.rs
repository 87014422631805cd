mod session;
mod table;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lc_io::{Config, ExternalTool, list_entries};
use serde::Serialize;

use crate::session::Session;
use crate::table::{render_points, render_summary};

#[derive(Parser)]
#[command(
    name = "lcview",
    about = "Light-curve viewer: DFT periodogram, phase folding and period refinement"
)]
struct Cli {
    /// Config file (default: $LCVIEW_CONFIG, then ./lcview.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List data files and directories
    Browse {
        /// Directory to list (default: current directory)
        dir: Option<PathBuf>,
    },

    /// Compute the periodogram and report the dominant peak
    Periodogram {
        /// Light-curve file (time, flux, [error])
        file: PathBuf,
    },

    /// Fold a light curve and print the frequency/period table
    Fold {
        /// Light-curve file (time, flux, [error])
        file: PathBuf,

        /// Fold at this frequency instead of the dominant peak
        #[arg(long, conflicts_with = "period")]
        frequency: Option<f64>,

        /// Fold at this period instead of the dominant peak
        #[arg(long)]
        period: Option<f64>,

        /// Fine adjustment in steps of 1e-4 frequency units
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        slider: i32,

        /// Smoothing window (default from config)
        #[arg(long)]
        smooth: Option<usize>,

        /// Also print the folded points
        #[arg(long)]
        points: bool,

        /// Print the folded points over two cycles (phase 0 to 2)
        #[arg(long)]
        two_cycles: bool,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    Session,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(cli.config.as_deref()).context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Browse { dir } => cmd_browse(&cli, dir.as_deref()),
        Commands::Periodogram { file } => cmd_periodogram(&cli, file).await,
        Commands::Fold {
            file,
            frequency,
            period,
            slider,
            smooth,
            points,
            two_cycles,
            json,
        } => {
            let frequency = match (frequency, period) {
                (Some(f), _) => Some(*f),
                (None, Some(p)) => Some(1.0 / p),
                (None, None) => None,
            };
            let opts = FoldOptions {
                frequency,
                slider: *slider,
                smooth: *smooth,
                points: *points,
                two_cycles: *two_cycles,
                json: *json,
            };
            cmd_fold(&cli, file, &opts).await
        }
        Commands::Session => cmd_session(&cli).await,
    }
}

fn cmd_browse(cli: &Cli, dir: Option<&Path>) -> Result<()> {
    let config = load_config(cli)?;
    let dir = dir.unwrap_or(Path::new("."));
    let entries = list_entries(dir, &config.browse.extensions)
        .with_context(|| format!("failed to list {}", dir.display()))?;

    for entry in &entries {
        if entry.is_dir {
            println!("{}/", entry.name());
        } else {
            println!("{}", entry.name());
        }
    }
    Ok(())
}

async fn cmd_periodogram(cli: &Cli, file: &Path) -> Result<()> {
    let config = load_config(cli)?;
    let mut session = Session::new(ExternalTool::new(&config.tool), &config.view);
    session
        .load(file)
        .await
        .with_context(|| format!("failed to load {}", file.display()))?;

    let engine = session.engine();
    let (Some(period), Some(amplitude)) = (engine.reference_period(), engine.peak_amplitude())
    else {
        anyhow::bail!("no dominant peak found");
    };
    let samples = engine.periodogram().map_or(0, |p| p.len());
    if let Some(path) = session.file() {
        println!("file:       {}", path.display());
    }
    println!("samples:    {samples}");
    println!("frequency:  {:.5}", 1.0 / period);
    println!("period:     {period:.5}");
    println!("amplitude:  {amplitude:.5}");
    Ok(())
}

struct FoldOptions {
    frequency: Option<f64>,
    slider: i32,
    smooth: Option<usize>,
    points: bool,
    two_cycles: bool,
    json: bool,
}

#[derive(Serialize)]
struct FoldReport<'a> {
    file: &'a Path,
    frequency: f64,
    period: f64,
    reference_period: Option<f64>,
    slider: i32,
    smooth_window: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<Vec<FoldPoint>>,
}

#[derive(Serialize)]
struct FoldPoint {
    phase: f64,
    flux: f64,
    error: f64,
    smoothed: f64,
}

async fn cmd_fold(cli: &Cli, file: &Path, opts: &FoldOptions) -> Result<()> {
    let config = load_config(cli)?;
    let mut session = Session::new(ExternalTool::new(&config.tool), &config.view);

    session
        .load(file)
        .await
        .with_context(|| format!("failed to load {}", file.display()))?;
    if let Some(window) = opts.smooth {
        session.smooth(window).context("failed to smooth")?;
    }
    if let Some(frequency) = opts.frequency {
        session
            .click(frequency)
            .with_context(|| format!("cannot fold at frequency {frequency}"))?;
    }
    if opts.slider != 0 {
        session
            .slider(opts.slider)
            .with_context(|| format!("cannot apply slider {}", opts.slider))?;
    }

    let engine = session.engine();
    let summary = engine.summary()?;
    let fold = engine
        .fold()
        .context("light curve was not folded")?;
    let doubled;
    let fold = if opts.two_cycles || config.view.two_cycles {
        doubled = fold.two_cycles();
        &doubled
    } else {
        fold
    };

    let mut stdout = std::io::stdout().lock();
    if opts.json {
        let points = opts.points.then(|| {
            (0..fold.len())
                .map(|i| FoldPoint {
                    phase: fold.phase[i],
                    flux: fold.folded_flux[i],
                    error: fold.folded_error[i],
                    smoothed: fold.smoothed_flux[i],
                })
                .collect()
        });
        let report = FoldReport {
            file,
            frequency: summary.frequency,
            period: summary.period,
            reference_period: engine.reference_period(),
            slider: engine.slider(),
            smooth_window: engine.smooth_window(),
            points,
        };
        serde_json::to_writer_pretty(&mut stdout, &report).context("failed to write JSON")?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", render_summary(&summary))?;
        if opts.points {
            writeln!(stdout)?;
            write!(
                stdout,
                "{}",
                render_points(fold, config.view.show_errors, config.view.show_smoothed)
            )?;
        }
    }
    Ok(())
}

async fn cmd_session(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let mut session = Session::new(ExternalTool::new(&config.tool), &config.view);
    tracing::info!("session started");

    let mut stdout = std::io::stdout();
    writeln!(stdout, "lcview session, type `help` for commands")?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session
        .run(stdin, &mut stdout)
        .await
        .context("session I/O failed")?;
    Ok(())
}
