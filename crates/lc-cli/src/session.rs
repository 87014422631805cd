//! Interactive viewer session.
//!
//! Each line on stdin is one command. Commands map one-to-one onto engine
//! operations: `load` is the file browser click, `click` the periodogram
//! click, `slider` the fine-adjustment slider, `smooth` the smoothing spin
//! box and `errors`/`smoothing` the display checkboxes. Failures are
//! printed and the session carries on.

use std::io::Write;
use std::path::{Path, PathBuf};

use lc_core::{EngineError, PhaseFoldEngine, SummaryRecord};
use lc_io::{PeriodogramSource, ViewConfig, load_dataset};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::table::{render_points, render_summary};

pub const HELP: &str = "\
commands:
  load <path>          read a light curve and compute its periodogram
  dominant             fold at the highest peak at or above frequency 0.5
  click <frequency>    fold at 1/frequency and reset the slider
  slider <n>           shift the frequency by n * 1e-4 from the clicked one
  smooth <n>           set the smoothing window
  errors on|off        show flux errors in `points`
  smoothing on|off     show the smoothed curve in `points`
  cycles 1|2           print `points` over one or two cycles
  summary              print the frequency/period table
  points               print the folded light curve
  help                 show this text
  quit                 leave the session";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Load(PathBuf),
    Dominant,
    Click(f64),
    Slider(i32),
    Smooth(usize),
    Errors(bool),
    Smoothing(bool),
    TwoCycles(bool),
    Summary,
    Points,
    Help,
    Quit,
}

fn parse_toggle(arg: Option<&str>) -> Result<bool, String> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err("expected `on` or `off`".to_string()),
    }
}

fn parse_cycles(arg: Option<&str>) -> Result<bool, String> {
    match arg {
        Some("1") => Ok(false),
        Some("2") => Ok(true),
        _ => Err("expected `1` or `2`".to_string()),
    }
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> Result<T, String> {
    let raw = arg.ok_or_else(|| format!("missing {what}"))?;
    raw.parse()
        .map_err(|_| format!("invalid {what}: {raw:?}"))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, Some(r.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };

    let cmd = match word {
        "load" => Command::Load(PathBuf::from(rest.ok_or("missing path")?)),
        "dominant" => Command::Dominant,
        "click" => Command::Click(parse_arg(rest, "frequency")?),
        "slider" => Command::Slider(parse_arg(rest, "slider value")?),
        "smooth" => Command::Smooth(parse_arg(rest, "window")?),
        "errors" => Command::Errors(parse_toggle(rest)?),
        "smoothing" => Command::Smoothing(parse_toggle(rest)?),
        "cycles" => Command::TwoCycles(parse_cycles(rest)?),
        "summary" => Command::Summary,
        "points" => Command::Points,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?} (try `help`)")),
    };
    Ok(Some(cmd))
}

/// Engine plus the display toggles and the periodogram source.
pub struct Session<P: PeriodogramSource> {
    engine: PhaseFoldEngine,
    source: P,
    file: Option<PathBuf>,
    show_errors: bool,
    show_smoothed: bool,
    two_cycles: bool,
}

impl<P: PeriodogramSource> Session<P> {
    pub fn new(source: P, view: &ViewConfig) -> Self {
        let mut engine = PhaseFoldEngine::new();
        engine.set_smooth_window(view.smooth_window);
        Self {
            engine,
            source,
            file: None,
            show_errors: view.show_errors,
            show_smoothed: view.show_smoothed,
            two_cycles: view.two_cycles,
        }
    }

    pub fn engine(&self) -> &PhaseFoldEngine {
        &self.engine
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Load a file, pick the dominant period and fold. On failure the
    /// previous data stays in place.
    pub async fn load(&mut self, path: &Path) -> Result<SummaryRecord, EngineError> {
        let (curve, periodogram) = load_dataset(path, &self.source).await?;
        self.engine.load_and_select(curve, periodogram)?;
        self.file = Some(path.to_path_buf());
        self.refold()?;
        self.engine.summary()
    }

    pub fn dominant(&mut self) -> Result<SummaryRecord, EngineError> {
        self.engine.select_dominant_period()?;
        self.refold()?;
        self.engine.summary()
    }

    pub fn click(&mut self, frequency: f64) -> Result<SummaryRecord, EngineError> {
        self.engine.set_period_from_click(frequency)?;
        self.engine.summary()
    }

    pub fn slider(&mut self, value: i32) -> Result<SummaryRecord, EngineError> {
        self.engine.adjust_period_fine(value)?;
        self.engine.summary()
    }

    /// Set the smoothing window. Refolds only once a period is selected;
    /// before that the window is stored for the next fold.
    pub fn smooth(&mut self, window: usize) -> Result<(), EngineError> {
        self.engine.set_smooth_window(window);
        if self.engine.effective_period().is_some() {
            self.refold()?;
        }
        Ok(())
    }

    fn refold(&mut self) -> Result<(), EngineError> {
        let window = self.engine.smooth_window();
        self.engine.recompute_fold(window)?;
        Ok(())
    }

    pub fn points(&self) -> Result<String, EngineError> {
        let fold = self.engine.fold().ok_or(EngineError::InsufficientData)?;
        let text = if self.two_cycles {
            render_points(&fold.two_cycles(), self.show_errors, self.show_smoothed)
        } else {
            render_points(fold, self.show_errors, self.show_smoothed)
        };
        Ok(text)
    }

    /// Run one command. Returns `false` when the session should end.
    pub async fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> std::io::Result<bool> {
        let result = match &cmd {
            Command::Load(path) => self.load(path).await.map(|s| {
                format!("loaded {}\n{}", path.display(), render_summary(&s))
            }),
            Command::Dominant => self.dominant().map(|s| render_summary(&s)),
            Command::Click(f) => self.click(*f).map(|s| render_summary(&s)),
            Command::Slider(v) => self.slider(*v).map(|s| render_summary(&s)),
            Command::Smooth(w) => self
                .smooth(*w)
                .map(|_| format!("smoothing window = {w}\n")),
            Command::Errors(on) => {
                self.show_errors = *on;
                Ok(format!("errors {}\n", if *on { "on" } else { "off" }))
            }
            Command::Smoothing(on) => {
                self.show_smoothed = *on;
                Ok(format!("smoothing {}\n", if *on { "on" } else { "off" }))
            }
            Command::TwoCycles(on) => {
                self.two_cycles = *on;
                Ok(format!("cycles {}\n", if *on { 2 } else { 1 }))
            }
            Command::Summary => self.engine.summary().map(|s| render_summary(&s)),
            Command::Points => self.points(),
            Command::Help => Ok(format!("{HELP}\n")),
            Command::Quit => return Ok(false),
        };

        match result {
            Ok(text) => write!(out, "{text}")?,
            Err(e) => {
                tracing::warn!("{cmd:?} rejected: {e}");
                writeln!(out, "error: {e}")?;
            }
        }
        out.flush()?;
        Ok(true)
    }

    /// Read commands until EOF or `quit`.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                Ok(Some(cmd)) => {
                    if !self.handle(cmd, out).await? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(msg) => {
                    writeln!(out, "error: {msg}")?;
                    out.flush()?;
                }
            }
        }
        Ok(())
    }
}
