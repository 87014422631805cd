use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use lc_core::{EngineError, Periodogram, Result};
use tokio::process::Command;

use crate::config::ToolConfig;
use crate::reader::read_periodogram;

/// Anything that can turn a light-curve file into a periodogram.
///
/// The engine only ever sees the resulting frequency/amplitude pair, so an
/// in-process transform can replace the external tool behind this trait.
pub trait PeriodogramSource {
    fn periodogram(&self, light_curve: &Path) -> impl Future<Output = Result<Periodogram>> + Send;
}

/// The DFT shell script, run as a blocking subprocess with a deadline.
///
/// Invocation: `bash <script> <light curve> <start> <count> <script dir>/`
/// inside `workdir`; the script writes `output` there.
#[derive(Clone, Debug)]
pub struct ExternalTool {
    script: PathBuf,
    workdir: PathBuf,
    start: u32,
    count: u32,
    output: String,
    timeout: Duration,
}

impl ExternalTool {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            script: config.script.clone(),
            workdir: config.workdir.clone(),
            start: config.start,
            count: config.count,
            output: config.output.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.workdir.join(&self.output)
    }

    /// Directory argument handed to the script, with a trailing separator
    /// so scripts can prefix it straight onto helper names.
    fn script_dir(&self) -> String {
        let dir = self
            .script
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        let mut s = dir.to_string_lossy().into_owned();
        if !s.ends_with(std::path::MAIN_SEPARATOR) {
            s.push(std::path::MAIN_SEPARATOR);
        }
        s
    }

    async fn run(&self, light_curve: &Path) -> Result<Periodogram> {
        let output_path = self.output_path();
        // a stale file from an earlier run must not pass for fresh output
        match tokio::fs::remove_file(&output_path).await {
            Ok(()) => tracing::debug!("removed stale {}", output_path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(EngineError::ExternalTool(format!(
                    "cannot clear {}: {e}",
                    output_path.display()
                )));
            }
        }

        let input = std::path::absolute(light_curve).map_err(|e| {
            EngineError::DataLoad(format!("bad path {}: {e}", light_curve.display()))
        })?;

        let mut cmd = Command::new("bash");
        cmd.arg(&self.script)
            .arg(&input)
            .arg(self.start.to_string())
            .arg(self.count.to_string())
            .arg(self.script_dir())
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::info!(
            "running periodogram tool {} on {}",
            self.script.display(),
            input.display()
        );

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(EngineError::ExternalTool(format!(
                    "failed to start bash {}: {e}",
                    self.script.display()
                )));
            }
            Err(_) => {
                tracing::error!("periodogram tool timed out after {:?}", self.timeout);
                return Err(EngineError::ExternalTool(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("periodogram tool failed: {}", stderr.trim());
            return Err(EngineError::ExternalTool(format!(
                "{} exited with {}: {}",
                self.script.display(),
                output.status,
                stderr.trim()
            )));
        }

        let periodogram = read_periodogram(&output_path)?;
        tracing::info!(
            "periodogram ready: {} samples from {}",
            periodogram.len(),
            output_path.display()
        );
        Ok(periodogram)
    }
}

impl PeriodogramSource for ExternalTool {
    fn periodogram(&self, light_curve: &Path) -> impl Future<Output = Result<Periodogram>> + Send {
        self.run(light_curve)
    }
}
