//! Periodogram tool runner and dataset loading against throwaway bash
//! scripts in a temp directory.
#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use lc_core::{EngineError, Periodogram, Result};
use lc_io::{ExternalTool, PeriodogramSource, ToolConfig, load_dataset};
use tempfile::TempDir;

const LIGHT_CURVE: &str = "0.0 1.0 0.1\n0.5 2.0 0.1\n1.0 1.0 0.1\n1.5 2.0 0.1\n";

const GOOD_SCRIPT: &str = r#"
echo "$1 $2 $3 $4" > args.txt
printf '0.1 5\n0.4 3\n0.5 1\n0.6 9\n0.9 2\n' > lcf.trf
"#;

fn setup(script: &str, timeout_secs: u64) -> (TempDir, ExternalTool, PathBuf) {
    let dir = TempDir::new().unwrap();
    let script_path = dir.path().join("lcdft.bash");
    fs::write(&script_path, script).unwrap();
    let lc = dir.path().join("star.dat");
    fs::write(&lc, LIGHT_CURVE).unwrap();
    let tool = ExternalTool::new(&ToolConfig {
        script: script_path,
        workdir: dir.path().to_path_buf(),
        timeout_secs,
        ..ToolConfig::default()
    });
    (dir, tool, lc)
}

#[tokio::test]
async fn tool_output_is_parsed() {
    let (_dir, tool, lc) = setup(GOOD_SCRIPT, 10);
    let p = tool.periodogram(&lc).await.unwrap();
    assert_eq!(p.frequency(), &[0.1, 0.4, 0.5, 0.6, 0.9]);
    assert_eq!(p.dominant().frequency, 0.6);
}

#[tokio::test]
async fn tool_receives_invocation_contract() {
    let (dir, tool, lc) = setup(GOOD_SCRIPT, 10);
    tool.periodogram(&lc).await.unwrap();
    let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    let parts: Vec<&str> = args.split_whitespace().collect();
    assert_eq!(parts.len(), 4);
    assert!(parts[0].ends_with("star.dat"));
    assert_eq!(parts[1], "0");
    assert_eq!(parts[2], "300");
    assert!(parts[3].ends_with('/'));
}

#[tokio::test]
async fn failing_tool_is_external_error() {
    let (_dir, tool, lc) = setup("echo boom >&2\nexit 3\n", 10);
    let err = tool.periodogram(&lc).await.unwrap_err();
    assert!(matches!(&err, EngineError::ExternalTool(msg) if msg.contains("boom")));
}

#[tokio::test]
async fn silent_tool_without_output_is_external_error() {
    let (_dir, tool, lc) = setup("exit 0\n", 10);
    let err = tool.periodogram(&lc).await.unwrap_err();
    assert!(matches!(err, EngineError::ExternalTool(_)));
}

#[tokio::test]
async fn stale_output_is_not_reused() {
    let (dir, tool, lc) = setup("exit 0\n", 10);
    fs::write(dir.path().join("lcf.trf"), "0.5 1\n0.6 2\n").unwrap();
    let err = tool.periodogram(&lc).await.unwrap_err();
    assert!(matches!(err, EngineError::ExternalTool(_)));
}

#[tokio::test]
async fn garbage_output_is_external_error() {
    let (_dir, tool, lc) = setup("echo 'not numbers' > lcf.trf\n", 10);
    let err = tool.periodogram(&lc).await.unwrap_err();
    assert!(matches!(err, EngineError::ExternalTool(_)));
}

#[tokio::test]
async fn slow_tool_times_out() {
    let (_dir, tool, lc) = setup("sleep 5\n", 1);
    let err = tool.periodogram(&lc).await.unwrap_err();
    assert!(matches!(&err, EngineError::ExternalTool(msg) if msg.contains("timed out")));
}

#[tokio::test]
async fn load_dataset_with_external_tool() {
    let (_dir, tool, lc) = setup(GOOD_SCRIPT, 10);
    let (curve, periodogram) = load_dataset(&lc, &tool).await.unwrap();
    assert_eq!(curve.len(), 4);
    assert_eq!(periodogram.len(), 5);
}

struct CountingSource {
    calls: AtomicUsize,
}

impl PeriodogramSource for CountingSource {
    async fn periodogram(&self, _light_curve: &Path) -> Result<Periodogram> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Periodogram::new(vec![0.5, 0.6], vec![1.0, 2.0])
    }
}

#[tokio::test]
async fn bad_light_curve_skips_the_tool() {
    let dir = TempDir::new().unwrap();
    let lc = dir.path().join("ragged.dat");
    fs::write(&lc, "0 1 0.1\n1 2\n").unwrap();
    let source = CountingSource {
        calls: AtomicUsize::new(0),
    };

    let err = load_dataset(&lc, &source).await.unwrap_err();
    assert!(matches!(err, EngineError::DataLoad(_)));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn load_dataset_with_in_process_source() {
    let dir = TempDir::new().unwrap();
    let lc = dir.path().join("star.dat");
    fs::write(&lc, LIGHT_CURVE).unwrap();
    let source = CountingSource {
        calls: AtomicUsize::new(0),
    };

    let (_, periodogram) = load_dataset(&lc, &source).await.unwrap();
    assert_eq!(periodogram.dominant().frequency, 0.6);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}
