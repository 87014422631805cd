use std::fs;
use std::path::Path;

use lc_core::{EngineError, LightCurve, Periodogram, Result};

// ---------------------------------------------------------------------------
// Pure parsing helpers (no I/O, fully unit-testable)
// ---------------------------------------------------------------------------

/// Split whitespace-delimited numeric text into rows.
/// Blank lines and `#` comments are skipped. Errors carry 1-based line numbers.
fn parse_rows(content: &str) -> std::result::Result<Vec<Vec<f64>>, String> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| format!("line {}: not a number: {tok:?}", idx + 1))
            })
            .collect::<std::result::Result<Vec<f64>, String>>()?;
        rows.push((idx + 1, row));
    }

    let Some((_, first)) = rows.first() else {
        return Err("no data rows".to_string());
    };
    let width = first.len();
    if let Some((line, row)) = rows.iter().find(|(_, r)| r.len() != width) {
        return Err(format!(
            "line {line}: expected {width} columns, found {}",
            row.len()
        ));
    }
    Ok(rows.into_iter().map(|(_, r)| r).collect())
}

fn columns(rows: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    (0..width)
        .map(|c| rows.iter().map(|r| r[c]).collect())
        .collect()
}

/// Parse `time flux [error]` rows. Two-column input gets zero errors.
pub fn parse_light_curve(content: &str) -> Result<LightCurve> {
    let rows = parse_rows(content).map_err(EngineError::DataLoad)?;
    let width = rows[0].len();
    let mut cols = columns(&rows, width).into_iter();
    match width {
        2 => {
            let (time, flux) = (cols.next().unwrap_or_default(), cols.next().unwrap_or_default());
            LightCurve::without_errors(time, flux)
        }
        3 => {
            let time = cols.next().unwrap_or_default();
            let flux = cols.next().unwrap_or_default();
            let err = cols.next().unwrap_or_default();
            LightCurve::new(time, flux, err)
        }
        n => Err(EngineError::DataLoad(format!(
            "expected 2 or 3 columns (time, flux, [error]), found {n}"
        ))),
    }
}

/// Parse `frequency amplitude` rows written by the periodogram tool.
pub fn parse_periodogram(content: &str) -> Result<Periodogram> {
    let rows = parse_rows(content)
        .map_err(|e| EngineError::ExternalTool(format!("malformed periodogram: {e}")))?;
    let width = rows[0].len();
    if width != 2 {
        return Err(EngineError::ExternalTool(format!(
            "periodogram must have 2 columns (frequency, amplitude), found {width}"
        )));
    }
    let mut cols = columns(&rows, 2).into_iter();
    Periodogram::new(
        cols.next().unwrap_or_default(),
        cols.next().unwrap_or_default(),
    )
}

// ---------------------------------------------------------------------------
// File wrappers
// ---------------------------------------------------------------------------

pub fn read_light_curve(path: &Path) -> Result<LightCurve> {
    let content = fs::read_to_string(path)
        .map_err(|e| EngineError::DataLoad(format!("failed to read {}: {e}", path.display())))?;
    parse_light_curve(&content).map_err(|e| match e {
        EngineError::DataLoad(msg) => EngineError::DataLoad(format!("{}: {msg}", path.display())),
        other => other,
    })
}

pub fn read_periodogram(path: &Path) -> Result<Periodogram> {
    let content = fs::read_to_string(path).map_err(|e| {
        EngineError::ExternalTool(format!("no periodogram output at {}: {e}", path.display()))
    })?;
    parse_periodogram(&content)
}
