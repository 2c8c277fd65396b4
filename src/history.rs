//! Trend tracking - persist percentages to .gridmark-history.json
//!
//! Only the score numbers are stored; reports themselves are rebuilt fresh
//! on every run.

use crate::GradeReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const HISTORY_FILENAME: &str = ".gridmark-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    pub files: HashMap<String, FileScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileScore {
    pub percentage: f64,
    pub grade: String,
}

/// Find project root (directory containing the history file, a config
/// file, or .git)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };

    loop {
        if dir.join(HISTORY_FILENAME).exists()
            || dir.join(crate::config::CONFIG_FILENAME).exists()
            || dir.join(".git").exists()
        {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    if let Ok(content) = fs::read_to_string(&path) {
        if let Ok(history) = serde_json::from_str::<HistoryFile>(&content) {
            return history;
        }
    }
    HistoryFile::default()
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> std::io::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history).unwrap_or_else(|_| "{}".to_string());
    fs::write(path, content)
}

/// Get the previous percentage for a page from the latest run
pub fn previous_percentage(history: &HistoryFile, file_path: &Path) -> Option<f64> {
    let run = history.runs.last()?;
    let key = file_path.to_string_lossy().to_string();
    run.files.get(&key).map(|f| f.percentage)
}

/// Build a new run from grading reports and append to history
pub fn append_run(history: &mut HistoryFile, reports: &[GradeReport]) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let mut files = HashMap::new();
    for report in reports {
        let key = report.file_path.to_string_lossy().to_string();
        files.insert(
            key,
            FileScore {
                percentage: report.percentage,
                grade: report.grade.clone(),
            },
        );
    }
    history.runs.push(HistoryRun { timestamp, files });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: "[was 82.0%, up 4.0]" or "" when no history
pub fn format_delta(previous: Option<f64>, current: f64) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    let diff = current - prev;
    if diff.abs() < 0.05 {
        return format!(" [unchanged at {:.1}%]", current);
    }
    if diff > 0.0 {
        format!(" [was {:.1}%, up {:.1}]", prev, diff)
    } else {
        format!(" [was {:.1}%, down {:.1}]", prev, -diff)
    }
}
