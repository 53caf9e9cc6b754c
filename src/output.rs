//! Writing the finished report and handing it to the desktop.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::error::Result;

pub const DEFAULT_FILE_NAME: &str = "Superstore_Executive_Dashboard.html";

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// `~/Downloads/Superstore_Executive_Dashboard.html`, or the file name
/// alone when no home directory is known.
pub fn default_output_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join("Downloads").join(DEFAULT_FILE_NAME),
        None => PathBuf::from(DEFAULT_FILE_NAME),
    }
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!("Saved report to {}", path.display());
    Ok(())
}

fn open_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Open `path` with the host's default handler. Failure is logged only.
pub fn open_in_default_app(path: &Path) {
    match open_command(path).spawn() {
        Ok(_) => info!("Opened {} in the default application", path.display()),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}

/// Clean up a path typed or dragged into a terminal prompt.
pub fn clean_prompt_path(answer: &str) -> PathBuf {
    PathBuf::from(answer.trim().trim_matches(|c| c == '"' || c == '\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_file_name() {
        let path = default_output_path();
        assert_eq!(path.file_name().unwrap(), DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_clean_prompt_path() {
        assert_eq!(clean_prompt_path("  \"/tmp/train.csv\"\n"), PathBuf::from("/tmp/train.csv"));
        assert_eq!(clean_prompt_path("'/tmp/my data.csv' "), PathBuf::from("/tmp/my data.csv"));
        assert_eq!(clean_prompt_path("train.csv"), PathBuf::from("train.csv"));
    }

    #[test]
    fn test_write_report_creates_parents() {
        let dir = env::temp_dir().join(format!("superstore-output-{}", std::process::id()));
        let path = dir.join("nested").join("report.html");
        write_report(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
        fs::remove_dir_all(&dir).unwrap();
    }
}
