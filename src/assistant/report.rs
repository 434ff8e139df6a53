//! Reading and watching progress reports built from note front matter.
//!
//! Each note under the report directory may start with a block like
//!
//! ```markdown
//! ---
//! name: The Pragmatic Programmer
//! progress: in_progress
//! ---
//! ```
//!
//! and ends up in the bucket named by its `progress` value.

use crate::error::{BotError, Result};
use crate::storage::Vault;
use std::fmt::Write as _;
use std::io::BufRead;
use std::path::Path;

const FRONT_MATTER_DELIMITER: &str = "---";
const SECTION_RULE: &str = "-------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NotStarted,
    InProgress,
    Finished,
}

impl Progress {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "not_started" => Some(Progress::NotStarted),
            "in_progress" => Some(Progress::InProgress),
            "finished" => Some(Progress::Finished),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before the opening delimiter
    Outside,
    Inside,
    /// Closing delimiter seen; the rest of the file is body
    Done,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub name: Option<String>,
    pub progress: Option<Progress>,
}

/// Read `name:` and `progress:` from the first `---` delimited block.
///
/// Stops reading at the closing delimiter.
pub fn scan_front_matter(reader: impl BufRead) -> Result<FrontMatter> {
    let mut state = ScanState::Outside;
    let mut front_matter = FrontMatter::default();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        state = match (state, line == FRONT_MATTER_DELIMITER) {
            (ScanState::Outside, true) => ScanState::Inside,
            (ScanState::Outside, false) => ScanState::Outside,
            (ScanState::Inside, true) => ScanState::Done,
            (ScanState::Inside, false) => {
                if let Some(value) = line.strip_prefix("name:") {
                    front_matter.name = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("progress:") {
                    front_matter.progress = Progress::parse(value.trim());
                }
                ScanState::Inside
            }
            (ScanState::Done, _) => ScanState::Done,
        };

        if state == ScanState::Done {
            break;
        }
    }

    Ok(front_matter)
}

#[derive(Debug, Default)]
pub struct Report {
    pub not_started: Vec<String>,
    pub in_progress: Vec<String>,
    pub finished: Vec<String>,
}

impl Report {
    pub fn push(&mut self, progress: Progress, title: String) {
        match progress {
            Progress::NotStarted => self.not_started.push(title),
            Progress::InProgress => self.in_progress.push(title),
            Progress::Finished => self.finished.push(title),
        }
    }

    pub fn render(&self) -> String {
        let mut report = String::new();
        let sections = [
            ("Not Started", &self.not_started),
            ("In Progress", &self.in_progress),
            ("Finished", &self.finished),
        ];

        for (i, (heading, titles)) in sections.iter().enumerate() {
            if i > 0 {
                report.push('\n');
            }
            let _ = write!(report, "**{}**\n{}\n\n", heading, SECTION_RULE);
            for title in titles.iter() {
                let _ = writeln!(report, "- {}", title);
            }
        }

        report
    }
}

/// Walk `dir` in the vault and bucket every Markdown note by progress.
///
/// Notes without a recognized `progress` value are left out.
pub fn generate_report(vault: &dyn Vault, dir: &Path) -> Result<String> {
    let mut report = Report::default();

    vault
        .walk(dir, &mut |path| {
            if path.extension().map(|e| e != "md").unwrap_or(true) {
                return Ok(());
            }

            let front_matter = scan_front_matter(vault.open(path)?)?;
            let Some(progress) = front_matter.progress else {
                tracing::debug!(path = %path.display(), "Skipping note without progress");
                return Ok(());
            };

            let title = match front_matter.name {
                Some(name) if !name.is_empty() => name,
                _ => path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };
            report.push(progress, title);
            Ok(())
        })
        .map_err(|e| BotError::Storage(format!("walking the path: {}", e)))?;

    Ok(report.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryVault;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn scan(text: &str) -> FrontMatter {
        scan_front_matter(Cursor::new(text)).unwrap()
    }

    #[test]
    fn test_scan_front_matter() {
        let fm = scan("---\nname: Dune\nprogress: finished\n---\n\nGreat book");
        assert_eq!(fm.name.as_deref(), Some("Dune"));
        assert_eq!(fm.progress, Some(Progress::Finished));
    }

    #[test]
    fn test_scan_ignores_keys_outside_block() {
        let fm = scan("name: Before\n---\nprogress: in_progress\n---\nname: After\n");
        assert_eq!(fm.name, None);
        assert_eq!(fm.progress, Some(Progress::InProgress));
    }

    #[test]
    fn test_scan_without_front_matter() {
        assert_eq!(scan("# Just a note\nprogress: finished\n"), FrontMatter::default());
    }

    #[test]
    fn test_scan_unknown_progress() {
        let fm = scan("---\nname: Dune\nprogress: abandoned\n---\n");
        assert_eq!(fm.progress, None);
    }

    #[test]
    fn test_render_empty_report() {
        assert_eq!(
            Report::default().render(),
            "**Not Started**\n-------------\n\n\
             \n**In Progress**\n-------------\n\n\
             \n**Finished**\n-------------\n\n"
        );
    }

    #[test]
    fn test_generate_report_buckets_notes() {
        let vault = MemoryVault::new()
            .with_file("Books/a.md", "---\nname: Dune\nprogress: finished\n---\n")
            .with_file("Books/b.md", "---\nname: SICP\nprogress: in_progress\n---\n")
            .with_file("Books/c.md", "---\nprogress: not_started\n---\n")
            .with_file("Books/d.md", "---\nname: Unsorted\n---\n")
            .with_file("Books/cover.png", "binary")
            .with_file("Films/e.md", "---\nname: Alien\nprogress: finished\n---\n");

        let report = generate_report(&vault, Path::new("Books")).unwrap();
        assert_eq!(
            report,
            "**Not Started**\n-------------\n\n- c\n\
             \n**In Progress**\n-------------\n\n- SICP\n\
             \n**Finished**\n-------------\n\n- Dune\n"
        );
    }

    #[test]
    fn test_generate_report_missing_dir_fails() {
        let vault = MemoryVault::new();
        let err = generate_report(&vault, Path::new("Films")).unwrap_err();
        assert!(err.to_string().contains("walking the path"));
    }
}
