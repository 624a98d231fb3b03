//! Consistency check orchestration
//!
//! Discovers member files and reports conflicting specifications

use crate::cli::output;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use specmine::{check, load_members, Conflict};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Conflicts found in one member file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub members: usize,
    pub conflicts: Vec<Conflict>,
}

pub fn handle_check(paths: &[PathBuf], format: OutputFormat) -> i32 {
    let files = discover_member_files(paths);
    if files.is_empty() {
        eprintln!("No member files found");
        return 1;
    }

    let reports = match check_files(&files) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    print!("{}", output::format_reports(&reports, format));

    // Return exit code: 0 if consistent, 1 if any conflict
    if reports.iter().any(|r| !r.conflicts.is_empty()) {
        1
    } else {
        0
    }
}

/// JSON files named directly or found below the given directories, sorted
pub fn discover_member_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| {
                // Skip build output and VCS metadata
                let name = e.file_name().to_string_lossy();
                !(e.depth() > 0 && (name == "target" || name.starts_with('.')))
            })
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files.dedup();
    debug!("discovered {} member files", files.len());
    files
}

/// Check every file; a file that cannot be loaded aborts the run
pub fn check_files(files: &[PathBuf]) -> Result<Vec<FileReport>> {
    files.iter().map(|path| check_file(path)).collect()
}

fn check_file(path: &Path) -> Result<FileReport> {
    let members =
        load_members(path).with_context(|| format!("loading members from {}", path.display()))?;
    Ok(FileReport {
        path: path.to_path_buf(),
        members: members.len(),
        conflicts: check(&members),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    const CONFLICTING: &str = r#"[{
        "declaring_type": "util.Files",
        "name": "delete",
        "parameters": [{"name": "file", "type": "java.io.File"}],
        "return_type": "void",
        "tags": [
            {"kind": "param", "parameter": "file", "comment": "may be null",
             "condition": "(args[0]==null)"},
            {"kind": "throws", "exception": "java.lang.NullPointerException",
             "comment": "if file is null", "condition": "(args[0] == null)"}
        ]
    }]"#;

    #[test]
    fn test_discover_and_check() {
        let dir = env::temp_dir().join(format!("specmine_check_{}", std::process::id()));
        let nested = dir.join("nested");
        let hidden = dir.join(".cache");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(&hidden).unwrap();
        fs::write(nested.join("files.json"), CONFLICTING).unwrap();
        fs::write(dir.join("empty.json"), "[]").unwrap();
        fs::write(dir.join("notes.txt"), "not a member file").unwrap();
        fs::write(hidden.join("stale.json"), "{").unwrap();

        let files = discover_member_files(&[dir.clone()]);
        assert_eq!(files, vec![dir.join("empty.json"), nested.join("files.json")]);

        let reports = check_files(&files).unwrap();
        assert!(reports[0].conflicts.is_empty());
        assert_eq!(reports[1].members, 1);
        assert_eq!(reports[1].conflicts.len(), 1);
        assert_eq!(handle_check(&[dir.clone()], OutputFormat::Json), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = env::temp_dir().join(format!("specmine_check_bad_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("broken.json");
        fs::write(&file, "{ not json").unwrap();

        assert!(check_files(&[file.clone()]).is_err());
        assert_eq!(handle_check(&[file], OutputFormat::Human), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
