// include-fixer/src/fix.rs

use anyhow::{
    Context,
    Result
};
use serde::Serialize;
use std::{
    fs,
    io::Write,
    path::{
        Path,
        PathBuf
    }
};
use tempfile::NamedTempFile;
use crate::rewrite::IncludeRule;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Replace files whose includes need fixing.
    Write,
    /// Report only; never touch the file.
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub changed_lines: usize,
    pub changed: bool,
}

/// Read `path` whole, rewrite its includes in memory, and (in `Mode::Write`)
/// atomically replace it when the content differs. Symlinks are resolved so
/// the link target is rewritten and the link itself stays a link.
pub fn fix_file(path: &Path, rule: &IncludeRule, mode: Mode) -> Result<FileOutcome> {
    let resolved = fs::canonicalize(path)
        .with_context(|| format!("resolve {}", path.display()))?;
    let original = fs::read(&resolved)
        .with_context(|| format!("read {}", path.display()))?;
    let rewritten = rule.rewrite_source(&original);
    let changed = rewritten.changed();

    if changed && mode == Mode::Write {
        write_atomic(&resolved, &rewritten.text)
            .with_context(|| format!("rewrite {}", path.display()))?;
    }
    tracing::debug!(path = %path.display(), changed_lines = rewritten.changed_lines, ?mode, "processed");

    Ok(FileOutcome {
        path: path.to_path_buf(),
        changed_lines: rewritten.changed_lines,
        changed,
    })
}

/// Write to a sibling temp file, fsync, then rename over `path`.
/// The original permissions carry over to the new file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let perms = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("write temp {}", tmp.path().display()))?;
    tmp.as_file().sync_all()
        .with_context(|| format!("sync temp {}", tmp.path().display()))?;
    fs::set_permissions(tmp.path(), perms)
        .with_context(|| format!("set permissions on {}", tmp.path().display()))?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
