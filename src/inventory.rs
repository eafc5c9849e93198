// include-fixer/src/inventory.rs
//! Header inventory: every header under the project header root, keyed by
//! its root-relative path (`/`-separated, e.g. `jit/jit.h`).

use anyhow::{
    anyhow,
    Context,
    Result
};
use std::{
    collections::HashSet,
    path::Path
};
use walkdir::WalkDir;


pub const DEFAULT_HEADER_EXTENSIONS: &[&str] = &["h"];

#[derive(Debug, Clone, Default)]
pub struct HeaderInventory {
    headers: HashSet<String>,
}

impl HeaderInventory {
    /// Walk `root` recursively and collect every file whose extension is in
    /// `extensions`. Symlinked files count when they point at a regular file;
    /// symlinked directories are not descended. A missing or non-directory
    /// root is an error.
    pub fn scan<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Self> {
        if !root.is_dir() {
            return Err(anyhow!(
                "header root {} does not exist or is not a directory",
                root.display()
            ));
        }

        let mut headers = HashSet::new();
        for dent in WalkDir::new(root).follow_links(false) {
            let dent = dent.with_context(|| format!("walking header root {}", root.display()))?;
            let path = dent.path();
            let is_file = if dent.path_is_symlink() {
                path.is_file()
            } else {
                dent.file_type().is_file()
            };
            if !is_file {
                continue;
            }
            if !has_header_ext(path, extensions) {
                continue;
            }
            headers.insert(normalize_rel(root, path));
        }

        tracing::debug!(root = %root.display(), count = headers.len(), "header inventory built");
        Ok(Self { headers })
    }

    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, header: &str) -> bool {
        self.headers.contains(header)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/* ----------------------------- helpers ----------------------------- */

fn has_header_ext<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|want| want.as_ref().trim_start_matches('.') == ext)
}

fn normalize_rel(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
