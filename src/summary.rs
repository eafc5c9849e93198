// include-fixer/src/summary.rs

use serde_json::{
    json,
    Value
};
use crate::fix::{
    FileOutcome,
    Mode
};


/// Aggregate over one invocation; printed with `--json`.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: Mode,
    pub inventory_size: usize,
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn new(mode: Mode, inventory_size: usize) -> Self {
        Self { mode, inventory_size, files: Vec::new() }
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        self.files.push(outcome);
    }

    pub fn files_changed(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }

    pub fn lines_changed(&self) -> usize {
        self.files.iter().map(|f| f.changed_lines).sum()
    }

    /// Compact JSON with the counts up top, changed files only.
    pub fn to_json(&self) -> Value {
        let changed: Vec<Value> = self
            .files
            .iter()
            .filter(|f| f.changed)
            .map(|f| json!({
                "path": f.path.to_string_lossy().replace('\\', "/"),
                "changed_lines": f.changed_lines,
            }))
            .collect();

        json!({
            "version": 1,
            "mode": self.mode,
            "summary": {
                "inventory": self.inventory_size,
                "files": self.files.len(),
                "files_changed": self.files_changed(),
                "lines_changed": self.lines_changed(),
            },
            "changed": changed,
        })
    }
}
