use serde::Serialize;
use std::path::{Path, PathBuf};
use vmt_backend::TranslationStats;

/// What `--summary-json` prints after a successful run
#[derive(Debug, Serialize)]
pub struct TranslationSummary {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub bootstrap: bool,
    #[serde(flatten)]
    pub stats: TranslationStats,
}

impl TranslationSummary {
    pub fn new(inputs: Vec<PathBuf>, output: &Path, bootstrap: bool, stats: TranslationStats) -> Self {
        Self {
            inputs,
            output: output.to_path_buf(),
            bootstrap,
            stats,
        }
    }
}
