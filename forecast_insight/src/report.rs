//! Downloadable insight report

use crate::error::Result;
use crate::metrics::Insight;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name the insight is offered under
pub const INSIGHT_FILE_NAME: &str = "forecast_insight.txt";
/// MIME type of the insight file
pub const INSIGHT_MIME: &str = "text/plain";

/// Plain-text insight ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDownload {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub body: String,
}

impl InsightDownload {
    pub fn from_insight(insight: &Insight) -> Self {
        Self {
            file_name: INSIGHT_FILE_NAME,
            mime: INSIGHT_MIME,
            body: insight.text.clone(),
        }
    }

    /// Write the report into `dir`, creating it if needed, and return the file path
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(self.file_name);
        fs::write(&path, &self.body)?;

        info!(path = %path.display(), bytes = self.body.len(), "Wrote insight report");
        Ok(path)
    }
}
