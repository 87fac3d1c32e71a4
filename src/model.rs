use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ArchiveResponse {
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    #[serde(rename = "startdate", default)]
    pub start_date: String,
    #[serde(rename = "enddate", default)]
    pub end_date: String,
    #[serde(rename = "url")]
    pub relative_url: String,
    #[serde(rename = "urlbase", default)]
    pub url_base: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    SkippedExisting,
    Downloaded,
    Corrupt,
    FetchFailed,
    VerifyFailed,
}

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<(String, DownloadOutcome)>,
}

impl RunSummary {
    pub fn count(&self, outcome: DownloadOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}
