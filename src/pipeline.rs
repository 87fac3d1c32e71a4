use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::downloader::PaperSource;
use crate::error::{PaperError, Result};
use crate::extractor::fetch_records;
use crate::integrity::check_integrity;
use crate::model::{DownloadOutcome, ImageRecord, RunSummary};
use crate::utils::file_name_for;

pub struct Pipeline<'a> {
    source: &'a dyn PaperSource,
    host: &'a str,
    archive_url: &'a str,
    papers_dir: &'a Path,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn PaperSource,
        host: &'a str,
        archive_url: &'a str,
        papers_dir: &'a Path,
    ) -> Self {
        Self {
            source,
            host,
            archive_url,
            papers_dir,
        }
    }

    /// 获取并保存最新的壁纸，单条记录出错不影响其余记录
    pub fn obtain_latest(&self) -> Result<RunSummary> {
        let records = fetch_records(self.source, self.archive_url)?;
        let mut summary = RunSummary::default();
        for record in &records {
            let (name, outcome) = self.process_record(record);
            summary.outcomes.push((name, outcome));
        }
        info!(
            total = records.len(),
            downloaded = summary.count(DownloadOutcome::Downloaded),
            skipped = summary.count(DownloadOutcome::SkippedExisting),
            corrupt = summary.count(DownloadOutcome::Corrupt),
            failed = summary.count(DownloadOutcome::FetchFailed)
                + summary.count(DownloadOutcome::VerifyFailed),
            "本次壁纸保存完毕"
        );
        Ok(summary)
    }

    fn process_record(&self, record: &ImageRecord) -> (String, DownloadOutcome) {
        let name = match file_name_for(record) {
            Ok(name) => name,
            Err(e) => {
                error!(error = %e, "跳过无效记录");
                return (record.relative_url.clone(), DownloadOutcome::FetchFailed);
            }
        };
        let path = self.papers_dir.join(&name);
        let outcome = self.save(record, &path);
        (name, outcome)
    }

    fn save(&self, record: &ImageRecord, path: &Path) -> DownloadOutcome {
        match path.try_exists() {
            Ok(true) => {
                debug!(path = %path.display(), "本地已存在同名文件");
                return DownloadOutcome::SkippedExisting;
            }
            Ok(false) => {}
            Err(e) => {
                error!(error = %PaperError::fs(path, e), "判断路径是否存在时出错");
                return DownloadOutcome::FetchFailed;
            }
        }

        let url = format!("{}{}", self.host.trim_end_matches('/'), record.relative_url);
        match self.source.download(&url, path) {
            Ok(size) => {
                debug!(
                    url = %url,
                    urlbase = record.url_base.as_deref().unwrap_or(""),
                    path = %path.display(),
                    size,
                    "图片已下载"
                );
            }
            Err(e) => {
                error!(url = %url, path = %path.display(), error = %e, "下载图片出错");
                return DownloadOutcome::FetchFailed;
            }
        }

        match check_integrity(path) {
            Ok(true) => {
                info!(
                    path = %path.display(),
                    title = record.title.as_deref().unwrap_or(""),
                    copyright = record.copyright.as_deref().unwrap_or(""),
                    "图片保存完毕"
                );
                DownloadOutcome::Downloaded
            }
            Ok(false) => {
                warn!(error = %PaperError::Integrity(path.to_path_buf()), url = %url, "下载的文件不完整");
                DownloadOutcome::Corrupt
            }
            Err(e) => {
                error!(error = %e, "检测图片完整性时出错");
                DownloadOutcome::VerifyFailed
            }
        }
    }
}
