use tracing::{debug, info};

use crate::downloader::PaperSource;
use crate::error::{PaperError, Result};
use crate::model::{ArchiveResponse, ImageRecord};

pub fn fetch_metadata(source: &dyn PaperSource, archive_url: &str) -> Result<String> {
    info!(url = archive_url, "获取壁纸数据");
    source.get_text(archive_url)
}

pub fn parse_metadata(text: &str) -> Result<Vec<ImageRecord>> {
    let resp: ArchiveResponse =
        serde_json::from_str(text).map_err(|source| PaperError::MalformedResponse {
            body: text.to_string(),
            source,
        })?;
    debug!(count = resp.images.len(), "解析到壁纸记录");
    Ok(resp.images)
}

pub fn fetch_records(source: &dyn PaperSource, archive_url: &str) -> Result<Vec<ImageRecord>> {
    let text = fetch_metadata(source, archive_url)?;
    parse_metadata(&text)
}
