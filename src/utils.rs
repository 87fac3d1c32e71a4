use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{PaperError, Result};
use crate::model::ImageRecord;

pub const DATE_FORMAT: &str = "%Y%m%d";

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "bmp"];

static ID_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([^&#]+)").unwrap());

pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

pub fn format_date_token(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 文件名形如 `20240103_xxx.jpg`，取第一个 `_` 之前的日期
pub fn date_of_file_name(name: &str) -> Option<NaiveDate> {
    let (token, _) = name.split_once('_')?;
    parse_date_token(token)
}

// enddate 比实际日期晚一天，但历史文件都按 enddate 命名
pub fn record_date(record: &ImageRecord) -> Option<NaiveDate> {
    parse_date_token(&record.end_date).or_else(|| parse_date_token(&record.start_date))
}

pub fn extract_image_id(relative_url: &str) -> Option<String> {
    if let Some(caps) = ID_PARAM.captures(relative_url) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }
    let path = relative_url
        .split(['?', '#'])
        .next()
        .unwrap_or(relative_url);
    let tail = &path[path.rfind('/').map(|i| i + 1).unwrap_or(0)..];
    if tail.is_empty() {
        None
    } else {
        Some(tail.to_string())
    }
}

fn has_image_extension(id: &str) -> bool {
    id.rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

pub fn file_stem_for(record: &ImageRecord) -> Result<String> {
    let date = record_date(record).ok_or_else(|| {
        PaperError::BadRecord(format!(
            "日期无效 startdate={} enddate={}",
            record.start_date, record.end_date
        ))
    })?;
    let id = extract_image_id(&record.relative_url)
        .filter(|id| !id.contains(['/', '\\']))
        .ok_or_else(|| PaperError::BadRecord(format!("URL 中没有图片标识: {}", record.relative_url)))?;
    Ok(format!("{}_{}", format_date_token(date), id))
}

pub fn file_name_for(record: &ImageRecord) -> Result<String> {
    let stem = file_stem_for(record)?;
    if has_image_extension(&stem) {
        Ok(stem)
    } else {
        Ok(format!("{stem}.jpg"))
    }
}
