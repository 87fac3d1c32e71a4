use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaperError {
    #[error("请求 {url} 失败: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("解析响应数据失败: {source}; 原始内容: {body}")]
    MalformedResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("无法从记录推导文件名: {0}")]
    BadRecord(String),
    #[error("文件操作 {path} 失败: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("图片不完整: {0}")]
    Integrity(PathBuf),
}

impl PaperError {
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PaperError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PaperError>;
