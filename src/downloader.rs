use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{PaperError, Result};

/// 远程数据来源，流水线只通过它访问网络
pub trait PaperSource {
    fn get_text(&self, url: &str) -> Result<String>;

    /// 下载到 `dst`，目标文件必须不存在
    fn download(&self, url: &str, dst: &Path) -> Result<u64>;
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
    probe_client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let build = |timeout: Duration| {
            reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|source| PaperError::Network {
                    url: String::new(),
                    source,
                })
        };
        Ok(Self {
            client: build(timeout)?,
            probe_client: build(Duration::from_secs(10))?,
        })
    }

    pub fn is_online(&self, host: &str) -> bool {
        match self.probe_client.head(host).send() {
            Ok(_) => true,
            Err(e) => {
                debug!(host, error = %e, "网络不可用");
                false
            }
        }
    }
}

fn network(url: &str) -> impl FnOnce(reqwest::Error) -> PaperError + '_ {
    move |source| PaperError::Network {
        url: url.to_string(),
        source,
    }
}

impl PaperSource for HttpClient {
    fn get_text(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(network(url))
    }

    fn download(&self, url: &str, dst: &Path) -> Result<u64> {
        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(network(url))?;
        write_new_file(dst, &mut &bytes[..])
    }
}

/// 写到一半失败时删掉本次新建的文件，否则下次会被当作已下载跳过
pub fn write_new_file<R: Read>(dst: &Path, reader: &mut R) -> Result<u64> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| PaperError::fs(parent, e))?;
    }
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(|e| PaperError::fs(dst, e))?;
    match io::copy(reader, &mut out) {
        Ok(size) => Ok(size),
        Err(e) => {
            drop(out);
            if let Err(rm) = fs::remove_file(dst) {
                warn!(path = %dst.display(), error = %rm, "删除不完整的文件出错");
            }
            Err(PaperError::fs(dst, e))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn test_write_new_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a").join("b").join("20240101_x.jpg");
        assert_eq!(write_new_file(&dst, &mut &b"abc"[..]).unwrap(), 3);
        assert_eq!(fs::read(&dst).unwrap(), b"abc");
    }

    #[test]
    fn test_write_new_file_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("20240101_x.jpg");
        fs::write(&dst, b"old").unwrap();
        let err = write_new_file(&dst, &mut &b"new"[..]).unwrap_err();
        assert!(matches!(err, PaperError::FileSystem { .. }));
        assert_eq!(fs::read(&dst).unwrap(), b"old");
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("20240102_a.jpg");
        let mut reader = (&b"half a picture"[..]).chain(FailingReader);
        let err = write_new_file(&dst, &mut reader).unwrap_err();
        assert!(matches!(err, PaperError::FileSystem { .. }));
        assert!(!dst.exists());
    }

    pub(crate) struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::StorageFull.into())
        }
    }
}
