use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{info, warn};

use crate::error::{PaperError, Result};
use crate::index::LocalIndex;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

pub fn check_integrity(path: &Path) -> Result<bool> {
    let bytes = fs::read(path).map_err(|e| PaperError::fs(path, e))?;
    Ok(is_intact_image(&bytes))
}

/// 解码失败只算“不完整”，不是错误
pub fn is_intact_image(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let Ok(format) = image::guess_format(bytes) else {
        return false;
    };
    if format == ImageFormat::Jpeg && !has_jpeg_markers(bytes) {
        return false;
    }
    image::load_from_memory_with_format(bytes, format).is_ok()
}

// jpeg 解码器对截断的文件比较宽容，所以单独检查结束标记
fn has_jpeg_markers(bytes: &[u8]) -> bool {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    let trimmed = &bytes[..end];
    trimmed.starts_with(&JPEG_SOI) && trimmed.len() >= 4 && trimmed.ends_with(&JPEG_EOI)
}

pub fn check_directory(dir: &Path, index: &LocalIndex) -> Vec<PathBuf> {
    info!(dir = %dir.display(), count = index.files().len(), "开始检测图片完整性");
    let mut broken = Vec::new();
    for file in index.files() {
        let path = dir.join(&file.name);
        match check_integrity(&path) {
            Ok(true) => {}
            Ok(false) => {
                warn!(path = %path.display(), "文件不完整");
                broken.push(path);
            }
            Err(e) => {
                warn!(error = %e, "检测文件完整性出错");
                broken.push(path);
            }
        }
    }
    info!(broken = broken.len(), "图片完整性检测完成");
    broken
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;

    pub(crate) fn encode(format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_fn(16, 16, |x, y| image::Rgb([x as u8 * 16, y as u8 * 16, 128]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_valid_images_pass() {
        assert!(is_intact_image(&encode(ImageFormat::Jpeg)));
        assert!(is_intact_image(&encode(ImageFormat::Png)));
    }

    #[test]
    fn test_truncated_jpeg_fails() {
        let jpeg = encode(ImageFormat::Jpeg);
        assert!(!is_intact_image(&jpeg[..jpeg.len() / 2]));
        assert!(!is_intact_image(&jpeg[..jpeg.len() - 2]));
    }

    #[test]
    fn test_trailing_padding_is_tolerated() {
        let mut jpeg = encode(ImageFormat::Jpeg);
        jpeg.extend_from_slice(&[0, 0, 0]);
        assert!(is_intact_image(&jpeg));
    }

    #[test]
    fn test_truncated_png_fails() {
        let png = encode(ImageFormat::Png);
        assert!(!is_intact_image(&png[..png.len() / 2]));
    }

    #[test]
    fn test_garbage_and_empty_fail() {
        assert!(!is_intact_image(b""));
        assert!(!is_intact_image(b"<html>not found</html>"));
    }

    #[test]
    fn test_check_integrity_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_integrity(&dir.path().join("none.jpg")).unwrap_err();
        assert!(matches!(err, PaperError::FileSystem { .. }));
    }

    #[test]
    fn test_check_directory_reports_broken() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = encode(ImageFormat::Jpeg);
        fs::write(dir.path().join("20240101_a.jpg"), &jpeg).unwrap();
        fs::write(dir.path().join("20240102_b.jpg"), &jpeg[..jpeg.len() / 3]).unwrap();
        let index = LocalIndex::scan(dir.path()).unwrap();
        let broken = check_directory(dir.path(), &index);
        assert_eq!(broken, vec![dir.path().join("20240102_b.jpg")]);
    }
}
