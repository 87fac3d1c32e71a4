use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PaperError, Result};
use crate::model::LocalFile;
use crate::utils::date_of_file_name;

/// 壁纸目录的一次性快照，按文件名排序
#[derive(Debug, Default)]
pub struct LocalIndex {
    files: Vec<LocalFile>,
}

impl LocalIndex {
    pub fn scan(dir: &Path) -> Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(PaperError::fs(dir, e)),
        };
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PaperError::fs(dir, e))?;
            let file_type = entry.file_type().map_err(|e| PaperError::fs(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(LocalFile {
                date: date_of_file_name(&name),
                name,
            });
        }
        Ok(Self::from_files(files))
    }

    pub fn from_files(mut files: Vec<LocalFile>) -> Self {
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Self { files }
    }

    pub fn files(&self) -> &[LocalFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
