use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_NAME: &str = "bing-paper.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 壁纸保存的目录
    pub papers_dir: PathBuf,
    pub host: String,
    // n 设为 8 而不是 1，避免几天没开电脑漏掉某天的壁纸
    pub archive_url: String,
    pub interval_hours: u64,
    pub network_retry_secs: u64,
    pub timeout_secs: u64,
    pub log_file: PathBuf,
    pub console_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        let papers_dir = dirs::picture_dir()
            .map(|p| p.join("Bing"))
            .unwrap_or_else(|| PathBuf::from("Bing"));
        Self {
            papers_dir,
            host: "https://cn.bing.com".to_string(),
            archive_url: "https://cn.bing.com/HPImageArchive.aspx?format=js&idx=0&n=8".to_string(),
            interval_hours: 12,
            network_retry_secs: 60,
            timeout_secs: 180,
            log_file: PathBuf::from("run.log"),
            console_log: true,
        }
    }
}

impl Config {
    /// 读取配置文件，不存在时用默认值创建；第二个值表示是否新建了文件
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path
            .try_exists()
            .with_context(|| format!("判断配置文件 {} 是否存在时出错", path.display()))?
        {
            let text = fs::read_to_string(path)
                .with_context(|| format!("读取配置文件 {} 出错", path.display()))?;
            let config: Config = serde_json::from_str(&text)
                .with_context(|| format!("解析配置文件 {} 出错", path.display()))?;
            config.validate()?;
            Ok((config, false))
        } else {
            let config = Config::default();
            let text = serde_json::to_string_pretty(&config)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("创建目录 {} 出错", parent.display()))?;
            }
            fs::write(path, text)
                .with_context(|| format!("写入配置文件 {} 出错", path.display()))?;
            Ok((config, true))
        }
    }

    fn validate(&self) -> Result<()> {
        if self.interval_hours == 0 {
            anyhow::bail!("interval_hours 必须大于 0");
        }
        if self.papers_dir.as_os_str().is_empty() {
            anyhow::bail!("papers_dir 不能为空");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours * 3600)
    }

    pub fn network_retry(&self) -> Duration {
        Duration::from_secs(self.network_retry_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join(DEFAULT_CONFIG_NAME);
        let (config, created) = Config::load_or_create(&path).unwrap();
        assert!(created);
        assert_eq!(config, Config::default());
        let saved: Config = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, config);
    }

    #[test]
    fn test_loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, r#"{"papers_dir": "/tmp/bing", "interval_hours": 11, "extra": 1}"#).unwrap();
        let (config, created) = Config::load_or_create(&path).unwrap();
        assert!(!created);
        assert_eq!(config.papers_dir, PathBuf::from("/tmp/bing"));
        assert_eq!(config.interval(), Duration::from_secs(11 * 3600));
        assert_eq!(config.host, "https://cn.bing.com");
        // 已有的配置文件不会被改写
        assert!(fs::read_to_string(&path).unwrap().contains("extra"));
    }

    #[test]
    fn test_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_or_create(&path).is_err());
        fs::write(&path, r#"{"interval_hours": 0}"#).unwrap();
        assert!(Config::load_or_create(&path).is_err());
    }
}
