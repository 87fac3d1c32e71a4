use std::io;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::mpsc::Receiver;

use tracing::{error, info};

use crate::config::Config;
use crate::downloader::PaperSource;
use crate::gaps::check_missing_papers;
use crate::index::LocalIndex;
use crate::integrity::check_directory;
use crate::pipeline::Pipeline;
use crate::tray::Command;

pub type Opener<'a> = dyn Fn(&Path) -> io::Result<()> + 'a;

/// 所有命令都在这里顺序执行，同一时间最多只有一次下载
pub struct App<'a> {
    config: &'a Config,
    source: &'a dyn PaperSource,
    opener: &'a Opener<'a>,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, source: &'a dyn PaperSource, opener: &'a Opener<'a>) -> Self {
        Self {
            config,
            source,
            opener,
        }
    }

    pub fn run(&self, commands: Receiver<Command>) {
        for cmd in commands {
            if self.handle(cmd).is_break() {
                return;
            }
        }
    }

    pub fn handle(&self, cmd: Command) -> ControlFlow<()> {
        match cmd {
            Command::FetchLatest => {
                let pipeline = Pipeline::new(
                    self.source,
                    &self.config.host,
                    &self.config.archive_url,
                    &self.config.papers_dir,
                );
                if let Err(e) = pipeline.obtain_latest() {
                    error!(error = %e, "下载最新壁纸时出错");
                }
            }
            Command::OpenPapersDir => self.open(&self.config.papers_dir),
            Command::CheckMissing => {
                if let Some(index) = self.scan() {
                    check_missing_papers(&index);
                }
            }
            Command::CheckIntegrity => {
                if let Some(index) = self.scan() {
                    check_directory(&self.config.papers_dir, &index);
                }
            }
            Command::OpenLog => self.open(&self.config.log_file),
            Command::Quit => {
                info!("退出程序");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn scan(&self) -> Option<LocalIndex> {
        match LocalIndex::scan(&self.config.papers_dir) {
            Ok(index) => Some(index),
            Err(e) => {
                error!(error = %e, "读取壁纸目录出错");
                None
            }
        }
    }

    fn open(&self, path: &Path) {
        if let Err(e) = (self.opener)(path) {
            error!(path = %path.display(), error = %e, "打开路径出错");
        }
    }
}
