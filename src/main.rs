mod app;
mod cli;
mod config;
mod downloader;
mod error;
mod extractor;
mod gaps;
mod index;
mod integrity;
mod logging;
mod model;
mod pipeline;
mod scheduler;
mod tray;
mod utils;

use std::io;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::App;
use crate::config::Config;
use crate::downloader::HttpClient;
use crate::scheduler::Scheduler;

fn main() -> Result<()> {
    let args = cli::parse_args();

    let (config, created) = Config::load_or_create(&args.config)?;
    logging::init(&config.log_file, config.console_log)?;
    if created {
        info!(path = %args.config.display(), "创建配置文件");
    } else {
        info!(path = %args.config.display(), "读取配置文件");
    }
    info!(
        papers_dir = %config.papers_dir.display(),
        "开始定时下载必应壁纸"
    );

    let client = HttpClient::new(config.timeout()).context("创建 HTTP 客户端出错")?;
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let scheduler_tx = cmd_tx.clone();
    let probe_client = client.clone();
    let host = config.host.clone();
    let scheduler = Scheduler::new(config.interval(), config.network_retry(), move || {
        probe_client.is_online(&host)
    });
    let scheduler_handle = thread::spawn(move || scheduler.run(scheduler_tx, stop_rx));

    eprint!("{}", tray::menu_help());
    // 菜单线程阻塞在 stdin 上，退出时不等待它
    thread::spawn(move || tray::run_menu(io::stdin().lock(), cmd_tx));

    App::new(&config, &client, &tray::open_path).run(cmd_rx);

    drop(stop_tx);
    scheduler::join(scheduler_handle);
    Ok(())
}
