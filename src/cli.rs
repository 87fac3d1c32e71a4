use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CONFIG_NAME;

#[derive(Parser, Debug)]
#[command(
    name = "bing-paper",
    version,
    about = "定时下载必应每日壁纸，检测图片完整性和缺失的日期。"
)]
pub struct Args {
    #[arg(
        long,
        default_value = DEFAULT_CONFIG_NAME,
        help = "配置文件路径，不存在时自动创建"
    )]
    pub config: PathBuf,
}

pub fn parse_args() -> Args {
    Args::parse()
}
