use std::io::{self, BufRead};
use std::path::Path;
use std::process;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchLatest,
    OpenPapersDir,
    CheckMissing,
    CheckIntegrity,
    OpenLog,
    Quit,
}

pub const MENU: [(&str, &str, Command); 6] = [
    ("fetch", "立即下载最新壁纸", Command::FetchLatest),
    ("open-folder", "打开壁纸文件夹", Command::OpenPapersDir),
    ("check-missing", "检测缺失的壁纸", Command::CheckMissing),
    ("check-integrity", "检测图片完整性", Command::CheckIntegrity),
    ("open-log", "打开日志文件", Command::OpenLog),
    ("quit", "退出程序", Command::Quit),
];

impl Command {
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        MENU.iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, _, cmd)| *cmd)
    }
}

pub fn menu_help() -> String {
    let mut help = String::from("菜单:\n");
    for (name, desc, _) in MENU {
        help.push_str(&format!("  {name:<16}{desc}\n"));
    }
    help
}

/// 控制台菜单：每行输入一个菜单项，输入结束后不再发送命令
pub fn run_menu<R: BufRead>(input: R, commands: Sender<Command>) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match Command::from_label(&line) {
            Some(cmd) => {
                if commands.send(cmd).is_err() || cmd == Command::Quit {
                    break;
                }
            }
            None => {
                warn!(input = %line.trim(), "未知的菜单项");
                eprint!("{}", menu_help());
            }
        }
    }
}

pub fn open_path(path: &Path) -> io::Result<()> {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let mut cmd = process::Command::new(opener);
    cmd.arg(path);
    spawn_detached(cmd)
}

// 不等待打开器退出，但要回收子进程
fn spawn_detached(mut cmd: process::Command) -> io::Result<()> {
    let mut child = cmd.spawn()?;
    thread::spawn(move || {
        if let Err(e) = child.wait() {
            warn!(error = %e, "等待子进程退出出错");
        }
    });
    Ok(())
}
