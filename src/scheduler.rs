use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::tray::Command;

/// 定时发出下载命令：启动时一次，之后每隔 `interval` 一次
pub struct Scheduler<P> {
    interval: Duration,
    network_retry: Duration,
    is_online: P,
}

enum Wait {
    Elapsed,
    Stopped,
}

impl<P: Fn() -> bool> Scheduler<P> {
    pub fn new(interval: Duration, network_retry: Duration, is_online: P) -> Self {
        Self {
            interval,
            network_retry,
            is_online,
        }
    }

    /// 直到 `stop` 收到消息或被关闭、或命令通道关闭才返回
    pub fn run(&self, commands: Sender<Command>, stop: Receiver<()>) {
        loop {
            while !(self.is_online)() {
                warn!(retry_secs = self.network_retry.as_secs(), "网络不可用，稍后重试");
                if let Wait::Stopped = wait(&stop, self.network_retry) {
                    return;
                }
            }
            if commands.send(Command::FetchLatest).is_err() {
                return;
            }
            if let Wait::Stopped = wait(&stop, self.interval) {
                return;
            }
        }
    }
}

/// 等待定时线程结束，线程 panic 时记录日志并返回 false
pub fn join(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            error!(panic = %msg, "定时任务线程异常退出");
            false
        }
    }
}

fn wait(stop: &Receiver<()>, timeout: Duration) -> Wait {
    match stop.recv_timeout(timeout) {
        Err(RecvTimeoutError::Timeout) => Wait::Elapsed,
        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
            info!("定时任务已停止");
            Wait::Stopped
        }
    }
}
