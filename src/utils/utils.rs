use std::io;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};
use log;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌初始化失敗: {}", e)))
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                pb.set_style(style);
            }
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    /// 已知檔案總數後切換為進度條
    pub fn set_total(&self, total: u64) {
        if self.no_progress {
            return;
        }
        self.pb.set_length(total);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}") {
            self.pb.set_style(style.progress_chars("##-"));
        }
    }

    pub fn update(&self, count: u64, action: &str) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 };
        self.pb.set_message(format!("{}（{:.1} 檔案/秒）", action, speed));
        self.pb.set_position(count);
    }

    /// 在進度條上方輸出一行訊息，不打斷進度條
    pub fn println(&self, message: impl AsRef<str>) {
        if self.no_progress {
            println!("{}", message.as_ref());
        } else {
            self.pb.println(message.as_ref());
        }
    }

    pub fn finish(&self, succeeded: usize, failed: usize) {
        if self.no_progress {
            return;
        }
        self.pb.finish_with_message(format!("完成，成功 {} 個，失敗 {} 個", succeeded, failed));
    }
}
