use std::io;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use log::{error, info, warn};

use crate::config::ports::{AppConfig, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::models::conversion::{display_name, BatchOutcome, ConversionSummary, JobState, ProgressEvent};
use crate::service::registry::ConverterRegistry;
use crate::utils::utils::ProgressManager;

// 轉換執行適配器：在背景執行緒跑轉換，呈現層在目前執行緒接收事件
pub struct ConversionAdapter {
    facade: Arc<ConversionFacade>,
}

impl ConversionAdapter {
    pub fn new(registry: ConverterRegistry) -> Self {
        ConversionAdapter {
            facade: Arc::new(ConversionFacade::new(registry)),
        }
    }
}

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> io::Result<ConversionSummary> {
        println!("--- 開始轉換 ---");
        let (tx, rx) = channel();
        let handle = Arc::clone(&self.facade).spawn_conversion(config.to_conversion_input(), tx);

        let pm = ProgressManager::new(config.no_progress);
        present_events(rx, &pm);

        let outcome = handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "轉換執行緒異常結束"))?
            .map_err(|e| {
                error!("轉換中止：{}", e);
                io::Error::from(e)
            })?;

        let summary = ConversionSummary::from(&outcome);
        if let BatchOutcome::NoMatchingFiles { directory } = &outcome {
            println!("目錄中沒有 .json 檔案：{}", directory.display());
        }
        pm.finish(summary.succeeded, summary.failed);
        println!("--- 轉換結束 ---");
        Ok(summary)
    }
}

/// 接收工作執行緒的事件直到 channel 關閉，回傳每個檔案的最終狀態
pub fn present_events(rx: Receiver<ProgressEvent>, pm: &ProgressManager) -> Vec<JobState> {
    let mut states: Vec<JobState> = Vec::new();
    for event in rx {
        match event {
            ProgressEvent::StringsConverted { source, json, temporary } => {
                if temporary {
                    pm.println(format!("使用暫存字串 JSON：{}（來源 {}）", display_name(&json), display_name(&source)));
                } else {
                    pm.println(format!("已儲存轉換後的字串檔：{}", display_name(&json)));
                }
            }
            ProgressEvent::BatchDiscovered { directory, total } => {
                pm.println(format!("在 {} 中找到 {} 個 JSON 檔案", directory.display(), total));
            }
            ProgressEvent::NoMatchingFiles { directory } => {
                warn!("目錄中沒有 .json 檔案：{}", directory.display());
            }
            ProgressEvent::FileStarted { index, total, input, output } => {
                if states.len() < total {
                    states.resize(total, JobState::Pending);
                    pm.set_total(total as u64);
                }
                states[index] = JobState::Running;
                pm.update(index as u64, &format!("處理 {}/{}：{}", index + 1, total, display_name(&input)));
                pm.println(format!("處理中：{} -> {}", display_name(&input), display_name(&output)));
            }
            ProgressEvent::FileFinished { index, result } => {
                if let Some(state) = states.get_mut(index) {
                    *state = result.state();
                }
                match &result.error {
                    None => info!("完成：{}", result.output_path.display()),
                    Some(message) => {
                        pm.println(format!("處理 {} 失敗：{}", display_name(&result.input_path), message))
                    }
                }
                pm.update(index as u64 + 1, "處理中");
            }
            ProgressEvent::Finished => {}
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::models::conversion::ConversionResult;

    #[test]
    fn tracks_terminal_state_per_file() {
        let (tx, rx) = channel();
        let ok = ConversionResult {
            input_path: PathBuf::from("a.json"),
            output_path: PathBuf::from("a.html"),
            error: None,
        };
        let failed = ConversionResult {
            input_path: PathBuf::from("b.json"),
            output_path: PathBuf::from("b.html"),
            error: Some("boom".to_string()),
        };
        for (index, result) in [ok, failed].into_iter().enumerate() {
            tx.send(ProgressEvent::FileStarted {
                index,
                total: 3,
                input: result.input_path.clone(),
                output: result.output_path.clone(),
            })
            .unwrap();
            tx.send(ProgressEvent::FileFinished { index, result }).unwrap();
        }
        tx.send(ProgressEvent::Finished).unwrap();
        drop(tx);

        let states = present_events(rx, &ProgressManager::new(true));
        assert_eq!(states, vec![JobState::Succeeded, JobState::Failed, JobState::Pending]);
    }
}
