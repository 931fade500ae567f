use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use log::{error, info, warn};

use crate::error::{ConversionError, Result};
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{
    display_name, BatchOutcome, ConversionInput, ConversionRequest, ConversionResult, ProgressEvent,
};
use crate::service::file::{derive_output_path, discover_batch};
use crate::service::registry::ConverterRegistry;
use crate::service::strings::{is_strings_text, prepare_strings_source, PreparedStrings};

/// 由單一輸入或批次探索結果產生的請求清單
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPlan {
    NoMatchingFiles { directory: PathBuf },
    Requests(Vec<ConversionRequest>),
}

pub struct ConversionFacade {
    registry: ConverterRegistry,
}

impl ConversionFacade {
    pub fn new(registry: ConverterRegistry) -> Self {
        ConversionFacade { registry }
    }

    /// 建立轉換請求；輸出目錄設定錯誤時整批中止
    pub fn build_requests(input: &ConversionInput, strings: &PreparedStrings) -> Result<BatchPlan> {
        let files = if input.batch {
            let job = discover_batch(&input.input_path);
            if job.is_empty() {
                return Ok(BatchPlan::NoMatchingFiles { directory: job.directory });
            }
            info!("在 {} 中找到 {} 個 JSON 檔案", job.directory.display(), job.len());
            job.files
        } else {
            vec![input.input_path.clone()]
        };

        let option = input.format_option();
        files
            .into_iter()
            .map(|file| {
                let output_path = derive_output_path(&file, input.format, input.specify_output, &input.output_dir)?;
                Ok(ConversionRequest {
                    input_path: file,
                    strings_path: strings.path().map(PathBuf::from),
                    output_path,
                    format: input.format,
                    option: option.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(BatchPlan::Requests)
    }

    /// 執行單一請求，任何錯誤都轉為失敗結果
    pub fn run_one(&self, request: &ConversionRequest) -> ConversionResult {
        let converter = match self.registry.resolve(request.format) {
            Ok(converter) => converter,
            Err(e) => {
                error!("{}", e);
                return ConversionResult::failed(request, e.to_string());
            }
        };

        info!(
            "處理中：{} -> {}（{}）",
            request.file_name(),
            display_name(&request.output_path),
            converter.name()
        );
        // 轉換器 panic 也只算此檔失敗
        let message = match panic::catch_unwind(AssertUnwindSafe(|| converter.run(request))) {
            Ok(Ok(())) => return ConversionResult::succeeded(request),
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("{} 異常中止：{}", converter.name(), panic_message(payload.as_ref())),
        };
        error!(
            "{}",
            ConversionError::ConverterFailure {
                file: request.file_name(),
                message: message.clone(),
            }
        );
        ConversionResult::failed(request, message)
    }

    /// 依序執行所有請求，失敗不影響後續檔案
    pub fn run_batch(&self, requests: &[ConversionRequest]) -> Vec<ConversionResult> {
        self.run_batch_with(requests, &mut |_| {})
    }

    fn run_batch_with(
        &self,
        requests: &[ConversionRequest],
        notify: &mut dyn FnMut(ProgressEvent),
    ) -> Vec<ConversionResult> {
        let total = requests.len();
        let mut results = Vec::with_capacity(total);
        for (index, request) in requests.iter().enumerate() {
            notify(ProgressEvent::FileStarted {
                index,
                total,
                input: request.input_path.clone(),
                output: request.output_path.clone(),
            });
            let result = self.run_one(request);
            notify(ProgressEvent::FileFinished { index, result: result.clone() });
            results.push(result);
        }
        results
    }

    /// 在背景執行緒執行整個轉換，事件經由 channel 回報
    pub fn spawn_conversion(
        self: Arc<Self>,
        input: ConversionInput,
        events: Sender<ProgressEvent>,
    ) -> JoinHandle<Result<BatchOutcome>> {
        thread::spawn(move || self.execute_conversion(input, &events))
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self, input: ConversionInput, events: &Sender<ProgressEvent>) -> Result<BatchOutcome> {
        let send = |event: ProgressEvent| {
            // 接收端已關閉時不影響轉換
            let _ = events.send(event);
        };

        // 字串檔為整批共用的前置條件，失敗即中止；暫存檔在此函式結束時刪除
        let strings = prepare_strings_source(&input.strings_path, input.save_strings_json)?;
        if let Some(json) = strings.path() {
            let source = input.strings_path.trim();
            if is_strings_text(source) {
                send(ProgressEvent::StringsConverted {
                    source: PathBuf::from(source),
                    json: json.to_path_buf(),
                    temporary: strings.is_temporary(),
                });
            }
        }

        let requests = match Self::build_requests(&input, &strings)? {
            BatchPlan::NoMatchingFiles { directory } => {
                warn!("目錄中沒有 .json 檔案：{}", directory.display());
                send(ProgressEvent::NoMatchingFiles { directory: directory.clone() });
                send(ProgressEvent::Finished);
                return Ok(BatchOutcome::NoMatchingFiles { directory });
            }
            BatchPlan::Requests(requests) => requests,
        };
        if input.batch {
            if let Some(directory) = requests[0].input_path.parent() {
                send(ProgressEvent::BatchDiscovered {
                    directory: directory.to_path_buf(),
                    total: requests.len(),
                });
            }
        }

        let results = self.run_batch_with(&requests, &mut |event| send(event));
        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!("轉換完成：成功 {} 個，失敗 {} 個", results.len() - failed, failed);
        send(ProgressEvent::Finished);
        Ok(BatchOutcome::Completed(results))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "未知錯誤".to_string()
    }
}
