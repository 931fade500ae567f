use std::path::PathBuf;
use crate::config::config::OutputFormat;

/// 使用者提交的一次轉換請求（單檔或批次）
#[derive(Clone, Debug)]
pub struct ConversionInput {
    pub input_path: PathBuf,
    pub strings_path: String,
    pub save_strings_json: bool,
    pub format: OutputFormat,
    pub batch: bool,
    pub specify_output: bool,
    pub output_dir: String,
    pub language: String,
    pub dark_mode: bool,
}

impl ConversionInput {
    pub fn format_option(&self) -> FormatOption {
        match self.format {
            OutputFormat::Docx => FormatOption::Language(self.language.clone()),
            OutputFormat::Html => FormatOption::DarkMode(self.dark_mode),
        }
    }
}

/// 各格式專屬的單一選項
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatOption {
    Language(String),
    DarkMode(bool),
}

/// 單一檔案的轉換請求，建立後不再變動
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub strings_path: Option<PathBuf>,
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub option: FormatOption,
}

impl ConversionRequest {
    pub fn language(&self) -> Option<&str> {
        match &self.option {
            FormatOption::Language(lang) => Some(lang),
            FormatOption::DarkMode(_) => None,
        }
    }

    pub fn dark_mode(&self) -> bool {
        matches!(self.option, FormatOption::DarkMode(true))
    }

    pub fn file_name(&self) -> String {
        display_name(&self.input_path)
    }
}

pub(crate) fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// 單一請求的最終結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn succeeded(request: &ConversionRequest) -> Self {
        ConversionResult {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            error: None,
        }
    }

    pub fn failed(request: &ConversionRequest, message: impl Into<String>) -> Self {
        ConversionResult {
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            error: Some(message.into()),
        }
    }

    pub fn state(&self) -> JobState {
        if self.error.is_some() {
            JobState::Failed
        } else {
            JobState::Succeeded
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 一次執行的整體結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// 批次模式下目錄中沒有任何 .json 檔案
    NoMatchingFiles { directory: PathBuf },
    Completed(Vec<ConversionResult>),
}

/// 工作執行緒送往呈現層的事件
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    StringsConverted { source: PathBuf, json: PathBuf, temporary: bool },
    BatchDiscovered { directory: PathBuf, total: usize },
    NoMatchingFiles { directory: PathBuf },
    FileStarted { index: usize, total: usize, input: PathBuf, output: PathBuf },
    FileFinished { index: usize, result: ConversionResult },
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub processed_files: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl From<&BatchOutcome> for ConversionSummary {
    fn from(outcome: &BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::NoMatchingFiles { .. } => ConversionSummary::default(),
            BatchOutcome::Completed(results) => {
                let succeeded = results.iter().filter(|r| r.is_success()).count();
                ConversionSummary {
                    processed_files: results.len(),
                    succeeded,
                    failed: results.len() - succeeded,
                }
            }
        }
    }
}
