use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::config::OutputFormat;

/// 轉換流程中可能發生的錯誤
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("無法讀取 '{}': {source}", path.display())]
    IoRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("無法寫入 '{}': {source}", path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("配置錯誤：{0}")]
    Configuration(String),

    #[error("找不到 {0} 格式的轉換器")]
    ConverterUnavailable(OutputFormat),

    #[error("處理 {file} 失敗：{message}")]
    ConverterFailure { file: String, message: String },

    #[error("JSON 序列化錯誤：{0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

impl From<ConversionError> for io::Error {
    fn from(err: ConversionError) -> Self {
        let kind = match &err {
            ConversionError::IoRead { source, .. } | ConversionError::IoWrite { source, .. } => source.kind(),
            ConversionError::Configuration(_) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
