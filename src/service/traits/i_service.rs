use thiserror::Error;
use crate::config::config::OutputFormat;
use crate::models::conversion::ConversionRequest;

pub type ConverterError = Box<dyn std::error::Error + Send + Sync>;

/// 轉換器附加情境說明的錯誤，保留原始錯誤作為來源
#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct ConverterFault {
    context: String,
    #[source]
    source: ConverterError,
}

impl ConverterFault {
    pub fn new(context: impl Into<String>, source: impl Into<ConverterError>) -> Self {
        ConverterFault {
            context: context.into(),
            source: source.into(),
        }
    }
}

// 轉換器接口，負責將單一 JSON 檔案輸出為指定格式的文件
pub trait Converter: Send + Sync {
    /// 轉換器名稱，用於日誌
    fn name(&self) -> &str;

    /// 轉換器輸出的格式
    fn format(&self) -> OutputFormat;

    /// 執行轉換
    /// # 參數
    /// - request: 輸入、字串檔、輸出路徑與格式選項
    /// # 回傳
    /// - 成功時返回 ()，失敗時返回轉換器的錯誤
    fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError>;
}
