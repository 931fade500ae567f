use std::sync::mpsc::Sender;
use crate::error::Result;
use crate::models::conversion::{BatchOutcome, ConversionInput, ProgressEvent};

// Facade 接口，負責協調檔案轉換流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 執行檔案轉換，根據輸入配置生成輸出
    /// # 參數
    /// - input: 轉換所需的輸入參數
    /// - events: 進度事件的傳送端
    /// # 回傳
    /// - 成功時返回每個檔案的結果；字串檔或輸出目錄等前置條件錯誤時返回錯誤
    fn execute_conversion(&self, input: ConversionInput, events: &Sender<ProgressEvent>) -> Result<BatchOutcome>;
}
