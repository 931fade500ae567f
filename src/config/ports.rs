use std::io;
use crate::config::config::OutputFormat;
use crate::models::conversion::{ConversionInput, ConversionSummary};

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input: String,
    pub strings: String,
    pub save_strings_json: bool,
    pub format: OutputFormat,
    pub batch: bool,
    pub specify_output: bool,
    pub output_dir: String,
    pub language: String,
    pub dark_mode: bool,
    pub no_progress: bool,
}

impl AppConfig {
    pub fn to_conversion_input(&self) -> ConversionInput {
        ConversionInput {
            input_path: self.input.trim().into(),
            strings_path: self.strings.trim().to_string(),
            save_strings_json: self.save_strings_json,
            format: self.format,
            batch: self.batch,
            specify_output: self.specify_output,
            output_dir: self.output_dir.trim().to_string(),
            language: self.language.clone(),
            dark_mode: self.dark_mode,
        }
    }
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> io::Result<ConversionSummary>;
}
