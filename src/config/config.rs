use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;

#[derive(Parser, Clone, Debug)]
#[command(
    name = "json_converter",
    about = "將 JSON 檔案轉換為 DOCX 或 HTML 文件",
    long_about = "將單一 JSON 檔案或整個目錄中的 JSON 檔案轉換為 DOCX 或 HTML 文件。\n可搭配字串檔（.json 或舊版 .txt 格式）替換文件中的佔位文字。\n未指定 --output 時，輸出檔案會儲存在輸入檔案旁。\n不帶任何參數執行即進入互動模式。使用 `--help` 查看詳細用法。"
)]
pub struct Cli {
    /// 輸入的 JSON 檔案；批次模式下可為目錄
    pub input: Option<String>,
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
    /// 字串檔路徑（.json 或 .txt）
    #[arg(short, long)]
    pub strings: Option<String>,
    /// 將 .txt 字串檔轉換後的 JSON 儲存在原檔旁
    #[arg(long, default_value_t = false)]
    pub save_strings_json: bool,
    /// 輸出目錄；未指定時輸出至輸入檔案旁
    #[arg(short, long)]
    pub output: Option<String>,
    /// 轉換目錄中所有 JSON 檔案
    #[arg(short, long, default_value_t = false)]
    pub batch: bool,
    /// DOCX 文件的語言標籤，例如 en-GB
    #[arg(long)]
    pub lang: Option<String>,
    /// HTML 文件使用深色主題
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub dark_mode: Option<bool>,
    #[arg(long, value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: Option<String>,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
    /// 清除已儲存的設定並恢復預設值
    #[arg(long, default_value_t = false)]
    pub reset_settings: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Docx,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Docx => write!(f, "DOCX"),
            OutputFormat::Html => write!(f, "HTML"),
        }
    }
}

pub const DEFAULT_LANGUAGE: &str = "en-GB";

// 互動模式提供的語言標籤，可自行輸入其他標籤
pub const LANGUAGES: &[&str] = &[
    "af-ZA", "am-ET", "ar-SA", "as-IN", "az-Latn-AZ", "be-BY", "bg-BG", "bn-IN", "bs-Latn-BA", "ca-ES",
    "cs-CZ", "cy-GB", "da-DK", "de-DE", "el-GR", "en-GB", "en-US", "es-ES", "es-MX", "et-EE",
    "eu-ES", "fa-IR", "fi-FI", "fil-PH", "fr-CA", "fr-FR", "ga-IE", "gd-GB", "gl-ES", "gu-IN",
    "ha-Latn-NG", "he-IL", "hi-IN", "hr-HR", "hu-HU", "hy-AM", "id-ID", "ig-NG", "is-IS", "it-IT",
    "ja-JP", "ka-GE", "kk-KZ", "km-KH", "kn-IN", "ko-KR", "kok-IN", "ku-Arab-IQ", "ky-KG", "lb-LU",
    "lo-LA", "lt-LT", "lv-LV", "mi-NZ", "mk-MK", "ml-IN", "mn-MN", "mr-IN", "ms-MY", "mt-MT",
    "nb-NO", "ne-NP", "nl-NL", "nn-NO", "nso-ZA", "or-IN", "pa-IN", "pl-PL", "prs-AF", "pt-BR",
    "pt-PT", "quc-Latn-GT", "quz-PE", "ro-RO", "ru-RU", "rw-RW", "sd-Arab-PK", "si-LK", "sk-SK", "sl-SI",
    "sq-AL", "sr-Cyrl-BA", "sr-Cyrl-RS", "sr-Latn-RS", "sv-SE", "sw-KE", "ta-IN", "te-IN", "tg-Cyrl-TJ", "th-TH",
    "ti-ET", "tk-TM", "tn-ZA", "tr-TR", "tt-RU", "ug-CN", "uk-UA", "ur-PK", "uz-Latn-UZ", "vi-VN",
    "wo-SN", "xh-ZA", "yo-NG", "zh-CN", "zh-TW", "zu-ZA",
];

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    if input.trim().is_empty() {
        log::error!("未提供輸入路徑");
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "必須提供輸入路徑"));
    }
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

pub fn is_known_language(tag: &str) -> bool {
    LANGUAGES.iter().any(|known| known.eq_ignore_ascii_case(tag))
}
