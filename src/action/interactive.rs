use dialoguer::{Confirm, Input, Select};
use std::io;
use std::path::Path;

use crate::action::cli::run_and_remember;
use crate::config::config::{is_known_language, OutputFormat, LANGUAGES};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::config::settings::Settings;
use crate::models::conversion::ConversionSummary;
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::utils::setup_logging;

fn prompt_error(what: &str, e: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}失敗: {}", what, e))
}

pub fn process_interactive_mode() -> io::Result<ConversionSummary> {
    setup_logging("info")?;
    println!("=== 歡迎使用互動模式 ===");
    let settings = Settings::load();
    let use_default_config = get_default_config_option(&settings)?;
    let input = get_input_path(&settings)?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        println!(
            "使用已儲存的設定：{} 格式，輸出至輸入檔案旁",
            settings.format
        );
        Box::new(DefaultConfigAdapter::new(input, settings.clone()))
    } else {
        Box::new(InteractiveConfigAdapter::new(input, settings.clone()))
    };

    let config = ConfigService::new(config_port).get_config()?;
    run_and_remember(config, settings)
}

pub fn get_default_config_option(settings: &Settings) -> io::Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "是否使用已儲存的設定？（{} 格式、輸出至輸入檔案旁，僅需指定輸入檔案）",
            settings.format
        ))
        .default(false)
        .interact()
        .map_err(|e| prompt_error("預設配置選擇", e))
}

pub fn get_input_path(settings: &Settings) -> io::Result<String> {
    let mut prompt = Input::<String>::new()
        .with_prompt("請輸入 JSON 檔案或目錄路徑（例如：./report.json 或 ./docs）")
        .validate_with(|input: &String| -> Result<(), String> {
            if Path::new(input.trim()).exists() { Ok(()) } else { Err(format!("路徑 '{}' 不存在", input)) }
        });
    if let Some(dir) = &settings.last_used_directory {
        prompt = prompt.with_initial_text(format!("{}/", dir.trim_end_matches('/')));
    }
    prompt
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(|e| prompt_error("輸入路徑", e))
}

pub fn get_output_format(settings: &Settings) -> io::Result<OutputFormat> {
    let default = match settings.format {
        OutputFormat::Docx => 0,
        OutputFormat::Html => 1,
    };
    let index = Select::new()
        .with_prompt("選擇輸出格式（使用方向鍵選擇，按 Enter 確認）")
        .items(&["DOCX - Word 文件", "HTML - 網頁"])
        .default(default)
        .interact()
        .map_err(|e| prompt_error("輸出格式選擇", e))?;
    Ok(if index == 1 { OutputFormat::Html } else { OutputFormat::Docx })
}

pub fn get_batch_option(input: &str) -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否轉換資料夾中所有 JSON 檔案？")
        .default(Path::new(input).is_dir())
        .interact()
        .map_err(|e| prompt_error("批次模式選擇", e))
}

pub fn get_strings_options() -> io::Result<(String, bool)> {
    let strings = Input::<String>::new()
        .with_prompt("字串檔路徑（.json 或 .txt，留空表示不使用）")
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            let trimmed = input.trim();
            if trimmed.is_empty() || Path::new(trimmed).is_file() {
                Ok(())
            } else {
                Err(format!("檔案 '{}' 不存在", trimmed))
            }
        })
        .interact_text()
        .map_err(|e| prompt_error("字串檔輸入", e))?
        .trim()
        .to_string();

    let save_json = if strings.to_lowercase().ends_with(".txt") {
        Confirm::new()
            .with_prompt("是否將字串檔另存為 JSON（儲存在原檔旁）？")
            .default(false)
            .interact()
            .map_err(|e| prompt_error("字串檔儲存選項", e))?
    } else {
        false
    };
    Ok((strings, save_json))
}

pub fn get_output_options() -> io::Result<(bool, String)> {
    let specify_output = Confirm::new()
        .with_prompt("是否指定輸出目錄？（否則輸出至輸入檔案旁）")
        .default(false)
        .interact()
        .map_err(|e| prompt_error("輸出目錄選項", e))?;
    if !specify_output {
        return Ok((false, String::new()));
    }
    let output_dir = Input::<String>::new()
        .with_prompt("輸出目錄")
        .validate_with(|input: &String| -> Result<(), String> {
            if Path::new(input.trim()).is_dir() { Ok(()) } else { Err(format!("目錄 '{}' 不存在", input)) }
        })
        .interact_text()
        .map_err(|e| prompt_error("輸出目錄輸入", e))?;
    Ok((true, output_dir.trim().to_string()))
}

pub fn get_language(settings: &Settings) -> io::Result<String> {
    Input::<String>::new()
        .with_prompt(format!("文件語言（內建 {} 個常用標籤，例如 en-GB、fr-FR、zh-TW，亦可自行輸入）", LANGUAGES.len()))
        .default(settings.language.clone())
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() { Err("語言標籤不可為空".to_string()) } else { Ok(()) }
        })
        .interact_text()
        .map(|lang| {
            let lang = lang.trim().to_string();
            if !is_known_language(&lang) {
                log::warn!("未知的語言標籤：{}，仍將照用", lang);
            }
            lang
        })
        .map_err(|e| prompt_error("語言輸入", e))
}

pub fn get_dark_mode(settings: &Settings) -> io::Result<bool> {
    Confirm::new()
        .with_prompt("HTML 是否使用深色主題？")
        .default(settings.dark_mode)
        .interact()
        .map_err(|e| prompt_error("深色主題選項", e))
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    input: String,
    settings: Settings,
}

impl InteractiveConfigAdapter {
    pub fn new(input: String, settings: Settings) -> Self {
        InteractiveConfigAdapter { input, settings }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let format = get_output_format(&self.settings)?;
        let batch = get_batch_option(&self.input)?;
        let (strings, save_strings_json) = get_strings_options()?;
        let (specify_output, output_dir) = get_output_options()?;
        let (language, dark_mode) = match format {
            OutputFormat::Docx => (get_language(&self.settings)?, self.settings.dark_mode),
            OutputFormat::Html => (self.settings.language.clone(), get_dark_mode(&self.settings)?),
        };

        Ok(AppConfig {
            input: self.input.clone(),
            strings,
            save_strings_json,
            format,
            batch,
            specify_output,
            output_dir,
            language,
            dark_mode,
            no_progress: false,
        })
    }
}
