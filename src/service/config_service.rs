use std::io;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::config::settings::Settings;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器：只指定輸入，其餘沿用已儲存的設定
pub struct DefaultConfigAdapter {
    input: String,
    settings: Settings,
}

impl DefaultConfigAdapter {
    pub fn new(input: String, settings: Settings) -> Self {
        DefaultConfigAdapter { input, settings }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        crate::config::config::validate_input_path(&self.input)?;
        Ok(AppConfig {
            input: self.input.clone(),
            strings: String::new(),
            save_strings_json: false,
            format: self.settings.format,
            batch: false,
            specify_output: false, // 輸出至輸入檔案旁
            output_dir: String::new(),
            language: self.settings.language.clone(),
            dark_mode: self.settings.dark_mode,
            no_progress: false,
        })
    }
}
