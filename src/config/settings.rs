use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::config::{OutputFormat, DEFAULT_LANGUAGE};

const SETTINGS_FILE: &str = "settings.json";

/// 各格式所使用的轉換器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConverterSetting {
    #[default]
    Builtin,
    Script {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Disabled,
}

/// 跨次執行保存的使用者設定，啟動時載入、結束時儲存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub last_used_directory: Option<String>,
    pub format: OutputFormat,
    pub language: String,
    pub dark_mode: bool,
    pub docx_converter: ConverterSetting,
    pub html_converter: ConverterSetting,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            last_used_directory: None,
            format: OutputFormat::Docx,
            language: DEFAULT_LANGUAGE.to_string(),
            dark_mode: false,
            docx_converter: ConverterSetting::Builtin,
            html_converter: ConverterSetting::Builtin,
        }
    }
}

impl Settings {
    /// 設定檔位置
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("json_converter").join(SETTINGS_FILE))
    }

    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Settings::default(),
        }
    }

    /// 讀取設定；檔案不存在或內容損毀時回傳預設值
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Settings::default(),
            Err(e) => {
                warn!("無法讀取設定檔 {}：{}，使用預設設定", path.display(), e);
                return Settings::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("設定檔 {} 格式錯誤：{}，使用預設設定", path.display(), e);
            Settings::default()
        })
    }

    pub fn save(&self) -> io::Result<()> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => {
                warn!("無法解析設定檔位置，略過儲存");
                Ok(())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }

    /// 刪除已儲存的設定，回傳預設值
    pub fn reset(path: &Path) -> io::Result<Self> {
        match fs::remove_file(path) {
            Ok(()) => info!("已清除設定檔：{}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        Ok(Settings::default())
    }

    pub fn converter_for(&self, format: OutputFormat) -> &ConverterSetting {
        match format {
            OutputFormat::Docx => &self.docx_converter,
            OutputFormat::Html => &self.html_converter,
        }
    }

    /// 記住輸入所在的目錄，供下次選擇檔案時使用
    pub fn remember_input(&mut self, input: &Path) {
        let dir = if input.is_dir() {
            Some(input.to_path_buf())
        } else {
            input.parent().map(Path::to_path_buf)
        };
        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            let dir = dir.canonicalize().unwrap_or(dir);
            self.last_used_directory = Some(dir.to_string_lossy().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.language, "en-GB");
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            last_used_directory: Some("/tmp/docs".to_string()),
            format: OutputFormat::Html,
            language: "fr-FR".to_string(),
            dark_mode: true,
            docx_converter: ConverterSetting::Script {
                program: "groovy".to_string(),
                args: vec!["JsonToDocxScript.groovy".to_string()],
            },
            html_converter: ConverterSetting::Disabled,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "dark_mode": true, "html_converter": { "kind": "disabled" } }"#).unwrap();
        let settings = Settings::load_from(&path);
        assert!(settings.dark_mode);
        assert_eq!(settings.language, DEFAULT_LANGUAGE);
        assert_eq!(settings.converter_for(OutputFormat::Html), &ConverterSetting::Disabled);
        assert_eq!(settings.converter_for(OutputFormat::Docx), &ConverterSetting::Builtin);
    }

    #[test]
    fn reset_removes_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        Settings { dark_mode: true, ..Settings::default() }.save_to(&path).unwrap();
        let settings = Settings::reset(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(settings, Settings::default());
        // 不存在時也不應失敗
        Settings::reset(&path).unwrap();
    }

    #[test]
    fn remembers_parent_of_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.json");
        fs::write(&file, "{}").unwrap();
        let mut settings = Settings::default();
        settings.remember_input(&file);
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(settings.last_used_directory, Some(expected.to_string_lossy().to_string()));
    }
}
