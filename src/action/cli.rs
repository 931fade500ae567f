use std::io;
use clap::Parser;
use log::{info, warn};

use crate::action::interactive::process_interactive_mode;
use crate::config::config::{is_known_language, validate_input_path, Cli};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::config::settings::Settings;
use crate::models::conversion::ConversionSummary;
use crate::service::config_service::ConfigService;
use crate::service::registry::ConverterRegistry;
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::setup_logging;

pub fn process_args(args: Vec<String>) -> io::Result<ConversionSummary> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<ConversionSummary> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref().unwrap_or("info"))?;

    let settings = if cli.reset_settings {
        let settings = match Settings::default_path() {
            Some(path) => Settings::reset(&path)?,
            None => Settings::default(),
        };
        println!("已恢復預設設定");
        if cli.input.is_none() {
            return Ok(ConversionSummary::default());
        }
        settings
    } else {
        Settings::load()
    };

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone(), settings.clone())));
    let config = config_service.get_config()?;
    let summary = run_and_remember(config.clone(), settings)?;

    // 若啟用 --show-config，在轉換後顯示配置
    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    Ok(summary)
}

/// 執行轉換並將本次選擇寫回設定
pub fn run_and_remember(config: AppConfig, mut settings: Settings) -> io::Result<ConversionSummary> {
    let conversion_port: Box<dyn ConversionPort> =
        Box::new(ConversionAdapter::new(ConverterRegistry::from_settings(&settings)));
    let summary = conversion_port.execute(config.clone())?;

    remember_config(&mut settings, &config);
    if let Err(e) = settings.save() {
        warn!("無法儲存設定：{}", e);
    }
    Ok(summary)
}

pub fn remember_config(settings: &mut Settings, config: &AppConfig) {
    settings.remember_input(std::path::Path::new(config.input.trim()));
    settings.format = config.format;
    settings.language = config.language.clone();
    settings.dark_mode = config.dark_mode;
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
    settings: Settings,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli, settings: Settings) -> Self {
        CliConfigAdapter { cli, settings }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let input = self.cli.input.clone().unwrap_or_default();
        validate_input_path(&input)?;

        let strings = self.cli.strings.clone().unwrap_or_default();
        if self.cli.save_strings_json && !strings.trim().to_lowercase().ends_with(".txt") {
            warn!("--save-strings-json 僅適用於 .txt 字串檔，已忽略");
        }

        let language = self.cli.lang.clone().unwrap_or_else(|| self.settings.language.clone());
        if !is_known_language(&language) {
            warn!("未知的語言標籤：{}，仍將照用", language);
        }

        let config = AppConfig {
            input,
            strings,
            save_strings_json: self.cli.save_strings_json,
            format: self.cli.format.unwrap_or(self.settings.format),
            batch: self.cli.batch,
            specify_output: self.cli.output.is_some(),
            output_dir: self.cli.output.clone().unwrap_or_default(),
            language,
            dark_mode: self.cli.dark_mode.unwrap_or(self.settings.dark_mode),
            no_progress: self.cli.no_progress,
        };
        info!(
            "使用配置：format={}, batch={}, output={:?}, strings={:?}",
            config.format,
            config.batch,
            self.cli.output,
            self.cli.strings
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::OutputFormat;
    use pretty_assertions::assert_eq;

    fn json_file(dir: &std::path::Path) -> String {
        let file = dir.join("doc.json");
        std::fs::write(&file, "{}").unwrap();
        file.to_string_lossy().to_string()
    }

    #[test]
    fn flags_override_settings() {
        let dir = tempfile::tempdir().unwrap();
        let input = json_file(dir.path());
        let cli = Cli::parse_from([
            "json_converter", input.as_str(), "--format", "html", "--dark-mode", "false",
            "-o", "/out", "--strings", "gui.txt", "--save-strings-json", "--batch",
        ]);
        let settings = Settings { dark_mode: true, ..Settings::default() };

        let config = CliConfigAdapter::new(cli, settings).get_config().unwrap();
        assert_eq!(
            config,
            AppConfig {
                input,
                strings: "gui.txt".to_string(),
                save_strings_json: true,
                format: OutputFormat::Html,
                batch: true,
                specify_output: true,
                output_dir: "/out".to_string(),
                language: "en-GB".to_string(),
                dark_mode: false,
                no_progress: false,
            }
        );
    }

    #[test]
    fn settings_fill_missing_flags() {
        let dir = tempfile::tempdir().unwrap();
        let input = json_file(dir.path());
        let cli = Cli::parse_from(["json_converter", input.as_str()]);
        let settings = Settings {
            format: OutputFormat::Docx,
            language: "ja-JP".to_string(),
            ..Settings::default()
        };

        let config = CliConfigAdapter::new(cli, settings).get_config().unwrap();
        assert_eq!(config.format, OutputFormat::Docx);
        assert_eq!(config.language, "ja-JP");
        assert!(!config.specify_output);
        assert_eq!(config.output_dir, "");
    }

    #[test]
    fn missing_input_is_rejected() {
        let cli = Cli::parse_from(["json_converter", "--format", "docx"]);
        let err = CliConfigAdapter::new(cli, Settings::default()).get_config().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn remembers_last_choices() {
        let dir = tempfile::tempdir().unwrap();
        let input = json_file(dir.path());
        let config = AppConfig {
            input,
            strings: String::new(),
            save_strings_json: false,
            format: OutputFormat::Html,
            batch: false,
            specify_output: false,
            output_dir: String::new(),
            language: "de-DE".to_string(),
            dark_mode: true,
            no_progress: true,
        };
        let mut settings = Settings::default();
        remember_config(&mut settings, &config);
        assert_eq!(settings.format, OutputFormat::Html);
        assert_eq!(settings.language, "de-DE");
        assert!(settings.dark_mode);
        assert!(settings.last_used_directory.is_some());
    }
}
