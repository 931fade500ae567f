use std::collections::HashMap;
use log::{info, warn};

use crate::config::config::OutputFormat;
use crate::config::settings::{ConverterSetting, Settings};
use crate::error::{ConversionError, Result};
use crate::service::docx::DocxConverter;
use crate::service::html::HtmlConverter;
use crate::service::script::ScriptConverter;
use crate::service::traits::i_service::Converter;

/// 依輸出格式查找轉換器
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<OutputFormat, Box<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        ConverterRegistry::default()
    }

    /// 內建 DOCX 與 HTML 轉換器
    pub fn with_builtins() -> Self {
        let mut registry = ConverterRegistry::new();
        registry.register(Box::new(DocxConverter::new()));
        registry.register(Box::new(HtmlConverter::new()));
        registry
    }

    /// 依設定建立，停用的格式不註冊
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = ConverterRegistry::new();
        for format in [OutputFormat::Docx, OutputFormat::Html] {
            let converter: Box<dyn Converter> = match settings.converter_for(format) {
                ConverterSetting::Builtin => match format {
                    OutputFormat::Docx => Box::new(DocxConverter::new()),
                    OutputFormat::Html => Box::new(HtmlConverter::new()),
                },
                ConverterSetting::Script { program, args } => {
                    Box::new(ScriptConverter::new(format, program.clone(), args.clone()))
                }
                ConverterSetting::Disabled => {
                    warn!("{} 轉換器已停用", format);
                    continue;
                }
            };
            info!("使用 {}", converter.name());
            registry.register(converter);
        }
        registry
    }

    /// 註冊轉換器，同格式的舊轉換器會被取代
    pub fn register(&mut self, converter: Box<dyn Converter>) {
        self.converters.insert(converter.format(), converter);
    }

    pub fn resolve(&self, format: OutputFormat) -> Result<&dyn Converter> {
        self.converters
            .get(&format)
            .map(|c| &**c)
            .ok_or(ConversionError::ConverterUnavailable(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cover_both_formats() {
        let registry = ConverterRegistry::with_builtins();
        assert_eq!(registry.resolve(OutputFormat::Docx).unwrap().format(), OutputFormat::Docx);
        assert_eq!(registry.resolve(OutputFormat::Html).unwrap().format(), OutputFormat::Html);
    }

    #[test]
    fn disabled_format_is_unavailable() {
        let settings = Settings {
            html_converter: ConverterSetting::Disabled,
            docx_converter: ConverterSetting::Script { program: "groovy".into(), args: vec![] },
            ..Settings::default()
        };
        let registry = ConverterRegistry::from_settings(&settings);
        assert!(matches!(
            registry.resolve(OutputFormat::Html),
            Err(ConversionError::ConverterUnavailable(OutputFormat::Html))
        ));
        assert!(registry.resolve(OutputFormat::Docx).unwrap().name().contains("groovy"));
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        assert!(ConverterRegistry::new().resolve(OutputFormat::Docx).is_err());
    }
}
