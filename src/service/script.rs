use std::ffi::OsString;
use std::process::Command;
use log::{debug, info};

use crate::config::config::OutputFormat;
use crate::models::conversion::{ConversionRequest, FormatOption};
use crate::service::traits::i_service::{Converter, ConverterError, ConverterFault};

/// 以外部程式執行轉換的轉換器
///
/// 呼叫方式：`<program> [args...] --input <檔案> --output <檔案> [--strings <檔案>]`，
/// 再附上 `--lang <標籤>`（DOCX）或 `--dark-mode <true|false>`（HTML）。
pub struct ScriptConverter {
    name: String,
    format: OutputFormat,
    program: String,
    args: Vec<String>,
}

impl ScriptConverter {
    pub fn new(format: OutputFormat, program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        ScriptConverter {
            name: format!("外部 {} 轉換器（{}）", format, program),
            format,
            program,
            args,
        }
    }

    /// 組出傳給外部程式的參數
    pub fn command_args(&self, request: &ConversionRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.push("--input".into());
        args.push(request.input_path.clone().into_os_string());
        args.push("--output".into());
        args.push(request.output_path.clone().into_os_string());
        if let Some(strings) = &request.strings_path {
            args.push("--strings".into());
            args.push(strings.clone().into_os_string());
        }
        match &request.option {
            FormatOption::Language(lang) => {
                args.push("--lang".into());
                args.push(lang.into());
            }
            FormatOption::DarkMode(dark) => {
                args.push("--dark-mode".into());
                args.push(dark.to_string().into());
            }
        }
        args
    }
}

impl Converter for ScriptConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError> {
        let args = self.command_args(request);
        debug!("執行外部轉換器：{} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| ConverterFault::new(format!("無法啟動外部轉換器 {}", self.program), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            info!("[{}] {}", self.program, line);
        }

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Err(format!("外部轉換器 {} 結束狀態異常：{}", self.program, output.status).into())
        } else {
            Err(stderr.to_string().into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use pretty_assertions::assert_eq;

    fn request(option: FormatOption, strings: Option<&str>) -> ConversionRequest {
        ConversionRequest {
            input_path: PathBuf::from("/in/a.json"),
            strings_path: strings.map(PathBuf::from),
            output_path: PathBuf::from("/out/a.docx"),
            format: OutputFormat::Docx,
            option,
        }
    }

    #[test]
    fn builds_docx_arguments() {
        let converter = ScriptConverter::new(OutputFormat::Docx, "groovy", vec!["JsonToDocx.groovy".to_string()]);
        let args = converter.command_args(&request(FormatOption::Language("de-DE".into()), Some("/s.json")));
        let expected: Vec<OsString> = [
            "JsonToDocx.groovy", "--input", "/in/a.json", "--output", "/out/a.docx",
            "--strings", "/s.json", "--lang", "de-DE",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn builds_html_arguments_without_strings() {
        let converter = ScriptConverter::new(OutputFormat::Html, "render", vec![]);
        let args = converter.command_args(&request(FormatOption::DarkMode(true), None));
        let expected: Vec<OsString> = ["--input", "/in/a.json", "--output", "/out/a.docx", "--dark-mode", "true"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn missing_program_reports_spawn_failure() {
        let converter = ScriptConverter::new(OutputFormat::Docx, "/definitely/not/a/program", vec![]);
        let err = converter.run(&request(FormatOption::Language("en-GB".into()), None)).unwrap_err();
        assert!(err.to_string().contains("無法啟動外部轉換器"));
        assert!(std::error::Error::source(err.as_ref()).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_reports_stderr() {
        let converter = ScriptConverter::new(
            OutputFormat::Docx,
            "sh",
            vec!["-c".to_string(), "echo 'template missing' >&2; exit 3".to_string(), "converter".to_string()],
        );
        let err = converter.run(&request(FormatOption::Language("en-GB".into()), None)).unwrap_err();
        assert_eq!(err.to_string(), "template missing");
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_succeeds() {
        let converter = ScriptConverter::new(
            OutputFormat::Html,
            "sh",
            vec!["-c".to_string(), "exit 0".to_string(), "converter".to_string()],
        );
        assert!(converter.run(&request(FormatOption::DarkMode(false), None)).is_ok());
    }
}
