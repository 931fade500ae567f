use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use log::info;
use regex::Regex;
use tempfile::TempPath;

use crate::error::{ConversionError, Result};
use crate::models::strings::KeyValueDocument;

static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Key:\s*"([^"]+)",\s*Value:\s*"([^"]+)"\s*;?"#).expect("字串項目的正規表示式無效")
});

/// 解析舊版字串檔 `Key: "K", Value: "V";` 格式
pub struct StringsTextParser;

impl StringsTextParser {
    /// 依出現順序擷取所有項目，格式錯誤的片段直接略過
    pub fn parse(text: &str) -> KeyValueDocument {
        let mut document = KeyValueDocument::new();
        for caps in ENTRY_PATTERN.captures_iter(text) {
            document.insert(&caps[1], &caps[2]);
        }
        document
    }

    /// 輸出縮排兩格的 JSON，不跳脫 `/`、`<`、`>` 與非 ASCII 字元
    pub fn serialize(document: &KeyValueDocument) -> Result<String> {
        Ok(serde_json::to_string_pretty(document)?)
    }

    pub fn to_json(text: &str) -> Result<String> {
        Self::serialize(&Self::parse(text))
    }
}

/// 前置處理後的字串檔；若為暫存檔，持有者釋放時即刪除
#[derive(Debug, Default)]
pub struct PreparedStrings {
    path: Option<PathBuf>,
    temp: Option<TempPath>,
}

impl PreparedStrings {
    pub fn none() -> Self {
        PreparedStrings::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}

fn has_extension(path: &str, ext: &str) -> bool {
    path.to_lowercase().ends_with(ext)
}

/// 是否為需先轉換的舊版 .txt 字串檔
pub(crate) fn is_strings_text(path: &str) -> bool {
    has_extension(path.trim(), ".txt")
}

/// 將使用者指定的字串檔轉為轉換器可用的 JSON 路徑
///
/// - 空路徑：不替換字串
/// - `.txt`：解析後寫入原檔旁的 `.json`（`save_as_json`）或暫存檔
/// - 其他副檔名：原樣使用
pub fn prepare_strings_source(path: &str, save_as_json: bool) -> Result<PreparedStrings> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(PreparedStrings::none());
    }
    if !is_strings_text(path) {
        return Ok(PreparedStrings {
            path: Some(PathBuf::from(path)),
            temp: None,
        });
    }

    let source = Path::new(path);
    info!("轉換字串檔：{}", source.display());
    let text = fs::read_to_string(source).map_err(|e| ConversionError::IoRead {
        path: source.to_path_buf(),
        source: e,
    })?;
    let json = StringsTextParser::to_json(&text)?;

    if save_as_json {
        let target = source.with_extension("json");
        write_json(&target, &json)?;
        info!("已儲存轉換後的字串檔：{}", target.display());
        let target = target.canonicalize().unwrap_or(target);
        Ok(PreparedStrings {
            path: Some(target),
            temp: None,
        })
    } else {
        let temp = tempfile::Builder::new()
            .prefix("temp_strings_")
            .suffix(".json")
            .tempfile()
            .map_err(|e| ConversionError::IoWrite {
                path: std::env::temp_dir(),
                source: e,
            })?
            .into_temp_path();
        write_json(&temp, &json)?;
        info!("使用暫存字串 JSON：{}", temp.display());
        Ok(PreparedStrings {
            path: Some(temp.to_path_buf()),
            temp: Some(temp),
        })
    }
}

fn write_json(target: &Path, json: &str) -> Result<()> {
    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(fs::File::create(target)?);
        writer.write_all(json.as_bytes())?;
        writer.flush()
    };
    write().map_err(|e| ConversionError::IoWrite {
        path: target.to_path_buf(),
        source: e,
    })
}
