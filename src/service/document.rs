use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::service::file::base_name;
use crate::service::traits::i_service::{ConverterError, ConverterFault};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("佔位符正規表示式無效")
});

const MAX_HEADING_LEVEL: u8 = 6;

/// 內建轉換器共用的文件區塊
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Field { label: String, value: String },
    Paragraph(String),
    ListItem(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// 字串替換表
#[derive(Debug, Clone, Default)]
pub struct Strings {
    entries: IndexMap<String, String>,
}

impl Strings {
    pub fn load(path: Option<&Path>) -> Result<Self, ConverterError> {
        let Some(path) = path else {
            return Ok(Strings::default());
        };
        let content = fs::read_to_string(path)
            .map_err(|e| ConverterFault::new(format!("無法讀取字串檔 {}", path.display()), e))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ConverterFault::new(format!("字串檔 {} 不是有效的 JSON", path.display()), e))?;
        let Value::Object(map) = value else {
            return Err(format!("字串檔 {} 必須是 JSON 物件", path.display()).into());
        };
        let entries = map
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect();
        Ok(Strings { entries })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Strings {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// 整段文字等於某個鍵時直接替換，否則替換其中的 `{{鍵}}` 佔位符
    pub fn substitute<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.entries.is_empty() {
            return Cow::Borrowed(text);
        }
        if let Some(value) = self.entries.get(text) {
            return Cow::Owned(value.clone());
        }
        PLACEHOLDER.replace_all(text, |caps: &Captures| {
            self.entries
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
    }
}

impl Document {
    /// 讀取輸入 JSON 並展開為區塊
    pub fn load(input: &Path, strings: &Strings) -> Result<Self, ConverterError> {
        let content = fs::read_to_string(input)
            .map_err(|e| ConverterFault::new(format!("無法讀取輸入檔 {}", input.display()), e))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ConverterFault::new(format!("輸入檔 {} 不是有效的 JSON", input.display()), e))?;
        Ok(Self::from_value(&value, &base_name(input), strings))
    }

    pub fn from_value(value: &Value, fallback_title: &str, strings: &Strings) -> Self {
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .map(|t| strings.substitute(t).into_owned())
            .unwrap_or_else(|| fallback_title.to_string());
        let mut blocks = Vec::new();
        walk(value, 1, strings, &mut blocks);
        Document { title, blocks }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn walk(value: &Value, level: u8, strings: &Strings, blocks: &mut Vec<Block>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let label = strings.substitute(key).into_owned();
                match scalar_text(child) {
                    Some(text) => blocks.push(Block::Field {
                        label,
                        value: strings.substitute(&text).into_owned(),
                    }),
                    None => {
                        blocks.push(Block::Heading { level, text: label });
                        walk(child, (level + 1).min(MAX_HEADING_LEVEL), strings, blocks);
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match scalar_text(item) {
                    Some(text) => blocks.push(Block::ListItem(strings.substitute(&text).into_owned())),
                    None => walk(item, level, strings, blocks),
                }
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                blocks.push(Block::Paragraph(strings.substitute(&text).into_owned()));
            }
        }
    }
}
