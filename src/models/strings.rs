use indexmap::IndexMap;
use serde::Serialize;

/// 有序的字串鍵值表，保留第一次出現的位置，值以最後一次出現為準
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyValueDocument {
    entries: IndexMap<String, String>,
}

impl KeyValueDocument {
    pub fn new() -> Self {
        KeyValueDocument::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        // IndexMap::insert 覆寫既有鍵時保留原本位置
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
