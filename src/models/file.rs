use std::path::PathBuf;

/// 批次模式探索到的輸入檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

impl BatchJob {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}
