use std::path::{Path, PathBuf};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::config::config::OutputFormat;
use crate::error::{ConversionError, Result};
use crate::models::file::BatchJob;

fn is_json_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".json")
}

/// 批次模式的來源目錄：輸入本身是目錄則用之，否則取其所在目錄
pub fn batch_directory(input_path: &Path) -> PathBuf {
    if input_path.is_dir() {
        return input_path.to_path_buf();
    }
    match input_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// 列出目錄下（不遞迴）所有副檔名為 .json 的檔案，不分大小寫，依檔名排序
///
/// 目錄不存在或無法讀取時視為空批次
pub fn discover_batch(input_path: &Path) -> BatchJob {
    let directory = batch_directory(input_path);
    let mut files = Vec::new();
    for entry in WalkDir::new(&directory).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                warn!("無法讀取目錄 {}：{}", directory.display(), e);
                break;
            }
            Err(e) => {
                warn!("略過無法讀取的項目：{}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if is_json_file_name(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        } else {
            debug!("略過非 JSON 檔案：{}", entry.path().display());
        }
    }
    if files.is_empty() {
        warn!("目錄中沒有 .json 檔案：{}", directory.display());
    }
    BatchJob { directory, files }
}

/// 去除最後一個副檔名後的檔名
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 決定輸出檔案路徑：指定輸出目錄時放在該目錄，否則放在輸入檔案旁
pub fn derive_output_path(
    input_file: &Path,
    format: OutputFormat,
    specify_output: bool,
    output_dir: &str,
) -> Result<PathBuf> {
    let file_name = format!("{}.{}", base_name(input_file), format.extension());
    if specify_output {
        let output_dir = output_dir.trim();
        if output_dir.is_empty() {
            return Err(ConversionError::Configuration(
                "已啟用指定輸出目錄，但未提供輸出目錄".to_string(),
            ));
        }
        Ok(Path::new(output_dir).join(file_name))
    } else {
        let parent = input_file.parent().unwrap_or_else(|| Path::new(""));
        Ok(parent.join(file_name))
    }
}
