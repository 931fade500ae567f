use std::io;

use json_converter::action::cli::process_args;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let summary = process_args(args)?;
    log::info!(
        "程式執行完成，共處理 {} 個檔案，成功 {} 個，失敗 {} 個",
        summary.processed_files, summary.succeeded, summary.failed
    );
    if summary.processed_files > 0 {
        println!("轉換完成！成功 {} 個，失敗 {} 個", summary.succeeded, summary.failed);
    }
    Ok(())
}
