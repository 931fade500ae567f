use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;
use chrono::Local;
use log::info;
use regex::{Captures, Regex};

use crate::config::config::OutputFormat;
use crate::models::conversion::ConversionRequest;
use crate::service::document::{Block, Document, Strings};
use crate::service::traits::i_service::{Converter, ConverterError, ConverterFault};

const HTML_TEMPLATE: &str = include_str!("../../assets/template/html_template.html");

static TEMPLATE_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Z_]+)\}\}").expect("模板佔位符正規表示式無效")
});

const LIGHT_THEME_CSS: &str = "body.light { background: #ffffff; color: #1f2328; }\nbody.light h1, body.light h2 { border-bottom: 1px solid #d0d7de; }";
const DARK_THEME_CSS: &str = "body.dark { background: #0d1117; color: #e6edf3; }\nbody.dark h1, body.dark h2 { border-bottom: 1px solid #30363d; }\nbody.dark a { color: #58a6ff; }";

/// 內建 HTML 轉換器
pub struct HtmlConverter;

impl HtmlConverter {
    pub fn new() -> Self {
        HtmlConverter
    }
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for HtmlConverter {
    fn name(&self) -> &str {
        "內建 HTML 轉換器"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError> {
        let strings = Strings::load(request.strings_path.as_deref())?;
        let document = Document::load(&request.input_path, &strings)?;
        let html_content = generate_html_content(&document, request.dark_mode());
        write_html_file(&html_content, &request.output_path)
            .map_err(|e| ConverterFault::new(format!("無法寫入 {}", request.output_path.display()), e))?;
        info!(
            "生成 HTML 檔案：{}，大小：{} 位元組",
            request.output_path.display(),
            html_content.len()
        );
        Ok(())
    }
}

/// 依文件內容與主題替換模板中的佔位符
pub fn generate_html_content(document: &Document, dark_mode: bool) -> String {
    let (theme_class, theme_css) = if dark_mode {
        ("dark", DARK_THEME_CSS)
    } else {
        ("light", LIGHT_THEME_CSS)
    };
    let generated_at = Local::now().to_rfc3339();
    let title = escape_html(&document.title);
    let body = render_blocks(&document.blocks);
    // 單次掃描模板，填入的內容不會再被當成佔位符
    TEMPLATE_SLOT
        .replace_all(HTML_TEMPLATE, |caps: &Captures| match &caps[1] {
            "GENERATED_AT" => generated_at.clone(),
            "THEME_CSS" => theme_css.to_string(),
            "THEME_CLASS" => theme_class.to_string(),
            "TITLE" => title.clone(),
            "BODY" => body.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut in_list = false;
    for block in blocks {
        let is_item = matches!(block, Block::ListItem(_));
        if in_list && !is_item {
            out.push_str("</ul>\n");
        } else if !in_list && is_item {
            out.push_str("<ul>\n");
        }
        in_list = is_item;

        match block {
            Block::Heading { level, text } => {
                // h1 保留給標題
                let level = (*level + 1).min(6);
                out.push_str(&format!("<h{level}>{}</h{level}>\n", escape_html(text)));
            }
            Block::Field { label, value } => out.push_str(&format!(
                "<p class=\"field\"><span class=\"label\">{}</span>{}</p>\n",
                escape_html(label),
                escape_html(value)
            )),
            Block::Paragraph(text) => out.push_str(&format!("<p>{}</p>\n", escape_html(text))),
            Block::ListItem(text) => out.push_str(&format!("<li>{}</li>\n", escape_html(text))),
        }
    }
    if in_list {
        out.push_str("</ul>\n");
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 將 HTML 內容寫入檔案
pub fn write_html_file(html_content: &str, output_path: &Path) -> std::io::Result<()> {
    let file = fs::File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html_content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversion::FormatOption;

    fn request(dir: &Path, input: &str, dark: bool, strings: Option<&Path>) -> ConversionRequest {
        let input_path = dir.join("in.json");
        fs::write(&input_path, input).unwrap();
        ConversionRequest {
            input_path,
            strings_path: strings.map(Path::to_path_buf),
            output_path: dir.join("in.html"),
            format: OutputFormat::Html,
            option: FormatOption::DarkMode(dark),
        }
    }

    #[test]
    fn renders_document_with_substituted_strings() {
        let dir = tempfile::tempdir().unwrap();
        let strings = dir.path().join("strings.json");
        fs::write(&strings, r#"{ "HELLO": "Bonjour <monde>" }"#).unwrap();
        let req = request(dir.path(), r#"{ "greeting": "HELLO", "items": ["one", "two"] }"#, false, Some(&strings));

        HtmlConverter::new().run(&req).unwrap();
        let html = fs::read_to_string(&req.output_path).unwrap();
        assert!(html.contains("<title>in</title>"));
        assert!(html.contains("Bonjour &lt;monde&gt;"));
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
        assert!(html.contains("class=\"light\""));
    }

    #[test]
    fn dark_mode_selects_dark_theme() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), r#"{ "a": 1 }"#, true, None);
        HtmlConverter::new().run(&req).unwrap();
        let html = fs::read_to_string(&req.output_path).unwrap();
        assert!(html.contains("class=\"dark\""));
        assert!(html.contains("#0d1117"));
    }

    #[test]
    fn invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), "not json", false, None);
        assert!(HtmlConverter::new().run(&req).is_err());
        assert!(!req.output_path.exists());
    }

    #[test]
    fn placeholder_text_in_content_is_left_alone() {
        let value = serde_json::json!({ "title": "{{BODY}}", "x": "secret-body {{TITLE}}" });
        let document = Document::from_value(&value, "page", &Strings::default());
        let html = generate_html_content(&document, false);
        assert!(html.contains("<title>{{BODY}}</title>"));
        assert!(html.contains("<h1>{{BODY}}</h1>"));
        assert!(html.contains("secret-body {{TITLE}}"));
        assert_eq!(html.matches("secret-body").count(), 1);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
    }
}
