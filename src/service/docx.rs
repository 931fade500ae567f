use std::fs;
use std::io::{self, Write};
use chrono::Utc;
use log::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::config::{OutputFormat, DEFAULT_LANGUAGE};
use crate::models::conversion::ConversionRequest;
use crate::service::document::{Block, Document, Strings};
use crate::service::traits::i_service::{Converter, ConverterError, ConverterFault};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// 內建 DOCX 轉換器，輸出最小的 WordprocessingML 套件
pub struct DocxConverter;

impl DocxConverter {
    pub fn new() -> Self {
        DocxConverter
    }
}

impl Default for DocxConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DocxConverter {
    fn name(&self) -> &str {
        "內建 DOCX 轉換器"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError> {
        let strings = Strings::load(request.strings_path.as_deref())?;
        let document = Document::load(&request.input_path, &strings)?;
        let lang = request
            .language()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        let buffer = create_docx_buffer(&document, lang)
            .map_err(|e| ConverterFault::new("建立 DOCX 套件失敗", e))?;
        fs::write(&request.output_path, &buffer)
            .map_err(|e| ConverterFault::new(format!("無法寫入 {}", request.output_path.display()), e))?;
        info!(
            "生成 DOCX 檔案：{}，語言：{}，大小：{} 位元組",
            request.output_path.display(),
            lang,
            buffer.len()
        );
        Ok(())
    }
}

/// 將文件封裝成 DOCX（zip 容器）
pub fn create_docx_buffer(document: &Document, lang: &str) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(io::Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
        ("word/document.xml", document_xml(document)),
        ("word/styles.xml", styles_xml(lang)),
        ("docProps/core.xml", core_xml(&document.title, lang)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(buffer)
}

/// 跳脫 XML 特殊字元，並移除 XML 1.0 不允許的控制字元
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' | '\n' | '\r' => escaped.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn run_xml(text: &str, bold: bool) -> String {
    let props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        "<w:r>{}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        props,
        escape_xml(text)
    )
}

fn paragraph_xml(style: Option<&str>, runs: &str) -> String {
    let props = style
        .map(|s| format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", s))
        .unwrap_or_default();
    format!("<w:p>{}{}</w:p>", props, runs)
}

fn document_xml(document: &Document) -> String {
    let mut body = paragraph_xml(Some("Title"), &run_xml(&document.title, false));
    for block in &document.blocks {
        let paragraph = match block {
            Block::Heading { level, text } => {
                paragraph_xml(Some(&format!("Heading{}", level)), &run_xml(text, false))
            }
            Block::Field { label, value } => {
                let runs = format!("{}{}", run_xml(&format!("{}: ", label), true), run_xml(value, false));
                paragraph_xml(None, &runs)
            }
            Block::Paragraph(text) => paragraph_xml(None, &run_xml(text, false)),
            Block::ListItem(text) => paragraph_xml(Some("ListBullet"), &run_xml(&format!("• {}", text), false)),
        };
        body.push_str(&paragraph);
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"{}\"><w:body>{}<w:sectPr/></w:body></w:document>",
        W_NS, body
    )
}

fn styles_xml(lang: &str) -> String {
    let mut styles = String::new();
    styles.push_str("<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/></w:style>");
    styles.push_str("<w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/><w:rPr><w:b/><w:sz w:val=\"48\"/></w:rPr></w:style>");
    for level in 1..=6u8 {
        let size = 36 - (level as u32 - 1) * 4;
        styles.push_str(&format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\"><w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/><w:pPr><w:outlineLvl w:val=\"{}\"/></w:pPr><w:rPr><w:b/><w:sz w:val=\"{size}\"/></w:rPr></w:style>",
            level - 1
        ));
    }
    styles.push_str("<w:style w:type=\"paragraph\" w:styleId=\"ListBullet\"><w:name w:val=\"List Bullet\"/><w:basedOn w:val=\"Normal\"/><w:pPr><w:ind w:left=\"720\"/></w:pPr></w:style>");
    let lang = escape_xml(lang);
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:styles xmlns:w=\"{W_NS}\"><w:docDefaults><w:rPrDefault><w:rPr><w:lang w:val=\"{lang}\" w:eastAsia=\"{lang}\" w:bidi=\"{lang}\"/></w:rPr></w:rPrDefault></w:docDefaults>{styles}</w:styles>"
    )
}

fn core_xml(title: &str, lang: &str) -> String {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"><dc:title>{}</dc:title><dc:language>{}</dc:language><dcterms:created xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:created></cp:coreProperties>",
        escape_xml(title),
        escape_xml(lang)
    )
}
