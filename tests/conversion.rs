use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc::channel;

use json_converter::config::config::OutputFormat;
use json_converter::facade::conversion_facade::ConversionFacade;
use json_converter::facade::traits::i_conversion::ConversionFacadeTrait;
use json_converter::models::conversion::{BatchOutcome, ConversionInput, ConversionSummary, ProgressEvent};
use json_converter::service::registry::ConverterRegistry;
use pretty_assertions::assert_eq;

fn input_for(path: &Path, format: OutputFormat) -> ConversionInput {
    ConversionInput {
        input_path: path.to_path_buf(),
        strings_path: String::new(),
        save_strings_json: false,
        format,
        batch: false,
        specify_output: false,
        output_dir: String::new(),
        language: "fr-FR".to_string(),
        dark_mode: true,
    }
}

fn run(input: ConversionInput) -> (BatchOutcome, Vec<ProgressEvent>) {
    let facade = ConversionFacade::new(ConverterRegistry::with_builtins());
    let (tx, rx) = channel();
    let outcome = facade.execute_conversion(input, &tx).unwrap();
    drop(tx);
    (outcome, rx.into_iter().collect())
}

#[test]
fn converts_single_file_to_html_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.json");
    fs::write(&source, r#"{"title": "Quarterly <Report>", "owner": "Ana", "tags": ["a", "b"]}"#).unwrap();

    let (outcome, events) = run(input_for(&source, OutputFormat::Html));

    assert_eq!(
        ConversionSummary::from(&outcome),
        ConversionSummary { processed_files: 1, succeeded: 1, failed: 0 }
    );
    let html = fs::read_to_string(dir.path().join("report.html")).unwrap();
    assert!(html.contains("Quarterly &lt;Report&gt;"));
    assert!(html.contains("class=\"dark\""));
    assert!(html.contains("<li>a</li>"));
    assert_eq!(events.last(), Some(&ProgressEvent::Finished));
}

#[test]
fn batch_writes_docx_into_output_directory_and_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.json"), r#"{"name": "first"}"#).unwrap();
    fs::write(dir.path().join("b.json"), "not json").unwrap();
    fs::write(dir.path().join("c.JSON"), r#"["x"]"#).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut input = input_for(&dir.path().join("a.json"), OutputFormat::Docx);
    input.batch = true;
    input.specify_output = true;
    input.output_dir = out.path().to_string_lossy().to_string();

    let (outcome, events) = run(input);

    let BatchOutcome::Completed(results) = &outcome else {
        panic!("預期批次完成，實際為 {:?}", outcome);
    };
    let names: Vec<String> = results
        .iter()
        .map(|r| r.output_path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.docx", "b.docx", "c.docx"]);
    assert!(results[0].is_success());
    assert!(!results[1].is_success());
    assert!(results[2].is_success());
    assert!(results[1].error.is_some());

    let file = fs::File::open(out.path().join("a.docx")).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut styles = String::new();
    archive.by_name("word/styles.xml").unwrap().read_to_string(&mut styles).unwrap();
    assert!(styles.contains("fr-FR"));

    assert!(events.contains(&ProgressEvent::BatchDiscovered {
        directory: dir.path().to_path_buf(),
        total: 3,
    }));
}

#[test]
fn strings_text_file_is_applied_and_saved_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("gui.json");
    fs::write(&source, r#"{"title": "app.title", "greeting": "Hi {{user}}"}"#).unwrap();
    let strings = dir.path().join("strings.txt");
    fs::write(
        &strings,
        "Key: \"app.title\", Value: \"Settings Panel\";\nKey: \"user\", Value: \"Ana\";\n",
    )
    .unwrap();

    let mut input = input_for(&source, OutputFormat::Html);
    input.strings_path = strings.to_string_lossy().to_string();
    input.save_strings_json = true;

    let (outcome, events) = run(input);

    assert_eq!(ConversionSummary::from(&outcome).succeeded, 1);
    let saved = fs::read_to_string(dir.path().join("strings.json")).unwrap();
    assert_eq!(saved, "{\n  \"app.title\": \"Settings Panel\",\n  \"user\": \"Ana\"\n}");
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::StringsConverted { temporary: false, .. })));

    let html = fs::read_to_string(dir.path().join("gui.html")).unwrap();
    assert!(html.contains("<title>Settings Panel</title>"));
    assert!(html.contains("Hi Ana"));
}

#[test]
fn empty_batch_directory_reports_no_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.md"), "# nothing").unwrap();

    let mut input = input_for(dir.path(), OutputFormat::Html);
    input.batch = true;

    let (outcome, events) = run(input);
    assert_eq!(outcome, BatchOutcome::NoMatchingFiles { directory: dir.path().to_path_buf() });
    assert_eq!(
        events,
        vec![
            ProgressEvent::NoMatchingFiles { directory: dir.path().to_path_buf() },
            ProgressEvent::Finished,
        ]
    );
}
