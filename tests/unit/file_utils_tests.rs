/*!
 * Tests for input and output file handling
 */

use pagebabel::document::{FragmentFilter, TextNode};
use pagebabel::file_utils::{FileManager, FragmentDocument};
use pagebabel::TranslationError;

use crate::common;

#[test]
fn test_load_jsonNodes_shouldSelectVisibleCopyOnly() {
    let dir = common::create_temp_dir().unwrap();
    let content = r#"[
        {"parent_tag": "script", "text": "gtag('config')"},
        {"parent_tag": "h1", "text": "  Welcome  "},
        {"parent_tag": "p", "text": "Google Analytics snippet"},
        {"parent_tag": "p", "text": "Enjoy"}
    ]"#;
    let path = common::create_test_file(dir.path(), "page.json", content).unwrap();

    let document = FragmentDocument::load(&path).unwrap();
    let indices = document.select(&FragmentFilter::default());

    assert_eq!(indices, vec![1, 3]);
    assert_eq!(document.originals(&indices), vec!["Welcome", "Enjoy"]);
}

#[test]
fn test_splice_nodes_shouldRenderSameShape() {
    let mut document = FragmentDocument::Nodes(vec![
        TextNode::new("style", "body {}"),
        TextNode::new("p", "Hello"),
    ]);

    document.splice(&[1], &["Ahoy".to_string()]).unwrap();
    let rendered: Vec<TextNode> = serde_json::from_str(&document.render().unwrap()).unwrap();

    assert_eq!(rendered, vec![TextNode::new("style", "body {}"), TextNode::new("p", "Ahoy")]);
}

#[test]
fn test_splice_texts_wrongCount_shouldLeaveDocumentUntouched() {
    let original = FragmentDocument::Texts(vec!["a".to_string(), "b".to_string()]);
    let mut document = original.clone();

    let error = document.splice(&[0, 1], &["x".to_string()]).unwrap_err();

    assert!(matches!(error, TranslationError::LengthMismatch { expected: 2, actual: 1 }));
    assert_eq!(document, original);
}

#[test]
fn test_texts_shouldRoundTripAsJsonArray() {
    let document = FragmentDocument::parse(r#"["one", "", "three"]"#).unwrap();

    assert_eq!(document.len(), 3);
    assert_eq!(document.select(&FragmentFilter::default()), vec![0, 2]);
    let rendered: Vec<String> = serde_json::from_str(&document.render().unwrap()).unwrap();
    assert_eq!(rendered, vec!["one", "", "three"]);
}

#[test]
fn test_writeToFile_shouldCreateParentDirectories() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("nested").join("out.txt");

    FileManager::write_to_file(&path, "hello").unwrap();

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn test_load_missingFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    assert!(FragmentDocument::load(dir.path().join("missing.txt")).is_err());
}

#[test]
fn test_load_plainTextStartingWithBracket_shouldReadLines() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "copy.txt", "[Intro] Welcome\nSecond\n").unwrap();

    let document = FragmentDocument::load(&path).unwrap();

    assert_eq!(
        document,
        FragmentDocument::Lines(vec!["[Intro] Welcome".to_string(), "Second".to_string()])
    );
    assert_eq!(document.select(&FragmentFilter::default()), vec![0, 1]);
}

#[test]
fn test_parse_jsonArrayOfNumbers_shouldStillFail() {
    assert!(FragmentDocument::parse("[1, 2, 3]").is_err());
    assert!(FragmentDocument::parse(r#"[{"tag": "p"}]"#).is_err());
}
