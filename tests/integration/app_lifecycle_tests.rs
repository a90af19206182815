/*!
 * Integration tests for the full application lifecycle
 */

use pagebabel::document::TextNode;
use pagebabel::file_utils::FragmentDocument;
use pagebabel::providers::mock::MockProvider;
use pagebabel::Controller;

use crate::common;

fn mock_controller(provider: &MockProvider) -> Controller {
    let config = common::mock_config("Pirate");
    Controller::with_service(config, common::mock_service(provider, 500, 1))
}

#[tokio::test]
async fn test_run_plainText_shouldWriteTranslatedLinesNextToInput() {
    common::init_test_logger();
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "copy.txt", "Hello\n\nGoodbye\n").unwrap();
    let controller = Controller::with_config(common::mock_config("Pirate")).unwrap();

    let output = controller.run(&input, None).await.unwrap();

    assert_eq!(output, dir.path().join("copy.pirate.txt"));
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content, "[Pirate] Hello\n\n[Pirate] Goodbye\n");
}

#[tokio::test]
async fn test_run_jsonNodes_shouldTranslateVisibleNodesOnly() {
    let dir = common::create_temp_dir().unwrap();
    let nodes = vec![
        TextNode::new("title", "Home"),
        TextNode::new("h1", " Welcome "),
        TextNode::new("script", "gtag('js', new Date());"),
        TextNode::new("p", "Cheap flights"),
    ];
    let input = common::create_test_file(
        dir.path(),
        "page.json",
        &serde_json::to_string(&nodes).unwrap(),
    )
    .unwrap();
    let output_path = dir.path().join("out").join("page.json");
    let provider = MockProvider::working();

    let output = mock_controller(&provider).run(&input, Some(output_path.clone())).await.unwrap();

    assert_eq!(output, output_path);
    let translated: Vec<TextNode> = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(translated[0].text, "Home");
    assert_eq!(translated[1].text, "[Pirate] Welcome");
    assert_eq!(translated[2].text, nodes[2].text);
    assert_eq!(translated[3].text, "[Pirate] Cheap flights");
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_translateDocument_failingProvider_shouldKeepOriginals() {
    let provider = MockProvider::failing();
    let mut document = FragmentDocument::Texts(vec!["one".to_string(), "two".to_string()]);

    let stats = mock_controller(&provider)
        .translate_document(&mut document, |_, _| {})
        .await
        .unwrap();

    assert_eq!(document, FragmentDocument::Texts(vec!["one".to_string(), "two".to_string()]));
    assert_eq!(stats.fallbacks, 2);
}

#[tokio::test]
async fn test_translateDocument_nothingSelected_shouldNotCallProvider() {
    let provider = MockProvider::working();
    let mut document = FragmentDocument::Nodes(vec![TextNode::new("style", "body {}")]);

    mock_controller(&provider).translate_document(&mut document, |_, _| {}).await.unwrap();

    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_run_missingInput_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let controller = mock_controller(&MockProvider::working());

    assert!(controller.run(&dir.path().join("nope.txt"), None).await.is_err());
}

#[tokio::test]
async fn test_translateText_shouldUseConfiguredLanguage() {
    let controller = Controller::with_config(common::mock_config("Yoda")).unwrap();

    assert_eq!(controller.translate_text("Hello there").await.unwrap(), "[Yoda] Hello there");
    assert!(controller.check_connection().await.is_ok());
}

#[tokio::test]
async fn test_checkConnection_failingProvider_shouldFail() {
    let controller = mock_controller(&MockProvider::failing());
    assert!(controller.check_connection().await.is_err());
}
