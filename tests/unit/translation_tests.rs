/*!
 * Tests for fragment normalization, prompt building and response parsing
 */

use pagebabel::translation::normalizer::{normalize, TextUnit, DEFAULT_MAX_CHARS, TRUNCATION_MARKER};
use pagebabel::translation::parser::{extract_labeled_translation, parse_batch_response};
use pagebabel::translation::prompts::{
    build_batch_prompt, build_single_prompt, format_response_line, ITEMS_HEADER, LINE_PREFIX_LEN,
};

#[test]
fn test_normalize_examples_shouldMatchExpectedForms() {
    assert_eq!(normalize("  line1\nline2  ", DEFAULT_MAX_CHARS), "line1 line2");
    assert_eq!(normalize("", DEFAULT_MAX_CHARS), "");

    let long = normalize(&"x".repeat(350), DEFAULT_MAX_CHARS);
    assert_eq!(long, format!("{}{}", "x".repeat(300), TRUNCATION_MARKER));
    assert_eq!(long.chars().count(), 303);
}

#[test]
fn test_normalize_shouldNeverContainLineBreaks() {
    for raw in ["a\nb", "a\r\nb", "\r\r", "multi\n\nline\ntext\n", "tab\tand\nnewline"] {
        let normalized = normalize(raw, DEFAULT_MAX_CHARS);
        assert!(!normalized.contains('\n') && !normalized.contains('\r'), "{:?}", normalized);
        assert_eq!(normalized, normalized.trim());
    }
}

#[test]
fn test_textUnits_shouldKeepOrderAndOriginals() {
    let units = TextUnit::from_fragments(&["first\n", "second"], DEFAULT_MAX_CHARS);

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].original(), "first\n");
    assert_eq!(units[0].normalized(), "first");
    assert_eq!(units[1].normalized(), "second");
}

#[test]
fn test_linePrefix_shouldMatchFormattedLine() {
    assert_eq!(LINE_PREFIX_LEN, 8);
    assert_eq!(&format_response_line(42, "x")[..LINE_PREFIX_LEN], "042 >>> ");
}

#[test]
fn test_batchPrompt_shouldListNormalizedFragmentsAfterHeader() {
    let prompt = build_batch_prompt("Shakespearean", &["Hi there", "Bye"]);

    assert!(prompt.contains("\"Shakespearean\""));
    assert!(prompt.contains("2 lines"));
    let items = &prompt[prompt.find(ITEMS_HEADER).unwrap()..];
    assert!(items.contains("1. Hi there\n2. Bye\n"));
}

#[test]
fn test_singlePrompt_shouldEndWithLanguageAndText() {
    let prompt = build_single_prompt("Good night", "Klingon");
    assert!(prompt.ends_with("Language: Klingon\nText: Good night"));
}

#[test]
fn test_parse_exactCount_shouldMatchExample() {
    let parsed = parse_batch_response("001 >>> Hola\n002 >>> Adiós");
    assert_eq!(parsed, vec!["Hola", "Adiós"]);
    // Three fragments asked, two lines back: the caller sees the shortfall
    assert_ne!(parsed.len(), 3);
}

#[test]
fn test_parse_surroundingWhitespace_shouldBeIgnored() {
    let parsed = parse_batch_response("\n\n  001 >>> Arr  \n002 >>> Ahoy\n\n");
    assert_eq!(parsed, vec!["Arr", "Ahoy"]);
}

#[test]
fn test_extractLabeled_multiline_shouldKeepEverythingAfterLabel() {
    let translation = extract_labeled_translation("Sure!\nTranslation:\nLine one\nLine two\n").unwrap();
    assert_eq!(translation, "Line one\nLine two");
}

#[test]
fn test_parse_carriageReturnSeparatedResponse_shouldNotPassAsFewerLines() {
    let parsed = parse_batch_response("001 >>> a\r002 >>> b\n003 >>> c");
    assert_eq!(parsed, vec!["a", "b", "c"]);
    assert!(parsed.iter().all(|line| !line.contains('\r')));
}
