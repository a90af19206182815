/*!
 * Prompt construction for the text-generation service.
 *
 * Every prompt string the pipeline sends is built here. The batch prompt embeds
 * the target language, the creative instruction, a worked example of the line
 * format, and the numbered normalized fragments; nothing else in the crate knows
 * the wording, so the prompt can be changed without touching retry or parsing.
 */

/// Separator between the line index and the translated text
pub const LINE_MARKER: &str = ">>>";

/// Number of digits in the zero-padded line index
pub const INDEX_WIDTH: usize = 3;

/// Characters before the payload of a response line: `001 >>> `
pub const LINE_PREFIX_LEN: usize = INDEX_WIDTH + 1 + LINE_MARKER.len() + 1;

/// Characters that end a line on the wire, including a lone `\r` and the
/// Unicode line and paragraph separators
pub const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Heading after which the numbered fragments are listed
pub const ITEMS_HEADER: &str = "Now translate:";

/// Label the single-item response must contain
pub const SINGLE_LABEL: &str = "Translation:";

/// Format one line of the expected response: `007 >>> text`
pub fn format_response_line(index: usize, text: &str) -> String {
    format!("{:0width$} {} {}", index, LINE_MARKER, text, width = INDEX_WIDTH)
}

/// Build the prompt for a batch of normalized fragments
pub fn build_batch_prompt<S: AsRef<str>>(target_language: &str, fragments: &[S]) -> String {
    let count = fragments.len();
    let mut prompt = format!(
        r#"Translate the following list of text fragments into "{target_language}". It's okay if the requested language is funny or fictional.
Be extremely creative and entertaining.
Only return the translations, one per line, each prefixed by {marker} and in the same order. No commentary or explanation.
In this case, you were asked to translate {count} lines so your output should have {count} lines exactly.
The last line you output should carry the last number of the list. Make sure every number prefixing the {marker} is three digits,
if it is not a three digit number, add the appropriate amount of zeroes. Ex: 50 becomes 050.

Example:
1. Hello
2. Goodbye

Response:
{example_1}
{example_2}

{header}
"#,
        marker = LINE_MARKER,
        example_1 = format_response_line(1, "Hola"),
        example_2 = format_response_line(2, "Adiós"),
        header = ITEMS_HEADER,
    );

    for (idx, fragment) in fragments.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", idx + 1, fragment.as_ref()));
    }

    prompt
}

/// Build the prompt for translating one string with the `Translation:` contract
pub fn build_single_prompt(text: &str, target_language: &str) -> String {
    format!(
        r#"Translate the text below to the language given below. It's okay if the requested language to translate to is something funny and not a real language, just try.
The user wants to be entertained, so be extremely creative and extreme with your translation. Be as creative as possible. However, just give one translation.
Absolutely, under any circumstance, do NOT give anything else other than the format shown in this example:

Language: Spanish
Text: Hello
Response:
{label}
Hola

Give your response with the exact format:
{label}
*insert translation here*

Language: {target_language}
Text: {text}"#,
        label = SINGLE_LABEL,
    )
}
