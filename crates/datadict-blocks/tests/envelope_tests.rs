//! Integration tests for envelope parsing and writing.

use datadict_blocks::{
    Error, find_envelope, format_envelope, insert_envelope, parse_envelopes, read_envelope,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const TAG: &str = "datadict:payload";

fn page(body: &str) -> String {
    format!(
        "<html>\n<script type=\"application/json\">\n{}\n</script>\n</html>\n",
        format_envelope(TAG, 1, body)
    )
}

#[test]
fn test_envelope_inside_script() {
    let content = page("{\n  \"order\": []\n}");
    let envelope = read_envelope(&content, TAG, 1).unwrap();
    assert_eq!(envelope.content, "{\n  \"order\": []\n}");
    assert_eq!(envelope.start_line, 3);
}

#[test]
fn test_insert_is_byte_identical_outside_placeholder() {
    let template = "<html>\n<script type=\"application/json\">\n@@PAYLOAD@@\n</script>\n</html>\n";
    let filled = insert_envelope(template, "@@PAYLOAD@@", TAG, 1, "{\"v\": 2}").unwrap();

    let envelope = find_envelope(&filled, TAG).unwrap().unwrap();
    let at = template.find("@@PAYLOAD@@").unwrap();

    assert_eq!(&template[..at], &filled[..envelope.start]);
    assert_eq!(&template[at + "@@PAYLOAD@@".len()..], &filled[envelope.end..]);
    assert_eq!(envelope.content, "{\"v\": 2}");
}

#[test]
fn test_inserted_envelope_reads_back() {
    let filled = insert_envelope("pre @@PAYLOAD@@ post", "@@PAYLOAD@@", TAG, 1, "current").unwrap();
    assert_eq!(
        filled,
        "pre /* datadict:payload:v1 */\ncurrent\n/* /datadict:payload:v1 */ post"
    );
    assert_eq!(read_envelope(&filled, TAG, 1).unwrap().content, "current");
}

#[test]
fn test_two_envelopes_are_ambiguous() {
    let content = format!(
        "{}\n{}",
        format_envelope(TAG, 1, "a"),
        format_envelope(TAG, 1, "b")
    );
    assert_eq!(parse_envelopes(&content, TAG).unwrap().len(), 2);
    assert!(matches!(
        find_envelope(&content, TAG),
        Err(Error::Duplicate { count: 2, .. })
    ));
}

#[test]
fn test_missing_envelope_is_not_found() {
    assert!(matches!(
        read_envelope("<html></html>", TAG, 1),
        Err(Error::EnvelopeNotFound { .. })
    ));
}

#[rstest]
#[case("/* datadict:payload:v1 */\n{}\n")]
#[case("/* datadict:payload:v1 */{}/* /datadict:payload:v2 */")]
fn test_truncated_envelopes(#[case] content: &str) {
    assert!(matches!(
        read_envelope(content, TAG, 1),
        Err(Error::Unterminated { .. })
    ));
}

#[test]
fn test_empty_body() {
    let content = "/* datadict:payload:v1 */\n\n/* /datadict:payload:v1 */";
    let envelope = read_envelope(content, TAG, 1).unwrap();
    assert_eq!(envelope.content, "");
}
