//! Interactive document codec
//!
//! The interactive document is a single HTML page whose data block holds the
//! whole [`DocumentPayload`] as JSON, wrapped in versioned envelope markers:
//!
//! ```text
//! <script type="application/json" id="schemaPayload">
//! /* datadict:payload:v1 */
//! { ...payload json... }
//! /* /datadict:payload:v1 */
//! </script>
//! ```
//!
//! The page script slices the JSON out from between the markers and hands it
//! to `JSON.parse`, so table names are plain keys even when they collide with
//! object prototype names.
//!
//! The page shell is compiled in and the payload is the only variable part, so
//! the page is a pure function of the payload and reading it back yields the
//! same payload.

use datadict_blocks::{read_envelope, writer};
use datadict_fs::{NormalizedPath, io};

use crate::model::DocumentPayload;
use crate::{Error, Result};

/// Envelope tag of the embedded payload.
pub const PAYLOAD_TAG: &str = "datadict:payload";

/// Envelope version this build reads and writes.
pub const PAYLOAD_VERSION: u32 = 1;

const TEMPLATE: &str = include_str!("template.html");
const PAYLOAD_PLACEHOLDER: &str = "@@DATADICT_PAYLOAD@@";
const TITLE_PLACEHOLDER: &str = "@@DATADICT_TITLE@@";

/// Serialize a payload for embedding in the data block.
///
/// `<` is written as `\u003c` so no string value can close the script element,
/// and `*/` as `*\/` so no string value can close the envelope comment. Both
/// are ordinary JSON escapes and decode to the original text.
pub fn encode_payload(payload: &DocumentPayload) -> Result<String> {
    let json = serde_json::to_string_pretty(payload)?;
    Ok(json.replace('<', "\\u003c").replace("*/", "*\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // keeps a name from spelling out a template placeholder
            '@' => escaped.push_str("&#64;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the complete page for a payload.
pub fn render_artifact(payload: &DocumentPayload) -> Result<String> {
    let shell = TEMPLATE.replace(TITLE_PLACEHOLDER, &escape_html(payload.database()));
    let body = encode_payload(payload)?;
    Ok(writer::insert_envelope(
        &shell,
        PAYLOAD_PLACEHOLDER,
        PAYLOAD_TAG,
        PAYLOAD_VERSION,
        &body,
    )?)
}

/// Extract the payload from page content.
///
/// Returns a human-readable reason on failure: missing, duplicated or
/// unterminated envelope, a foreign version, or JSON that does not describe a
/// consistent payload.
pub fn parse_artifact(content: &str) -> std::result::Result<DocumentPayload, String> {
    let envelope =
        read_envelope(content, PAYLOAD_TAG, PAYLOAD_VERSION).map_err(|e| e.to_string())?;
    serde_json::from_str(&envelope.content).map_err(|e| {
        format!(
            "payload at line {} is not valid: {}",
            envelope.start_line, e
        )
    })
}

/// Read the payload from the artifact at `path`.
///
/// `Ok(None)` means the artifact does not exist. An artifact that exists but
/// cannot be parsed is `ArtifactParse`; it is never treated as empty.
pub fn read_artifact(path: &NormalizedPath) -> Result<Option<DocumentPayload>> {
    match io::read_if_exists(path)? {
        Some(bytes) => decode_artifact(path, &bytes).map(Some),
        None => Ok(None),
    }
}

/// Extract the payload from artifact bytes already read from `path`.
pub fn decode_artifact(path: &NormalizedPath, bytes: &[u8]) -> Result<DocumentPayload> {
    let parse_error = |reason: String| Error::ArtifactParse {
        path: path.to_native(),
        reason,
    };
    let content =
        std::str::from_utf8(bytes).map_err(|e| parse_error(format!("not valid UTF-8: {}", e)))?;
    parse_artifact(content).map_err(parse_error)
}
