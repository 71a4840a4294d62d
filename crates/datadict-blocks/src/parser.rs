//! Envelope parsing.
//!
//! Finds `/* <tag>:v<N> */ ... /* /<tag>:v<N> */` regions in text content.

use regex::Regex;

use crate::error::{Error, Result};
use crate::writer::close_marker;

/// A located envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Payload kind, e.g. `datadict:payload`.
    pub tag: String,
    /// Schema version carried by the markers.
    pub version: u32,
    /// Text between the markers, without the newline that follows the
    /// opening marker or the one that precedes the closing marker.
    pub content: String,
    /// Byte offset of the opening marker.
    pub start: usize,
    /// Byte offset just past the closing marker.
    pub end: usize,
    /// 1-based line of the opening marker.
    pub start_line: usize,
}

fn open_marker_regex(tag: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"/\* {}:v([0-9]+) \*/", regex::escape(tag)))?)
}

fn parse_version(raw: &str) -> Result<u32> {
    raw.parse().map_err(|_| Error::InvalidVersion {
        raw: raw.to_string(),
    })
}

/// Parses every envelope with the given tag, in order of appearance.
///
/// An opening marker without its matching closing marker is an error: the
/// document was truncated or hand-edited and its payload cannot be trusted.
///
/// # Example
/// ```
/// use datadict_blocks::parser::parse_envelopes;
///
/// let content = "const data = /* demo:v2 */\n{\"a\": 1}\n/* /demo:v2 */;";
/// let envelopes = parse_envelopes(content, "demo").unwrap();
/// assert_eq!(envelopes.len(), 1);
/// assert_eq!(envelopes[0].version, 2);
/// assert_eq!(envelopes[0].content, "{\"a\": 1}");
/// ```
pub fn parse_envelopes(content: &str, tag: &str) -> Result<Vec<Envelope>> {
    let open_regex = open_marker_regex(tag)?;
    let mut envelopes = Vec::new();
    let mut search_from = 0;

    while let Some(caps) = open_regex.captures_at(content, search_from) {
        let (Some(open_match), Some(version_match)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let version = parse_version(version_match.as_str())?;
        let open_end = open_match.end();

        let close = close_marker(tag, version);
        let Some(close_offset) = content[open_end..].find(&close) else {
            return Err(Error::Unterminated {
                tag: tag.to_string(),
                version,
            });
        };
        let close_start = open_end + close_offset;
        let close_end = close_start + close.len();

        let raw = &content[open_end..close_start];
        let raw = raw.strip_prefix('\n').unwrap_or(raw);
        let raw = raw.strip_suffix('\n').unwrap_or(raw);

        envelopes.push(Envelope {
            tag: tag.to_string(),
            version,
            content: raw.to_string(),
            start: open_match.start(),
            end: close_end,
            start_line: content[..open_match.start()].matches('\n').count() + 1,
        });

        search_from = close_end;
    }

    Ok(envelopes)
}

/// Finds the single envelope with the given tag.
///
/// Returns `Ok(None)` when the content has none, and an error when it has more
/// than one, since a document with two payloads is ambiguous.
pub fn find_envelope(content: &str, tag: &str) -> Result<Option<Envelope>> {
    let mut envelopes = parse_envelopes(content, tag)?;
    match envelopes.len() {
        0 => Ok(None),
        1 => Ok(envelopes.pop()),
        count => Err(Error::Duplicate {
            tag: tag.to_string(),
            count,
        }),
    }
}

/// Reads the single envelope with the given tag and checks its version.
///
/// # Errors
/// - `EnvelopeNotFound` when there is no envelope
/// - `UnsupportedVersion` when the markers carry a different version
/// - `Unterminated` / `Duplicate` as for [`find_envelope`]
pub fn read_envelope(content: &str, tag: &str, supported_version: u32) -> Result<Envelope> {
    let envelope = find_envelope(content, tag)?.ok_or_else(|| Error::EnvelopeNotFound {
        tag: tag.to_string(),
    })?;

    if envelope.version != supported_version {
        tracing::debug!(
            tag,
            found = envelope.version,
            supported = supported_version,
            "rejecting envelope with foreign version"
        );
        return Err(Error::UnsupportedVersion {
            tag: tag.to_string(),
            found: envelope.version,
            supported: supported_version,
        });
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: &str = "datadict:payload";

    #[test]
    fn test_no_envelope() {
        assert!(parse_envelopes("<html></html>", TAG).unwrap().is_empty());
        assert!(find_envelope("<html></html>", TAG).unwrap().is_none());
    }

    #[test]
    fn test_single_envelope() {
        let content = "a\n/* datadict:payload:v1 */\n{}\n/* /datadict:payload:v1 */\nb";
        let envelope = read_envelope(content, TAG, 1).unwrap();
        assert_eq!(envelope.content, "{}");
        assert_eq!(envelope.start_line, 2);
        assert!(content[envelope.start..].starts_with("/* datadict:payload:v1 */"));
        assert!(content[envelope.end..].starts_with("\nb"));
    }

    #[test]
    fn test_other_tags_ignored() {
        let content = "/* other:v1 */\nx\n/* /other:v1 */";
        assert!(find_envelope(content, TAG).unwrap().is_none());
    }

    #[test]
    fn test_unterminated() {
        let content = "/* datadict:payload:v1 */\n{}";
        assert!(matches!(
            parse_envelopes(content, TAG),
            Err(Error::Unterminated { version: 1, .. })
        ));
    }

    #[test]
    fn test_mismatched_close_version_is_unterminated() {
        let content = "/* datadict:payload:v1 */\n{}\n/* /datadict:payload:v2 */";
        assert!(matches!(
            parse_envelopes(content, TAG),
            Err(Error::Unterminated { .. })
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let content = "/* datadict:payload:v7 */\n{}\n/* /datadict:payload:v7 */";
        assert!(matches!(
            read_envelope(content, TAG, 1),
            Err(Error::UnsupportedVersion { found: 7, supported: 1, .. })
        ));
    }
}
