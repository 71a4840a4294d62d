//! Envelope writing.
//!
//! Formats envelopes and substitutes them for a template placeholder. Content
//! outside the placeholder is never touched.

use crate::error::{Error, Result};

/// Opening marker for `tag` at `version`.
pub fn open_marker(tag: &str, version: u32) -> String {
    format!("/* {}:v{} */", tag, version)
}

/// Closing marker for `tag` at `version`.
pub fn close_marker(tag: &str, version: u32) -> String {
    format!("/* /{}:v{} */", tag, version)
}

/// A complete envelope: markers on their own lines around `body`.
///
/// # Example
/// ```
/// use datadict_blocks::writer::format_envelope;
///
/// assert_eq!(
///     format_envelope("demo", 1, "{}"),
///     "/* demo:v1 */\n{}\n/* /demo:v1 */"
/// );
/// ```
pub fn format_envelope(tag: &str, version: u32, body: &str) -> String {
    format!(
        "{}\n{}\n{}",
        open_marker(tag, version),
        body,
        close_marker(tag, version)
    )
}

/// Substitutes a fresh envelope for `placeholder` in a template.
///
/// # Errors
/// `PlaceholderNotFound` if the template does not contain the placeholder.
pub fn insert_envelope(
    template: &str,
    placeholder: &str,
    tag: &str,
    version: u32,
    body: &str,
) -> Result<String> {
    if !template.contains(placeholder) {
        return Err(Error::PlaceholderNotFound {
            placeholder: placeholder.to_string(),
        });
    }
    Ok(template.replacen(placeholder, &format_envelope(tag, version, body), 1))
}
