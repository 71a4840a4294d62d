//! Versioned envelopes for payloads embedded in generated documents.
//!
//! A generated document carries its machine-readable payload between a pair of
//! markers that name both the payload kind and its schema version:
//!
//! ```text
//! /* datadict:payload:v1 */
//! { ...payload... }
//! /* /datadict:payload:v1 */
//! ```
//!
//! The markers are block comments, easy to find in a `<script>` element and
//! easy for a page script to slice off before parsing the body. Because the version is part of
//! the marker, a reader meeting a payload written by a different schema version
//! rejects it outright instead of misparsing it.
//!
//! [`parser`] locates envelopes; [`writer`] formats them and fills template placeholders. Neither
//! knows anything about the payload itself.

pub mod error;
pub mod parser;
pub mod writer;

pub use error::{Error, Result};
pub use parser::{Envelope, find_envelope, parse_envelopes, read_envelope};
pub use writer::{close_marker, format_envelope, insert_envelope, open_marker};
