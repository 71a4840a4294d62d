//! Table list resolution
//!
//! An incremental run needs to know which tables to refresh. The list comes
//! from exactly one source, picked by precedence: an inline list, then an
//! explicitly named file, then the configured default file.
//!
//! File format is one table name per line; blank lines and lines starting
//! with `#` are ignored. Names are trimmed and de-duplicated, first
//! occurrence wins.

use std::collections::HashSet;

use datadict_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// Where a resolved table list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableListOrigin {
    /// `--tables a,b,c`
    Inline,
    /// `--tables-file <path>`
    File(NormalizedPath),
    /// The configured default table list file.
    DefaultFile(NormalizedPath),
}

impl std::fmt::Display for TableListOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableListOrigin::Inline => write!(f, "--tables"),
            TableListOrigin::File(path) => write!(f, "{}", path),
            TableListOrigin::DefaultFile(path) => write!(f, "{} (default)", path),
        }
    }
}

/// Candidate sources for the table list.
#[derive(Debug, Clone)]
pub struct TableListRequest {
    /// Inline names, already split on commas.
    pub inline: Option<Vec<String>>,
    /// Explicit file; must exist when given.
    pub file: Option<NormalizedPath>,
    /// Fallback file; a missing default simply yields no tables.
    pub default_file: NormalizedPath,
}

/// A resolved, normalized table list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelection {
    pub tables: Vec<String>,
    pub origin: TableListOrigin,
}

/// Trim, drop blanks and comments, and de-duplicate in first-seen order.
pub fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        if seen.insert(name.to_string()) {
            result.push(name.to_string());
        }
    }
    result
}

/// Parse the contents of a table list file.
///
/// # Example
/// ```
/// use datadict_core::parse_table_list;
///
/// let tables = parse_table_list("# core\nusers\n\n  orders  \nusers\n");
/// assert_eq!(tables, vec!["users", "orders"]);
/// ```
pub fn parse_table_list(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    normalize_names(content.lines())
}

fn read_list(path: &NormalizedPath) -> Result<Option<Vec<String>>> {
    let Some(bytes) = io::read_if_exists(path)? else {
        return Ok(None);
    };
    let content = String::from_utf8_lossy(&bytes);
    Ok(Some(parse_table_list(&content)))
}

/// Pick the table list source by precedence and normalize it.
///
/// The first source that is present wins even if it normalizes to nothing;
/// an empty result is `NoTablesSpecified` rather than a silent fallback.
pub fn resolve_tables(request: &TableListRequest) -> Result<TableSelection> {
    let (tables, origin) = if let Some(inline) = &request.inline {
        (normalize_names(inline), TableListOrigin::Inline)
    } else if let Some(path) = &request.file {
        let tables = read_list(path)?.ok_or_else(|| Error::TableListNotFound {
            path: path.to_native(),
        })?;
        (tables, TableListOrigin::File(path.clone()))
    } else {
        let path = &request.default_file;
        let tables = read_list(path)?.unwrap_or_default();
        (tables, TableListOrigin::DefaultFile(path.clone()))
    };

    if tables.is_empty() {
        return Err(Error::NoTablesSpecified {
            hint: format!(
                "{} lists no tables; pass --tables or add names to the file",
                origin
            ),
        });
    }

    tracing::debug!(count = tables.len(), origin = %origin, "resolved table list");
    Ok(TableSelection { tables, origin })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_dedupes() {
        let names = normalize_names([" users", "orders ", "", "users", "# note"]);
        assert_eq!(names, vec!["users", "orders"]);
    }

    #[test]
    fn test_parse_strips_bom() {
        assert_eq!(parse_table_list("\u{feff}users\r\norders\r\n"), vec!["users", "orders"]);
    }

    #[test]
    fn test_inline_beats_files() {
        let request = TableListRequest {
            inline: Some(vec!["a".into(), "b".into()]),
            file: Some(NormalizedPath::new("/nonexistent/list.txt")),
            default_file: NormalizedPath::new("/nonexistent/default.txt"),
        };
        let selection = resolve_tables(&request).unwrap();
        assert_eq!(selection.tables, vec!["a", "b"]);
        assert_eq!(selection.origin, TableListOrigin::Inline);
    }

    #[test]
    fn test_empty_inline_is_an_error() {
        let request = TableListRequest {
            inline: Some(vec![" ".into()]),
            file: None,
            default_file: NormalizedPath::new("/nonexistent/default.txt"),
        };
        assert!(matches!(
            resolve_tables(&request),
            Err(Error::NoTablesSpecified { .. })
        ));
    }
}
