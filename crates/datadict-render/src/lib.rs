//! Static document renderers for datadict
//!
//! Renders a complete [`DocumentPayload`] as Markdown, CSV, plain HTML or
//! Excel. These are one-shot outputs: every run rewrites them from scratch.
//! The interactive format is owned by the sync engine in `datadict-core`
//! because it carries its own payload and state.
//!
//! | Format   | Output                                                         |
//! |----------|----------------------------------------------------------------|
//! | markdown | `<base>.md`                                                    |
//! | csv      | `<base>_csvs/<table>.csv`                                      |
//! | html     | `<base>_html/index.html`, or `part<N>.html` plus an index page |
//! | excel    | `<base>.xlsx`, or `<base>_part<N>.xlsx`                        |

pub mod cells;
pub mod csv;
pub mod error;
pub mod html;
pub mod markdown;
pub mod xlsx;

use datadict_core::DocumentPayload;
use datadict_fs::NormalizedPath;
use datadict_meta::{DatabaseConfig, OutputConfig, OutputFormat};

pub use error::{Error, Result};

/// Where a static document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub directory: NormalizedPath,
    /// File name stem shared by every output file.
    pub base_name: String,
    /// Split threshold for the Excel and HTML formats.
    pub max_tables_per_file: usize,
}

impl RenderTarget {
    pub fn new(output: &OutputConfig, database: &DatabaseConfig) -> Self {
        Self {
            directory: NormalizedPath::new(&output.directory),
            base_name: output.base_name(database),
            max_tables_per_file: output.max_tables_per_file.max(1),
        }
    }

    pub(crate) fn path(&self, name: &str) -> NormalizedPath {
        self.directory.join(name)
    }
}

/// Files written by a render, plus anything worth telling the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub files: Vec<NormalizedPath>,
    pub warnings: Vec<String>,
}

impl Rendered {
    pub(crate) fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Render `payload` in a static format.
///
/// # Errors
/// `NotStatic` for the interactive format.
pub fn render(
    format: OutputFormat,
    payload: &DocumentPayload,
    target: &RenderTarget,
) -> Result<Rendered> {
    let rendered = match format {
        OutputFormat::Markdown => markdown::write(payload, target)?,
        OutputFormat::Csv => csv::write(payload, target)?,
        OutputFormat::Html => html::write(payload, target)?,
        OutputFormat::Excel => xlsx::write(payload, target)?,
        OutputFormat::InteractiveHtml => return Err(Error::NotStatic { format }),
    };
    tracing::info!(
        format = %format,
        files = rendered.files.len(),
        tables = payload.len(),
        "rendered document"
    );
    Ok(rendered)
}
