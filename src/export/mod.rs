//! Sinks that render the repository as spreadsheets.
//!
//! Both sinks consume the same ordered [`TeamSheet`] layout, so a workbook and the
//! hosted sheet show identical rows and columns for identical input.

mod google_sheet;
mod layout;
mod workbook;

pub use google_sheet::*;
pub use layout::*;
pub use workbook::*;

/// Teams written and teams that failed during one export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<String>,
    pub failed: Vec<String>,
}
