// Document export: plan text → paginated fixed-font PDF.
// Pagination is pure (layout.rs); PDF encoding and file output live in pdf.rs and
// must run inside tokio::task::spawn_blocking.

pub mod layout;
pub mod pdf;

pub use layout::PageLayout;
pub use pdf::{ExportError, ExportedDocument, PdfExporter};
