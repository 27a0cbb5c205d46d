//! PDF writer for onboarding plans.
//!
//! Every input line becomes one text row in a built-in Helvetica face. Markdown and
//! markup are not interpreted; the characters are placed as given.

use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::export::layout::{paginate, split_lines, PageLayout};

const DOCUMENT_TITLE: &str = "Onboarding Plan";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing document: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A rendered plan written to durable storage, ready to stream once for download.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedDocument {
    pub id: Uuid,
    #[serde(skip)]
    pub path: PathBuf,
    pub lines: Vec<String>,
    pub page_count: usize,
}

impl ExportedDocument {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Writes plan PDFs into a single output directory, one file per generation.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    output_dir: PathBuf,
    layout: PageLayout,
}

impl PdfExporter {
    pub fn new(output_dir: impl Into<PathBuf>, layout: PageLayout) -> Self {
        Self {
            output_dir: output_dir.into(),
            layout,
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Renders `text` to a new PDF file and returns a handle to it.
    pub async fn render(&self, text: &str) -> Result<ExportedDocument, ExportError> {
        let id = Uuid::new_v4();
        let path = self.file_path(id);
        let lines = split_lines(text);

        let layout = self.layout.clone();
        let dir = self.output_dir.clone();
        let target = path.clone();
        let to_render = lines.clone();
        let page_count = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)?;
            let (bytes, page_count) = encode_pdf(&to_render, &layout)?;
            std::fs::write(&target, bytes)?;
            Ok::<_, ExportError>(page_count)
        })
        .await??;

        info!(
            "Exported plan {} ({} lines, {} pages) to {}",
            id,
            lines.len(),
            page_count,
            path.display()
        );

        Ok(ExportedDocument {
            id,
            path,
            lines,
            page_count,
        })
    }

    /// Path of a previously exported document, if it exists.
    pub fn document_path(&self, id: Uuid) -> Option<PathBuf> {
        let path = self.file_path(id);
        path.is_file().then_some(path)
    }

    fn file_path(&self, id: Uuid) -> PathBuf {
        self.output_dir.join(format!("onboarding_plan_{id}.pdf"))
    }
}

/// Encodes the paginated lines as PDF bytes. Returns the bytes and the page count.
pub fn encode_pdf(lines: &[String], layout: &PageLayout) -> Result<(Vec<u8>, usize), ExportError> {
    let pages = paginate(lines, layout);
    let width = Mm(layout.page_width_mm);
    let height = Mm(layout.page_height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(DOCUMENT_TITLE, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    for (page_no, page_lines) in pages.iter().enumerate() {
        let (page, layer) = if page_no == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, format!("Layer {}", page_no + 1))
        };
        let canvas = doc.get_page(page).get_layer(layer);

        for (row, line) in page_lines.iter().enumerate() {
            canvas.use_text(
                line.as_str(),
                layout.font_size_pt,
                Mm(layout.margin_left_mm + 1.0),
                Mm(layout.baseline_from_bottom_mm(row)),
                &font,
            );
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok((bytes, pages.len()))
}

/// Reads a document back for streaming.
pub async fn read_document(path: &Path) -> Result<Vec<u8>, ExportError> {
    Ok(tokio::fs::read(path).await?)
}
