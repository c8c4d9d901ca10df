//! Loaded document model
//!
//! Parses the PDF byte stream fetched from the backend into per-page text.
//! `pdf-extract` returns the whole document as one string with form feeds
//! between pages, so pagination splits on `\x0C` (falling back to triple
//! newlines for extractors that omit the separator).

use log::debug;

/// Columns assumed for a page when its own text gives no usable width
const FALLBACK_NATIVE_WIDTH: u16 = 72;
/// Bounds for the derived native page width
const MIN_NATIVE_WIDTH: u16 = 20;
const MAX_NATIVE_WIDTH: u16 = 120;

/// A single page of extracted text
#[derive(Clone, Debug)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub text: String,
}

/// Errors while turning fetched bytes into pages
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not parse PDF: {0}")]
    Parse(String),

    #[error("document contains no extractable text")]
    Empty,
}

/// A fully parsed document, owned exclusively by the viewer and replaced
/// wholesale on every document switch.
#[derive(Clone, Debug)]
pub struct LoadedDocument {
    pub filename: String,
    pub pages: Vec<Page>,
    /// Width of the widest line on the first page, in columns
    pub native_width: u16,
}

impl LoadedDocument {
    /// Parse PDF bytes into pages of text
    pub fn parse(filename: &str, bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }

        Self::from_text(filename, &text)
    }

    /// Paginate already-extracted text. Split out of [`parse`] so tests
    /// don't need real PDF fixtures.
    pub fn from_text(filename: &str, text: &str) -> Result<Self, DocumentError> {
        let raw_pages: Vec<&str> = if text.contains('\x0C') {
            text.split('\x0C').collect()
        } else {
            text.split("\n\n\n").collect()
        };

        let pages: Vec<Page> = raw_pages
            .iter()
            .filter(|p| !p.trim().is_empty())
            .enumerate()
            .map(|(idx, p)| Page {
                number: idx + 1,
                text: p.trim_matches('\n').to_string(),
            })
            .collect();

        if pages.is_empty() {
            return Err(DocumentError::Empty);
        }

        let native_width = Self::measure_native_width(&pages[0].text);
        debug!(
            "parsed {}: {} pages, native width {} cols",
            filename,
            pages.len(),
            native_width
        );

        Ok(Self {
            filename: filename.to_string(),
            pages,
            native_width,
        })
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn measure_native_width(first_page: &str) -> u16 {
        let widest = first_page
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        if widest == 0 {
            FALLBACK_NATIVE_WIDTH
        } else {
            (widest as u16).clamp(MIN_NATIVE_WIDTH, MAX_NATIVE_WIDTH)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_form_feed() {
        let doc =
            LoadedDocument::from_text("a.pdf", "first page\x0Csecond page\x0Cthird").unwrap();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[2].text, "third");
    }

    #[test]
    fn falls_back_to_triple_newline() {
        let doc = LoadedDocument::from_text("a.pdf", "one\n\n\ntwo").unwrap();
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn skips_blank_pages_but_keeps_numbering_dense() {
        let doc = LoadedDocument::from_text("a.pdf", "one\x0C   \x0Ctwo").unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].number, 2);
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(
            LoadedDocument::from_text("a.pdf", "  \n \x0C \n"),
            Err(DocumentError::Empty)
        ));
    }

    #[test]
    fn native_width_tracks_widest_first_page_line() {
        let wide = "x".repeat(64);
        let doc =
            LoadedDocument::from_text("a.pdf", &format!("short\n{wide}\x0Cignored")).unwrap();
        assert_eq!(doc.native_width, 64);
    }

    #[test]
    fn native_width_is_clamped() {
        let huge = "y".repeat(500);
        let doc = LoadedDocument::from_text("a.pdf", &huge).unwrap();
        assert_eq!(doc.native_width, 120);

        let tiny = LoadedDocument::from_text("a.pdf", "hi").unwrap();
        assert_eq!(tiny.native_width, 20);
    }
}
