pub mod document;

pub use document::{
    extract_case_text, join_pages, DocumentKind, ExtractionError, PdfExtractor, TextExtractor,
    PDF_MIME,
};
