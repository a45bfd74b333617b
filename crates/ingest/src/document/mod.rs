mod pdf;
mod txt;

pub use pdf::PdfExtractor;

use thiserror::Error;

/// MIME type accepted for manuscript uploads.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("the PDF is password-protected")]
    Encrypted,
    #[error("the PDF has no extractable text layer (scanned image?)")]
    NoTextLayer,
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What kind of input a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// Plain text or markdown, treated like pasted text.
    Text,
}

impl DocumentKind {
    /// Upload gate: only `application/pdf` is accepted. Parameters such as
    /// `; charset=binary` are ignored.
    pub fn from_mime(mime: &str) -> Result<Self, ExtractionError> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        if essence == PDF_MIME {
            Ok(Self::Pdf)
        } else {
            Err(ExtractionError::UnsupportedType(mime.to_string()))
        }
    }

    /// Local files (CLI): PDFs plus plain-text manuscripts.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let ext = std::path::Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| {
                ExtractionError::UnsupportedType(format!("{filename} (no file extension)"))
            })?;
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" | "text" | "md" | "markdown" => Ok(Self::Text),
            other => Err(ExtractionError::UnsupportedType(format!(".{other}"))),
        }
    }
}

/// Turns document bytes into page-ordered text.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Join page texts with a single newline, in page order, and trim the result.
/// An empty result means the document carried no text.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> Result<String, ExtractionError> {
    let joined = pages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::NoTextLayer);
    }
    Ok(trimmed.to_string())
}

/// Extract the full case text from a file of the given kind.
pub fn extract_case_text(
    extractor: &dyn TextExtractor,
    bytes: &[u8],
    kind: DocumentKind,
) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => {
            let pages = extractor.extract_pages(bytes)?;
            tracing::debug!("extracted {} pages", pages.len());
            join_pages(&pages)
        }
        DocumentKind::Text => Ok(txt::extract_txt(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<&'static str>);

    impl TextExtractor for FixedPages {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn joins_pages_in_order() {
        assert_eq!(join_pages(&["Hola", "Mundo"]).unwrap(), "Hola\nMundo");
    }

    #[test]
    fn trims_only_the_ends() {
        let text = join_pages(&["  Página uno ", "Página dos\n\n"]).unwrap();
        assert_eq!(text, "Página uno \nPágina dos");
    }

    #[test]
    fn blank_pages_mean_no_text_layer() {
        assert!(matches!(join_pages(&["", "  \n"]), Err(ExtractionError::NoTextLayer)));
        assert!(matches!(join_pages::<&str>(&[]), Err(ExtractionError::NoTextLayer)));
    }

    #[test]
    fn only_pdf_mime_is_accepted() {
        assert_eq!(DocumentKind::from_mime("application/pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_mime("Application/PDF; charset=binary").unwrap(),
            DocumentKind::Pdf
        );
        assert!(matches!(
            DocumentKind::from_mime("image/png"),
            Err(ExtractionError::UnsupportedType(_))
        ));
        assert!(DocumentKind::from_mime("text/plain").is_err());
    }

    #[test]
    fn filename_kinds() {
        assert_eq!(DocumentKind::from_filename("caso.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("caso.md").unwrap(), DocumentKind::Text);
        assert!(DocumentKind::from_filename("caso.docx").is_err());
    }

    #[test]
    fn filename_errors_name_the_extension() {
        let err = DocumentKind::from_filename("notas/caso.docx").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: .docx");

        let err = DocumentKind::from_filename("notas/caso_clinico").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type: notas/caso_clinico (no file extension)"
        );
    }

    #[test]
    fn case_text_from_pdf_pages() {
        let extractor = FixedPages(vec!["Hola", "Mundo"]);
        let text = extract_case_text(&extractor, b"%PDF-1.4", DocumentKind::Pdf).unwrap();
        assert_eq!(text, "Hola\nMundo");
    }

    #[test]
    fn case_text_from_plain_file_skips_extractor() {
        let extractor = FixedPages(vec!["never used"]);
        let text = extract_case_text(&extractor, b"  Lactante de 8 meses \n", DocumentKind::Text)
            .unwrap();
        assert_eq!(text, "Lactante de 8 meses");
    }
}
