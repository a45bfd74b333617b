use super::{ExtractionError, TextExtractor};

/// Marker of an encryption dictionary in the PDF trailer.
const ENCRYPT_MARKER: &[u8] = b"/Encrypt";

/// Text-layer extraction backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            if is_encrypted(bytes) {
                ExtractionError::Encrypted
            } else {
                ExtractionError::PdfError(e.to_string())
            }
        })?;

        // The layout pass pads each page with blank lines.
        let pages: Vec<String> = pages.iter().map(|p| p.trim().to_string()).collect();
        if pages.iter().all(|p| p.is_empty()) {
            // Parsed fine but nothing to read: scanned/image PDF.
            tracing::warn!("PDF parsed but contained no text layer");
            return Err(ExtractionError::NoTextLayer);
        }
        Ok(pages)
    }
}

fn is_encrypted(bytes: &[u8]) -> bool {
    bytes
        .windows(ENCRYPT_MARKER.len())
        .any(|w| w == ENCRYPT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal uncompressed PDF with one Helvetica text line per page.
    fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
        let n = texts.len();
        let font_id = 3 + 2 * n;
        let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{}] /Count {n} >>", kids.join(" ")),
        ];
        for (i, text) in texts.iter().enumerate() {
            let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        out
    }

    #[test]
    fn extracts_one_string_per_page() {
        let pages = PdfExtractor.extract_pages(&pdf_with_pages(&["Hola", "Mundo"])).unwrap();
        assert_eq!(pages, vec!["Hola", "Mundo"]);
    }

    #[test]
    fn real_pages_join_with_newline() {
        let pdf = pdf_with_pages(&["Hola", "Mundo"]);
        let text = crate::join_pages(&PdfExtractor.extract_pages(&pdf).unwrap()).unwrap();
        assert_eq!(text, "Hola\nMundo");
    }

    #[test]
    fn blank_pages_have_no_text_layer() {
        let err = PdfExtractor.extract_pages(&pdf_with_pages(&[" ", " "])).unwrap_err();
        assert!(matches!(err, ExtractionError::NoTextLayer));
    }

    #[test]
    fn detects_encrypt_dictionary() {
        assert!(is_encrypted(b"trailer << /Root 1 0 R /Encrypt 5 0 R >>"));
        assert!(!is_encrypted(b"trailer << /Root 1 0 R >>"));
    }

    #[test]
    fn garbage_bytes_fail() {
        let err = PdfExtractor.extract_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }
}
