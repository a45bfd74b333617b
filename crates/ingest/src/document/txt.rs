/// Plain-text manuscripts: decode and trim, like pasted text.
pub fn extract_txt(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_spanish_accents() {
        let content = "Preescolar de 4 años, peso 16 kg".as_bytes();
        assert_eq!(extract_txt(content), "Preescolar de 4 años, peso 16 kg");
    }

    #[test]
    fn empty_file_is_empty_text() {
        assert_eq!(extract_txt(b""), "");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(extract_txt(b"  \n  Hello  \n  "), "Hello");
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let text = extract_txt(b"caso \xFF cl\xC3\xADnico");
        assert!(text.starts_with("caso"));
        assert!(text.ends_with("clínico"));
    }
}
