// src/page/parse.rs
// =============================================================================
// Turns the raw response body into a DOM tree.
//
// The real work is done by scraper (html5ever underneath), which follows the
// HTML5 parsing algorithm: unclosed tags, stray end tags and similar mistakes
// are repaired, never rejected. The only input we refuse is a body that is
// clearly not text at all.
// =============================================================================

use scraper::Html;

use crate::error::AnalyzeError;

// Parses a response body into an HTML document
//
// Valid UTF-8 is parsed as is. Other bodies are decoded lossily, unless they
// contain NUL bytes: that means binary content (an image, an archive...)
// was served where a page was expected.
pub fn parse_document(body: &[u8]) -> Result<Html, AnalyzeError> {
    let text = match std::str::from_utf8(body) {
        Ok(text) => std::borrow::Cow::Borrowed(text),
        Err(e) => {
            if body.contains(&0) {
                return Err(AnalyzeError::MalformedDocument(format!(
                    "body is binary data, not HTML ({})",
                    e
                )));
            }
            String::from_utf8_lossy(body)
        }
    };

    Ok(Html::parse_document(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_parse_repairs_broken_markup() {
        let document = parse_document(b"<html><body><p>unclosed<div>still here").unwrap();
        let selector = Selector::parse("div").unwrap();
        assert_eq!(document.select(&selector).count(), 1);
    }

    #[test]
    fn test_latin1_body_is_decoded_lossily() {
        // "caf\xe9" is Latin-1, not UTF-8
        let document = parse_document(b"<title>caf\xe9</title>").unwrap();
        let selector = Selector::parse("title").unwrap();
        let title = document.select(&selector).next().unwrap();
        assert!(title.text().collect::<String>().starts_with("caf"));
    }

    #[test]
    fn test_binary_body_is_rejected() {
        let png_header = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00];
        let result = parse_document(&png_header);
        assert!(matches!(result, Err(AnalyzeError::MalformedDocument(_))));
    }

    #[test]
    fn test_empty_body_is_a_valid_document() {
        assert!(parse_document(b"").is_ok());
    }
}
