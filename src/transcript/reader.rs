use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TrendError};
use crate::types::{TranscriptDocument, TranscriptFormat};

/// Load a transcript for analysis.
///
/// `.json` files are parsed and their top-level `text` field extracted; a
/// missing or non-string field yields empty text. Any other extension is read
/// verbatim.
pub fn read_transcript(path: &Path) -> Result<TranscriptDocument> {
    if !path.exists() {
        return Err(TrendError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read_to_string(path).map_err(|source| TrendError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let structured = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    if !structured {
        return Ok(TranscriptDocument {
            text: raw,
            format: TranscriptFormat::Plain,
        });
    }

    let value: Value = serde_json::from_str(&raw).map_err(|source| TrendError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match value.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => {
            debug!(path = %path.display(), "structured transcript has no text field");
            String::new()
        }
    };
    Ok(TranscriptDocument {
        text,
        format: TranscriptFormat::Structured,
    })
}

#[cfg(test)]
mod tests {
    use super::read_transcript;
    use crate::error::TrendError;
    use crate::types::TranscriptFormat;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_plain_text_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("talk.txt");
        fs::write(&path, "Line one.\nLine two.").unwrap();

        let doc = read_transcript(&path).unwrap();
        assert_eq!(doc.text, "Line one.\nLine two.");
        assert_eq!(doc.format, TranscriptFormat::Plain);
    }

    #[test]
    fn extracts_text_field_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("talk.json");
        fs::write(
            &path,
            r#"{"text": "Héllo there.", "chunks": [{"timestamp": [0.0, 1.5], "text": "Héllo there."}]}"#,
        )
        .unwrap();

        let doc = read_transcript(&path).unwrap();
        assert_eq!(doc.text, "Héllo there.");
        assert_eq!(doc.format, TranscriptFormat::Structured);
    }

    #[test]
    fn json_without_text_field_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("talk.json");
        fs::write(&path, r#"{"chunks": []}"#).unwrap();
        assert_eq!(read_transcript(&path).unwrap().text, "");

        fs::write(&path, r#"["not", "an", "object"]"#).unwrap();
        assert_eq!(read_transcript(&path).unwrap().text, "");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = read_transcript(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, TrendError::NotFound { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"text\": ").unwrap();
        let err = read_transcript(&path).unwrap_err();
        assert!(matches!(err, TrendError::Parse { .. }));
    }

    #[test]
    fn non_utf8_content_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, b"\xff\xfe\x00\x80").unwrap();
        let err = read_transcript(&path).unwrap_err();
        assert!(matches!(err, TrendError::Read { .. }));
    }
}
