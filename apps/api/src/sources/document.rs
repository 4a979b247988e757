//! Plain text out of an uploaded resume document.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Formats the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// .txt, .md and .tex are all read as UTF-8 text.
    PlainText,
}

impl DocumentKind {
    /// Detects the kind from the upload's file name, falling back to its content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, AppError> {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => return Ok(Self::Pdf),
            Some("txt" | "md" | "tex") => return Ok(Self::PlainText),
            Some(other) => {
                return Err(AppError::UpstreamParse(format!(
                    "unsupported document format '.{other}' (expected pdf, txt, md or tex)"
                )))
            }
            None => {}
        }

        match content_type {
            Some("application/pdf") => Ok(Self::Pdf),
            Some(ct) if ct.starts_with("text/") => Ok(Self::PlainText),
            other => Err(AppError::UpstreamParse(format!(
                "cannot determine document format (content type {})",
                other.unwrap_or("missing")
            ))),
        }
    }
}

/// Extracts the document's text. PDF parsing runs on the blocking pool.
pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Result<String, AppError> {
    let text = match kind {
        DocumentKind::PlainText => String::from_utf8(data.to_vec())
            .map_err(|_| AppError::UpstreamParse("document is not valid UTF-8".to_string()))?,
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| AppError::UpstreamParse(format!("PDF extraction failed: {e}")))
        })
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed inputs
            if e.is_panic() {
                AppError::UpstreamParse("PDF extraction failed: malformed document".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })??,
    };

    if text.trim().is_empty() {
        return Err(AppError::UpstreamParse(
            "document contains no extractable text".to_string(),
        ));
    }

    debug!("extracted {} characters from {:?} document", text.len(), kind);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(DocumentKind::detect(Some("cv.PDF"), None).unwrap(), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::detect(Some("resume.tex"), Some("application/octet-stream")).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            DocumentKind::detect(None, Some("application/pdf")).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(Some("resume"), Some("text/plain")).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_docx_is_unsupported() {
        let err = DocumentKind::detect(Some("resume.docx"), None).unwrap_err();
        assert!(matches!(err, AppError::UpstreamParse(_)));
        assert!(DocumentKind::detect(None, None).is_err());
    }

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let text = extract_text(DocumentKind::PlainText, Bytes::from_static(b"Rust, SQL"))
            .await
            .unwrap();
        assert_eq!(text, "Rust, SQL");
    }

    #[tokio::test]
    async fn test_blank_and_non_utf8_documents_rejected() {
        let blank = extract_text(DocumentKind::PlainText, Bytes::from_static(b"  \n")).await;
        assert!(matches!(blank, Err(AppError::UpstreamParse(_))));

        let binary =
            extract_text(DocumentKind::PlainText, Bytes::from_static(&[0xff, 0xfe, 0x00])).await;
        assert!(matches!(binary, Err(AppError::UpstreamParse(_))));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_upstream_parse_error() {
        let result = extract_text(DocumentKind::Pdf, Bytes::from_static(b"not a pdf")).await;
        assert!(matches!(result, Err(AppError::UpstreamParse(_))));
    }
}
