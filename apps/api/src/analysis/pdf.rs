use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;

/// Extracts the text layer of an uploaded PDF on the blocking pool.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            warn!("PDF extraction task aborted: {e}");
            AppError::Validation("Failed to parse PDF: the file could not be read".to_string())
        })?;

    match result {
        Ok(text) => {
            info!("Extracted {} chars of text from a {} byte PDF", text.len(), size);
            Ok(text)
        }
        Err(e) => {
            warn!("PDF extraction failed for a {size} byte upload: {e}");
            Err(AppError::Validation(format!("Failed to parse PDF: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_rejected() {
        let err = extract_pdf_text(Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Failed to parse PDF")));
    }
}
