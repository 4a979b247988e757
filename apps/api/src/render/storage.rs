use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Object key of a tailored resume's PDF.
pub fn pdf_key(tailored_id: Uuid) -> String {
    format!("tailored/{tailored_id}.pdf")
}

/// Uploads the PDF for a tailored resume and returns its object key.
pub async fn upload_pdf(
    s3: &S3Client,
    bucket: &str,
    tailored_id: Uuid,
    pdf: Vec<u8>,
) -> Result<String, AppError> {
    let key = pdf_key(tailored_id);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(pdf))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("PDF upload failed: {e}")))?;

    info!("Uploaded tailored resume PDF to s3://{bucket}/{key}");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_key_layout() {
        let id = Uuid::nil();
        assert_eq!(pdf_key(id), "tailored/00000000-0000-0000-0000-000000000000.pdf");
    }
}
