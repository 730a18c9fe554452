use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use tracing::debug;

use crate::domain::errors::UploadError;

/// Form field clients are expected to use.
pub const FILE_FIELD: &str = "file";

/// Bytes of the uploaded image.
///
/// Takes the `file` field, or failing that the first part that carries a
/// filename.
pub async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> Result<Vec<u8>, UploadError> {
    let mut multipart = multipart.map_err(|e| UploadError::Read {
        reason: e.body_text(),
    })?;

    loop {
        let field = multipart.next_field().await.map_err(|e| UploadError::Read {
            reason: e.body_text(),
        })?;
        let Some(field) = field else {
            return Err(UploadError::MissingFile);
        };

        let is_file = field.name() == Some(FILE_FIELD) || field.file_name().is_some();
        if !is_file {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        debug!(
            "Reading upload {:?} ({:?})",
            field.file_name(),
            field.content_type()
        );
        let bytes = field.bytes().await.map_err(|e| UploadError::Read {
            reason: e.body_text(),
        })?;
        return Ok(bytes.to_vec());
    }
}
