//! Multipart form parsing and attachment storage shared by the project and
//! achievement handlers.
//!
//! The attachment's type is checked while the form is read, so a rejected
//! upload never reaches the disk. Stored files are named by
//! [`generate_stored_name`]; the client filename only contributes an
//! extension, and only one that belongs to the attachment kind.

use std::collections::HashMap;
use std::path::Path;

use archive_core::attachments::{generate_stored_name, is_safe_stored_name, AttachmentKind};
use archive_core::error::CoreError;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::error::{AppError, AppResult};

/// An attachment received in a multipart form, not yet written to disk.
#[derive(Debug)]
pub struct UploadedFile {
    pub kind: AttachmentKind,
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Text fields plus the (optional) attachment of a multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Build a form from text fields only.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            file: None,
        }
    }

    /// Trimmed value of `name`, or `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.raw(name).filter(|v| !v.is_empty())
    }

    /// Trimmed value of `name` when present, even if blank.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim())
    }

    /// Value of a field that must be present and non-blank.
    pub fn required(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| CoreError::Validation(format!("{name} is required")).into())
    }

    /// Value of a field that may be omitted but must not be blanked.
    pub fn non_blank(&self, name: &str) -> AppResult<Option<String>> {
        match self.raw(name) {
            None => Ok(None),
            Some("") => Err(CoreError::Validation(format!("{name} must not be empty")).into()),
            Some(v) => Ok(Some(v.to_string())),
        }
    }
}

/// Drain a multipart request into a [`MultipartForm`].
///
/// The field named after `kind` carries the attachment; its type is validated
/// before the bytes are accepted. A file part with no name and no content
/// (what browsers send for an untouched file input) counts as no file.
pub async fn read_multipart(
    mut multipart: Multipart,
    kind: AttachmentKind,
) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        if name == kind.field_name() {
            let original_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.is_empty());
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            if original_name.is_none() && bytes.is_empty() {
                continue;
            }
            kind.validate(content_type.as_deref(), original_name.as_deref())?;

            form.file = Some(UploadedFile {
                kind,
                original_name,
                content_type,
                bytes,
            });
        } else if !name.is_empty() {
            let value = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Write an attachment into `upload_dir` under a fresh generated name.
pub async fn store_upload(upload_dir: &Path, file: &UploadedFile) -> AppResult<String> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    let stored_name = generate_stored_name(file.kind, file.original_name.as_deref());
    tokio::fs::write(upload_dir.join(&stored_name), &file.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

    tracing::debug!(file = %stored_name, size = file.bytes.len(), "Stored upload");
    Ok(stored_name)
}

/// Best-effort removal of a stored attachment. Failures are logged, never
/// returned: the record change that made the file obsolete already happened.
pub async fn remove_upload(upload_dir: &Path, stored_name: &str) {
    if !is_safe_stored_name(stored_name) {
        tracing::warn!(file = %stored_name, "Refusing to remove attachment with unsafe name");
        return;
    }

    match tokio::fs::remove_file(upload_dir.join(stored_name)).await {
        Ok(()) => tracing::debug!(file = %stored_name, "Removed attachment"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(file = %stored_name, "Attachment already gone");
        }
        Err(e) => tracing::warn!(file = %stored_name, error = %e, "Failed to remove attachment"),
    }
}

/// Store the form's attachment, if any.
pub async fn store_optional(upload_dir: &Path, form: &MultipartForm) -> AppResult<Option<String>> {
    match &form.file {
        Some(file) => Ok(Some(store_upload(upload_dir, file).await?)),
        None => Ok(None),
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
