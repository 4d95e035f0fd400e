//! Uploaded attachment rules: accepted file types and server-side naming.
//!
//! The bytes live on disk under the configured upload directory; records only
//! keep the generated filename. Client-supplied names contribute nothing but
//! a sanitised extension, so a stored name can never contain a path separator.

use rand::Rng;

use crate::error::CoreError;

/// Longest extension kept from a client filename.
const MAX_EXTENSION_LEN: usize = 8;

/// Upper bound (exclusive) of the random suffix in stored filenames.
const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;

/// Raster formats only. SVG is excluded: it can carry script and uploads are
/// served from the API origin.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Which kind of file an upload field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Project manuscript, multipart field `pdf`.
    Pdf,
    /// Achievement picture, multipart field `image`.
    Image,
}

impl AttachmentKind {
    /// Multipart field name carrying this attachment.
    pub fn field_name(self) -> &'static str {
        match self {
            AttachmentKind::Pdf => "pdf",
            AttachmentKind::Image => "image",
        }
    }

    /// Whether `ext` (already sanitised) is a file extension of this kind.
    pub fn accepts_extension(self, ext: &str) -> bool {
        match self {
            AttachmentKind::Pdf => ext == "pdf",
            AttachmentKind::Image => IMAGE_EXTENSIONS.contains(&ext),
        }
    }

    fn accepts_content_type(self, content_type: &str) -> bool {
        let ct = content_type.to_ascii_lowercase();
        match self {
            AttachmentKind::Pdf => ct == "application/pdf",
            AttachmentKind::Image => ct.starts_with("image/") && !ct.starts_with("image/svg"),
        }
    }

    /// Check an upload against the accepted types for this kind.
    ///
    /// The declared content type and the client filename's extension must
    /// both match when present, and at least one of them must be present.
    pub fn validate(
        self,
        content_type: Option<&str>,
        original_name: Option<&str>,
    ) -> Result<(), CoreError> {
        let ext = original_name.and_then(sanitize_extension);
        let declared = content_type.map(str::trim).filter(|c| !c.is_empty());

        let accepted = match (declared, ext.as_deref()) {
            (None, None) => false,
            (Some(ct), None) => self.accepts_content_type(ct),
            (None, Some(ext)) => self.accepts_extension(ext),
            (Some(ct), Some(ext)) => self.accepts_content_type(ct) && self.accepts_extension(ext),
        };

        if accepted {
            Ok(())
        } else {
            Err(CoreError::Validation(match self {
                AttachmentKind::Pdf => "Only PDF files allowed".to_string(),
                AttachmentKind::Image => "Only image files allowed".to_string(),
            }))
        }
    }
}

/// Extract a safe, lowercased extension from a client filename.
///
/// Returns `None` when there is no extension or it contains anything other
/// than ASCII alphanumerics or is longer than eight characters.
pub fn sanitize_extension(original_name: &str) -> Option<String> {
    let base = original_name.rsplit(['/', '\\']).next().unwrap_or("");
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Generate a collision-resistant stored filename:
/// `<unix millis>-<random suffix>[.<ext>]`.
///
/// The extension is kept only when it belongs to `kind`; a PDF is always
/// stored as `.pdf`, so the static file server never sees an active type.
pub fn generate_stored_name(kind: AttachmentKind, original_name: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..RANDOM_SUFFIX_BOUND);
    let ext = original_name
        .and_then(sanitize_extension)
        .filter(|e| kind.accepts_extension(e))
        .or_else(|| (kind == AttachmentKind::Pdf).then(|| "pdf".to_string()));
    match ext {
        Some(ext) => format!("{millis}-{suffix}.{ext}"),
        None => format!("{millis}-{suffix}"),
    }
}

/// Whether `name` is a bare filename that is safe to join onto the upload
/// directory (no separators, no parent references, not hidden).
pub fn is_safe_stored_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
