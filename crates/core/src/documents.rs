//! Document metadata rules.
//!
//! File bytes never pass through this service; callers register metadata for
//! a file already stored elsewhere, and these checks mirror what the upload
//! collaborator enforces.

use crate::error::CoreError;

/// Largest accepted file, in bytes (50 MiB).
pub const MAX_DOCUMENT_BYTES: i64 = 50 * 1024 * 1024;

/// Accepted file extensions, lower case, without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpeg", "jpg", "png", "gif", "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "zip",
    "rar",
];

/// Lower-cased extension of `file_name`, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn validate_document_metadata(original_name: &str, size_bytes: i64) -> Result<(), CoreError> {
    let ext = extension_of(original_name).ok_or_else(|| {
        CoreError::Validation(format!("File '{original_name}' has no extension"))
    })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "File type '.{ext}' is not allowed. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    if size_bytes < 0 {
        return Err(CoreError::Validation("size_bytes must not be negative".into()));
    }
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(CoreError::Validation(format!(
            "File is {size_bytes} bytes; the limit is {MAX_DOCUMENT_BYTES}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Minutes.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("archive.tar.zip").as_deref(), Some("zip"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
    }

    #[test]
    fn accepts_office_files_within_limit() {
        assert!(validate_document_metadata("plan.xlsx", 1024).is_ok());
        assert!(validate_document_metadata("charter.docx", MAX_DOCUMENT_BYTES).is_ok());
    }

    #[test]
    fn rejects_executables_and_oversize() {
        assert!(validate_document_metadata("setup.exe", 10).is_err());
        assert!(validate_document_metadata("big.pdf", MAX_DOCUMENT_BYTES + 1).is_err());
        assert!(validate_document_metadata("noext", 10).is_err());
    }
}
