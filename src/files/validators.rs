// src/files/validators.rs

/// Upload size cap: 10 MiB.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Documents accepted alongside the image/audio/video wildcards.
const ALLOWED_DOCUMENTS: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/rtf",
];

pub fn is_allowed_file_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
        || mime_type.starts_with("audio/")
        || mime_type.starts_with("video/")
        || ALLOWED_DOCUMENTS.contains(&mime_type)
}
