//! Fixed upload policy checked before any I/O happens.

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted image suffixes, compared case-insensitively.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg"];

/// True when an image of `size` bytes fits under [`MAX_IMAGE_BYTES`]. Empty files pass.
pub fn is_valid_image_size(size: u64) -> bool {
    size <= MAX_IMAGE_BYTES
}

/// True when the filename ends in one of [`ALLOWED_IMAGE_EXTENSIONS`].
pub fn is_valid_image_extension(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| {
        ALLOWED_IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    })
}

/// Drops the trailing `.ext` segment; names without one come back unchanged.
pub fn remove_extension(filename: &str) -> &str {
    match extension_start(filename) {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}

fn extension_of(filename: &str) -> Option<&str> {
    extension_start(filename).map(|dot| &filename[dot + 1..])
}

// Only the last path segment can carry an extension.
fn extension_start(filename: &str) -> Option<usize> {
    let segment_start = filename.rfind(['/', '\\']).map_or(0, |sep| sep + 1);
    filename[segment_start..]
        .rfind('.')
        .map(|dot| segment_start + dot)
}
