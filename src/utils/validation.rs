/// Extensions accepted by the upload forms
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "pdf"];

/// Maximum length of a stored filename in bytes
pub const MAX_FILENAME_LEN: usize = 255;

/// Device names Windows refuses to use as a file stem
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitizes a client supplied filename so it can be joined onto the upload folder.
///
/// Path components are flattened into the name, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9_.-]` is dropped. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", filename);
    }

    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let mut sanitized = filtered.trim_matches(|c| c == '.' || c == '_').to_string();

    let stem = sanitized.split('.').next().unwrap_or_default();
    if !stem.is_empty()
        && WINDOWS_DEVICE_NAMES
            .iter()
            .any(|device| device.eq_ignore_ascii_case(stem))
    {
        sanitized.insert(0, '_');
    }

    // ASCII only at this point, so any byte index is a char boundary
    sanitized.truncate(MAX_FILENAME_LEN);
    sanitized
}

/// Returns the lowercased text after the last `.`, if there is one
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Splits `name.ext` into `("name", Some("ext"))`. Leading dots do not start an extension.
pub fn split_extension(filename: &str) -> (&str, Option<&str>) {
    let leading = filename.len() - filename.trim_start_matches('.').len();
    match filename[leading..].rfind('.') {
        Some(idx) => {
            let idx = leading + idx;
            (&filename[..idx], Some(&filename[idx + 1..]))
        }
        None => (filename, None),
    }
}

/// Extension gate: true when the name has an extension in [`ALLOWED_EXTENSIONS`]
pub fn allowed_file(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
