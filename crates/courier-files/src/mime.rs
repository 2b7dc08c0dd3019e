/// Extension-based lookup. `None` when the extension is unknown.
pub fn guess_mimetype_from_filename(name: &str) -> Option<&'static str> {
    mime_guess::from_path(name).first_raw()
}

/// Sniff the mimetype from a leading magic number.
///
/// Only the image formats the platform renders inline previews for are
/// recognised (PNG, JPEG, GIF, WEBP). Anything else yields `None`.
pub fn guess_mimetype_from_data(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if data.get(6..).is_some_and(|rest| rest.starts_with(b"Exif") || rest.starts_with(b"JFIF")) {
        return Some("image/jpeg");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.starts_with(b"RIFF") && data.get(8..).is_some_and(|rest| rest.starts_with(b"WEBP")) {
        return Some("image/webp");
    }
    None
}

// Registry order is alphabetical, which picks odd choices for a few types.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("text/plain", ".txt"),
    ("video/mp4", ".mp4"),
    ("audio/mpeg", ".mp3"),
];

/// Guess a file extension, with its leading `.`, for a mimetype.
///
/// Parameters such as `;charset=UTF-8` are ignored.
///
/// ```
/// assert_eq!(courier_files::guess_file_extension("image/png").as_deref(), Some(".png"));
/// ```
pub fn guess_file_extension(mimetype: &str) -> Option<String> {
    let essence = mimetype.split(';').next()?.trim().to_ascii_lowercase();

    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(mime, _)| *mime == essence) {
        return Some((*ext).to_owned());
    }

    mime_guess::get_mime_extensions_str(&essence)?
        .first()
        .map(|ext| format!(".{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_from_filename() {
        assert_eq!(guess_mimetype_from_filename("cat.png"), Some("image/png"));
        assert_eq!(guess_mimetype_from_filename("notes.txt"), Some("text/plain"));
        assert_eq!(guess_mimetype_from_filename("no_extension"), None);
        assert_eq!(guess_mimetype_from_filename("weird.zzzqqq"), None);
    }

    #[test]
    fn test_guess_from_data() {
        assert_eq!(guess_mimetype_from_data(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), Some("image/png"));
        assert_eq!(guess_mimetype_from_data(b"\xff\xd8\xff\xe0\0\x10JFIF\0"), Some("image/jpeg"));
        assert_eq!(guess_mimetype_from_data(b"\xff\xd8\xff\xe1\0\x10Exif\0"), Some("image/jpeg"));
        assert_eq!(guess_mimetype_from_data(b"GIF87a...."), Some("image/gif"));
        assert_eq!(guess_mimetype_from_data(b"GIF89a...."), Some("image/gif"));
        assert_eq!(guess_mimetype_from_data(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(guess_mimetype_from_data(b"RIFF\0\0\0\0WAVEfmt "), None);
        assert_eq!(guess_mimetype_from_data(b"hello world"), None);
        assert_eq!(guess_mimetype_from_data(b""), None);
    }

    #[test]
    fn test_guess_file_extension() {
        assert_eq!(guess_file_extension("image/png").as_deref(), Some(".png"));
        assert_eq!(guess_file_extension("image/gif").as_deref(), Some(".gif"));
        assert_eq!(guess_file_extension("image/jpeg").as_deref(), Some(".jpg"));
        assert_eq!(guess_file_extension("text/plain;charset=UTF-8").as_deref(), Some(".txt"));
        assert_eq!(guess_file_extension("application/x-not-a-real-type"), None);
    }
}
