use crate::mime::{guess_file_extension, guess_mimetype_from_data};

/// Filename prefix that makes the platform hide an attachment until clicked.
pub const SPOILER_TAG: &str = "SPOILER_";

/// Generate a quasi-unique filename from whatever is known about the content.
///
/// The stem is a time-ordered UUID. The extension is `extension` if given,
/// else derived from `mimetype`, else from the magic number of `data`;
/// without any of them the name has no extension.
pub fn generate_filename_from_details(
    mimetype: Option<&str>,
    extension: Option<&str>,
    data: Option<&[u8]>,
) -> String {
    let mimetype = mimetype.or_else(|| data.and_then(guess_mimetype_from_data));

    let extension = match extension {
        Some(ext) => Some(ext.to_owned()),
        None => mimetype.and_then(guess_file_extension),
    };

    let stem = uuid::Uuid::now_v7().simple().to_string();
    match extension.as_deref() {
        None | Some("") => stem,
        Some(ext) if ext.starts_with('.') => format!("{stem}{ext}"),
        Some(ext) => format!("{stem}.{ext}"),
    }
}
