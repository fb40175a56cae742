//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{filename}`.

/// Build the object key for an uploaded document.
///
/// The filename is used exactly as received. Backends that map keys onto a filesystem
/// still refuse traversal sequences on their own.
pub fn object_key(folder: &str, filename: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", folder, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_joins_folder_and_filename() {
        assert_eq!(object_key("ingesta", "invoice.jpg"), "ingesta/invoice.jpg");
        assert_eq!(object_key("ingesta/", "invoice.jpg"), "ingesta/invoice.jpg");
        assert_eq!(object_key("", "invoice.jpg"), "invoice.jpg");
    }

    #[test]
    fn test_object_key_keeps_filename_verbatim() {
        assert_eq!(
            object_key("ingesta", "Factura Marzo.JPG"),
            "ingesta/Factura Marzo.JPG"
        );
    }
}
