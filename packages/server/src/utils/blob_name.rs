use chrono::Utc;
use uuid::Uuid;

/// Longest extension carried over from an upload filename.
const MAX_EXT_LEN: usize = 8;

/// Derive the storage key for an uploaded file: `{unix_ts}-{uuid}`,
/// plus the sanitized extension of the original filename if it has a
/// usable one.
pub fn generate(original_filename: Option<&str>) -> String {
    let base = format!("{}-{}", Utc::now().timestamp(), Uuid::new_v4());
    match original_filename.and_then(extension) {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

/// Extract a safe lowercase extension from a filename.
fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXT_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_upload_extension_lowercased() {
        let name = generate(Some("Carbonara Take 3.MP4"));

        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn names_without_usable_extensions_stay_bare() {
        for filename in [None, Some("clip"), Some(".hidden"), Some("clip."), Some("a.b/c")] {
            let name = generate(filename);
            assert!(!name.contains('.'), "{filename:?} produced {name}");
        }
    }

    #[test]
    fn extension_rejects_oversized_and_unsafe_suffixes() {
        assert_eq!(extension("clip.verylongext"), None);
        assert_eq!(extension("clip.mp 4"), None);
        assert_eq!(extension("clip.mp4"), Some("mp4".into()));
    }

    #[test]
    fn generated_names_are_unique() {
        assert_ne!(generate(None), generate(None));
    }
}
