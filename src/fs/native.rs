use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::fs::provider::{EntryInfo, EntryKind, PathProvider};

/// [`PathProvider`] backed by the local filesystem.
///
/// Entries are listed in name order. Symlinks are followed, so a link to a
/// directory is expandable like the directory itself.
#[derive(Debug, Clone)]
pub struct NativeProvider {
    show_hidden: bool,
}

impl Default for NativeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeProvider {
    /// Create a provider that lists hidden entries.
    pub fn new() -> Self {
        Self { show_hidden: true }
    }

    /// Whether dot-files are listed.
    pub fn show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    fn read_entries(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!("skipping entry in {}: {err}", path.display());
                    continue;
                }
            };
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    let name = raw.to_string_lossy().to_string();
                    debug!(
                        "non UTF-8 name in {} listed as {name:?}, it will not resolve",
                        path.display()
                    );
                    name
                }
            };
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn stat(path: &Path) -> Result<EntryInfo> {
        let metadata = fs::metadata(path)?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Ok(EntryInfo {
            kind,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

impl PathProvider for NativeProvider {
    fn list_entries(&self, path: &str) -> Vec<String> {
        match self.read_entries(Path::new(path)) {
            Ok(names) => names,
            Err(err) => {
                debug!("cannot list {path}: {err}");
                Vec::new()
            }
        }
    }

    fn entry_info(&self, path: &str) -> Option<EntryInfo> {
        match Self::stat(Path::new(path)) {
            Ok(info) => Some(info),
            Err(err) => {
                debug!("cannot stat {path}: {err}");
                None
            }
        }
    }

    fn separator(&self) -> &str {
        std::path::MAIN_SEPARATOR_STR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::provider::{Attribute, AttributeValue, Column, Glyph};
    use std::fs::File;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("file_a.txt"), "hello").unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("alpha").join("inner.txt")).unwrap();
        File::create(dir.path().join("alpha").join("other.txt")).unwrap();
        dir
    }

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn lists_sorted_entries_including_hidden() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new();
        let names = provider.list_entries(&path_str(dir.path()));
        assert_eq!(names, vec![".hidden", "alpha", "beta", "file_a.txt"]);
    }

    #[test]
    fn hides_dot_files_when_asked() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new().show_hidden(false);
        let names = provider.list_entries(&path_str(dir.path()));
        assert_eq!(names, vec!["alpha", "beta", "file_a.txt"]);
    }

    #[test]
    fn listing_a_file_or_missing_path_is_empty() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new();
        assert!(provider
            .list_entries(&path_str(&dir.path().join("file_a.txt")))
            .is_empty());
        assert!(provider
            .list_entries(&path_str(&dir.path().join("nope")))
            .is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_name_is_kept_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(OsStr::from_bytes(b"d\xff"))).unwrap();
        let provider = NativeProvider::new();
        let root = path_str(dir.path());
        assert_eq!(provider.list_entries(&root), vec!["d\u{fffd}"]);

        let lossy = provider.join(&root, "d\u{fffd}");
        assert!(!provider.is_directory(&lossy));
        assert_eq!(
            provider.attribute(&lossy, Attribute::Display(Column::Type)),
            Some(AttributeValue::Text("Unknown".into()))
        );
    }

    #[test]
    fn is_directory_matches_metadata() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new();
        assert!(provider.is_directory(&path_str(&dir.path().join("alpha"))));
        assert!(!provider.is_directory(&path_str(&dir.path().join("file_a.txt"))));
        assert!(!provider.is_directory(&path_str(&dir.path().join("nope"))));
    }

    #[test]
    fn file_size_is_byte_length() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new();
        let file = path_str(&dir.path().join("file_a.txt"));
        assert_eq!(
            provider.attribute(&file, Attribute::Display(Column::Size)),
            Some(AttributeValue::Bytes(5))
        );
        assert!(matches!(
            provider.attribute(&file, Attribute::Display(Column::LastModified)),
            Some(AttributeValue::Modified(_))
        ));
    }

    #[test]
    fn directory_size_is_entry_count() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new();
        let alpha = path_str(&dir.path().join("alpha"));
        assert_eq!(
            provider.attribute(&alpha, Attribute::Display(Column::Size)),
            Some(AttributeValue::Entries(2))
        );
        assert_eq!(
            provider.attribute(&alpha, Attribute::Display(Column::Name)),
            Some(AttributeValue::Text("alpha".into()))
        );
        assert_eq!(
            provider.attribute(&alpha, Attribute::Decoration),
            Some(AttributeValue::Icon(Glyph::Folder))
        );
    }

    #[test]
    fn removed_path_degrades_to_unknown() {
        let dir = setup_test_dir();
        let provider = NativeProvider::new();
        let file = dir.path().join("file_a.txt");
        fs::remove_file(&file).unwrap();
        let file = path_str(&file);
        assert_eq!(
            provider.attribute(&file, Attribute::Display(Column::Type)),
            Some(AttributeValue::Text("Unknown".into()))
        );
        assert_eq!(provider.attribute(&file, Attribute::Display(Column::Size)), None);
        assert_eq!(
            provider.attribute(&file, Attribute::Decoration),
            Some(AttributeValue::Icon(Glyph::Unknown))
        );
    }
}
