//! The capability the tree model uses for every filesystem question.

use std::time::SystemTime;

/// Number of display columns every node exposes.
pub const COLUMN_COUNT: usize = 4;

/// Display columns, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Type,
    Size,
    LastModified,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Name,
        Column::Type,
        Column::Size,
        Column::LastModified,
    ];

    /// Map a column number to a column; `None` past the fourth.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Header label.
    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Type => "Type",
            Column::Size => "Size",
            Column::LastModified => "Last Modified",
        }
    }
}

/// What a caller asks the provider about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// The display value for one column.
    Display(Column),
    /// The glyph shown next to the name.
    Decoration,
}

/// Classification of a path that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Anything else: sockets, devices, fifos.
    Other,
}

/// Metadata snapshot for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub kind: EntryKind,
    /// Byte length as reported by the backing store.
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Icon category for the decoration query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Folder,
    File,
    Unknown,
}

/// A value answered for an [`Attribute`] query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    /// File size in bytes.
    Bytes(u64),
    /// Number of immediate entries in a directory.
    Entries(usize),
    Modified(SystemTime),
    Icon(Glyph),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Filesystem interrogation used by [`LazyTreeModel`](crate::model::LazyTreeModel).
///
/// Implementations never fail: a path that cannot be read lists no entries
/// and has no [`EntryInfo`].
pub trait PathProvider {
    /// Entry names directly under `path`, in display order.
    ///
    /// Never includes `.` or `..`.
    fn list_entries(&self, path: &str) -> Vec<String>;

    /// Metadata for `path`, or `None` if it is missing or unreadable.
    fn entry_info(&self, path: &str) -> Option<EntryInfo>;

    fn separator(&self) -> &str;

    fn is_directory(&self, path: &str) -> bool {
        matches!(
            self.entry_info(path),
            Some(EntryInfo {
                kind: EntryKind::Directory,
                ..
            })
        )
    }

    /// Append `entry` to `parent` without doubling a trailing separator.
    fn join(&self, parent: &str, entry: &str) -> String {
        let separator = self.separator();
        if parent.ends_with(separator) {
            format!("{parent}{entry}")
        } else {
            format!("{parent}{separator}{entry}")
        }
    }

    /// Last component of `path`, or `path` itself when it has none.
    fn base_name<'a>(&self, path: &'a str) -> &'a str {
        path.rsplit(self.separator())
            .find(|part| !part.is_empty())
            .unwrap_or(path)
    }

    /// Answer a display or decoration query for `path`.
    ///
    /// Missing paths keep their name, are typed "Unknown", and have no size
    /// or timestamp.
    fn attribute(&self, path: &str, attribute: Attribute) -> Option<AttributeValue> {
        let info = self.entry_info(path);
        match attribute {
            Attribute::Decoration => {
                let glyph = match info.map(|info| info.kind) {
                    Some(EntryKind::Directory) => Glyph::Folder,
                    Some(EntryKind::File) => Glyph::File,
                    Some(EntryKind::Other) | None => Glyph::Unknown,
                };
                Some(AttributeValue::Icon(glyph))
            }
            Attribute::Display(Column::Name) => {
                Some(AttributeValue::Text(self.base_name(path).to_string()))
            }
            Attribute::Display(Column::Type) => {
                let label = match info.map(|info| info.kind) {
                    Some(EntryKind::Directory) => "Directory",
                    Some(EntryKind::File | EntryKind::Other) => "File",
                    None => "Unknown",
                };
                Some(AttributeValue::Text(label.to_string()))
            }
            Attribute::Display(Column::Size) => {
                let info = info?;
                match info.kind {
                    EntryKind::Directory => {
                        Some(AttributeValue::Entries(self.list_entries(path).len()))
                    }
                    EntryKind::File | EntryKind::Other => Some(AttributeValue::Bytes(info.len)),
                }
            }
            Attribute::Display(Column::LastModified) => {
                info?.modified.map(AttributeValue::Modified)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider with a single directory `/d` holding `f` (3 bytes).
    struct Fixed;

    impl PathProvider for Fixed {
        fn list_entries(&self, path: &str) -> Vec<String> {
            if path == "/d" {
                vec!["f".to_string()]
            } else {
                Vec::new()
            }
        }

        fn entry_info(&self, path: &str) -> Option<EntryInfo> {
            let kind = match path {
                "/d" => EntryKind::Directory,
                "/d/f" => EntryKind::File,
                "/d/sock" => EntryKind::Other,
                _ => return None,
            };
            Some(EntryInfo {
                kind,
                len: 3,
                modified: Some(SystemTime::UNIX_EPOCH),
            })
        }

        fn separator(&self) -> &str {
            "/"
        }
    }

    #[test]
    fn column_from_index_stops_at_four() {
        assert_eq!(Column::from_index(0), Some(Column::Name));
        assert_eq!(Column::from_index(3), Some(Column::LastModified));
        assert_eq!(Column::from_index(4), None);
        assert_eq!(Column::from_index(7), None);
        assert_eq!(Column::LastModified.index(), 3);
    }

    #[test]
    fn join_does_not_double_separator() {
        assert_eq!(Fixed.join("/d", "f"), "/d/f");
        assert_eq!(Fixed.join("/", "d"), "/d");
    }

    #[test]
    fn base_name_of_nested_and_root() {
        assert_eq!(Fixed.base_name("/d/f"), "f");
        assert_eq!(Fixed.base_name("/d/"), "d");
        assert_eq!(Fixed.base_name("/"), "/");
    }

    #[test]
    fn type_and_size_for_directory() {
        assert_eq!(
            Fixed.attribute("/d", Attribute::Display(Column::Type)),
            Some(AttributeValue::Text("Directory".into()))
        );
        assert_eq!(
            Fixed.attribute("/d", Attribute::Display(Column::Size)),
            Some(AttributeValue::Entries(1))
        );
    }

    #[test]
    fn type_and_size_for_file() {
        assert_eq!(
            Fixed.attribute("/d/f", Attribute::Display(Column::Type)),
            Some(AttributeValue::Text("File".into()))
        );
        assert_eq!(
            Fixed.attribute("/d/f", Attribute::Display(Column::Size)),
            Some(AttributeValue::Bytes(3))
        );
        assert_eq!(
            Fixed.attribute("/d/f", Attribute::Display(Column::LastModified)),
            Some(AttributeValue::Modified(SystemTime::UNIX_EPOCH))
        );
    }

    #[test]
    fn missing_path_degrades() {
        assert_eq!(
            Fixed.attribute("/gone", Attribute::Display(Column::Name)),
            Some(AttributeValue::Text("gone".into()))
        );
        assert_eq!(
            Fixed.attribute("/gone", Attribute::Display(Column::Type)),
            Some(AttributeValue::Text("Unknown".into()))
        );
        assert_eq!(Fixed.attribute("/gone", Attribute::Display(Column::Size)), None);
        assert_eq!(
            Fixed.attribute("/gone", Attribute::Display(Column::LastModified)),
            None
        );
        assert!(!Fixed.is_directory("/gone"));
    }

    #[test]
    fn decoration_glyphs() {
        let glyph = |path| match Fixed.attribute(path, Attribute::Decoration) {
            Some(AttributeValue::Icon(glyph)) => glyph,
            other => panic!("unexpected decoration {other:?}"),
        };
        assert_eq!(glyph("/d"), Glyph::Folder);
        assert_eq!(glyph("/d/f"), Glyph::File);
        assert_eq!(glyph("/d/sock"), Glyph::Unknown);
        assert_eq!(glyph("/gone"), Glyph::Unknown);
    }
}
