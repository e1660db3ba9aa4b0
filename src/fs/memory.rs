use std::collections::HashMap;
use std::time::SystemTime;

use crate::fs::provider::{EntryInfo, EntryKind, PathProvider};

const SEPARATOR: &str = "/";

#[derive(Debug, Clone)]
enum MemoryEntry {
    Directory { children: Vec<String> },
    File { len: u64 },
}

#[derive(Debug, Clone)]
struct MemoryNode {
    entry: MemoryEntry,
    modified: Option<SystemTime>,
}

/// In-memory [`PathProvider`] with `/`-separated absolute paths.
///
/// Entries list in insertion order. Adding a path creates its missing
/// ancestors as directories, the way `create_dir_all` would.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    nodes: HashMap<String, MemoryNode>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    /// Create a store holding only the root directory `/`.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            SEPARATOR.to_string(),
            MemoryNode {
                entry: MemoryEntry::Directory {
                    children: Vec::new(),
                },
                modified: None,
            },
        );
        Self { nodes }
    }

    /// Add a directory (and any missing ancestors).
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        self.insert(
            path,
            MemoryEntry::Directory {
                children: Vec::new(),
            },
        );
        self
    }

    /// Add a file of `len` bytes (and any missing ancestors).
    pub fn add_file(&mut self, path: &str, len: u64) -> &mut Self {
        self.insert(path, MemoryEntry::File { len });
        self
    }

    pub fn set_modified(&mut self, path: &str, modified: SystemTime) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(path) {
            node.modified = Some(modified);
        }
        self
    }

    /// Remove `path` and everything below it. Returns `false` if it was absent.
    pub fn remove(&mut self, path: &str) -> bool {
        let Some(node) = self.nodes.remove(path) else {
            return false;
        };
        if let Some((parent, name)) = split_parent(path) {
            if let Some(MemoryNode {
                entry: MemoryEntry::Directory { children },
                ..
            }) = self.nodes.get_mut(parent)
            {
                children.retain(|child| child != name);
            }
        }
        let mut pending = vec![(path.to_string(), node)];
        while let Some((current, node)) = pending.pop() {
            if let MemoryEntry::Directory { children } = node.entry {
                for child in children {
                    let child_path = self.join(&current, &child);
                    if let Some(child_node) = self.nodes.remove(&child_path) {
                        pending.push((child_path, child_node));
                    }
                }
            }
        }
        true
    }

    /// Paths below an existing file are not stored.
    fn insert(&mut self, path: &str, entry: MemoryEntry) {
        if self.nodes.contains_key(path) {
            return;
        }
        if let Some((parent, name)) = split_parent(path) {
            if !self.nodes.contains_key(parent) {
                self.add_dir(parent);
            }
            match self.nodes.get_mut(parent) {
                Some(MemoryNode {
                    entry: MemoryEntry::Directory { children },
                    ..
                }) => children.push(name.to_string()),
                _ => return,
            }
        }
        self.nodes.insert(
            path.to_string(),
            MemoryNode {
                entry,
                modified: None,
            },
        );
    }
}

/// Split `/a/b` into (`/a`, `b`) and `/a` into (`/`, `a`).
fn split_parent(path: &str) -> Option<(&str, &str)> {
    let index = path.rfind(SEPARATOR)?;
    let name = &path[index + 1..];
    if name.is_empty() {
        return None;
    }
    let parent = if index == 0 { SEPARATOR } else { &path[..index] };
    Some((parent, name))
}

impl PathProvider for MemoryProvider {
    fn list_entries(&self, path: &str) -> Vec<String> {
        match self.nodes.get(path) {
            Some(MemoryNode {
                entry: MemoryEntry::Directory { children },
                ..
            }) => children.clone(),
            _ => Vec::new(),
        }
    }

    fn entry_info(&self, path: &str) -> Option<EntryInfo> {
        let node = self.nodes.get(path)?;
        let (kind, len) = match node.entry {
            MemoryEntry::Directory { .. } => (EntryKind::Directory, 0),
            MemoryEntry::File { len } => (EntryKind::File, len),
        };
        Some(EntryInfo {
            kind,
            len,
            modified: node.modified,
        })
    }

    fn separator(&self) -> &str {
        SEPARATOR
    }
}
