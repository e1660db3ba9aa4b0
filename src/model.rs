//! Row/column addressable tree model that lists directories on demand.
//!
//! Every directory node starts out holding a single placeholder child with an
//! empty identifier. The placeholder lets a consumer render an expand
//! affordance without listing the directory. [`LazyTreeModel::expand`] swaps
//! the placeholder for the real entries the first time the consumer opens the
//! node.
//!
//! Consumers address nodes with [`ModelIndex`] values obtained from
//! [`LazyTreeModel::index`]. An index whose node has since been destroyed (by
//! [`LazyTreeModel::refresh`] or [`LazyTreeModel::set_root_path`]) behaves
//! like the invalid index: every query on it returns an empty result.

use tracing::debug;

use crate::fs::node::{NodeArena, NodeId, TreeNode};
use crate::fs::provider::{Attribute, AttributeValue, Column, PathProvider, COLUMN_COUNT};

/// A consumer-facing address: row, column, and the node it resolves to.
///
/// The default value is the invalid index, which stands for the root when
/// passed as a parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    node: Option<NodeId>,
}

impl ModelIndex {
    fn new(row: usize, column: usize, node: NodeId) -> Self {
        Self {
            row,
            column,
            node: Some(node),
        }
    }

    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// Which kind of data a [`LazyTreeModel::data`] call asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The column's display value.
    Display,
    /// The glyph next to the name. Only answered for column 0.
    Decoration,
}

/// Behaviour switches for [`LazyTreeModel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelOptions {
    /// List directories before files when expanding, each group in provider order.
    pub dirs_first: bool,
}

/// Lazily populated tree over whatever a [`PathProvider`] exposes.
pub struct LazyTreeModel<P> {
    provider: P,
    options: ModelOptions,
    nodes: NodeArena,
    root: Option<NodeId>,
    root_path: String,
}

impl<P: PathProvider> LazyTreeModel<P> {
    /// Create an empty model. Call [`set_root_path`](Self::set_root_path) to populate it.
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, ModelOptions::default())
    }

    pub fn with_options(provider: P, options: ModelOptions) -> Self {
        Self {
            provider,
            options,
            nodes: NodeArena::new(),
            root: None,
            root_path: String::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the backing store. Call [`refresh`](Self::refresh)
    /// on the affected directory after changing it.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn options(&self) -> ModelOptions {
        self.options
    }

    /// Discard the whole tree and rebuild it one level deep under `path`.
    ///
    /// Returns the index of the root node itself.
    pub fn set_root_path(&mut self, path: &str) -> ModelIndex {
        let released = self.nodes.len();
        self.nodes.clear();
        let root = self.nodes.insert(TreeNode::new(path, None));
        self.root = Some(root);
        self.root_path = path.to_string();
        let count = self.populate(root);
        debug!("root set to {path}: {count} entries, {released} nodes released");
        ModelIndex::new(0, 0, root)
    }

    /// The path last passed to [`set_root_path`](Self::set_root_path).
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Index of the root node, or the invalid index before a root is set.
    pub fn root_index(&self) -> ModelIndex {
        self.root
            .map_or_else(ModelIndex::invalid, |root| ModelIndex::new(0, 0, root))
    }

    /// Rebuild the tree from the current root path.
    pub fn reload(&mut self) -> ModelIndex {
        if self.root.is_none() {
            return ModelIndex::invalid();
        }
        let path = self.root_path.clone();
        self.set_root_path(&path)
    }

    pub fn row_count(&self, parent: ModelIndex) -> usize {
        if parent.column() > 0 {
            return 0;
        }
        self.parent_node(parent)
            .and_then(|id| self.nodes.get(id))
            .map_or(0, TreeNode::child_count)
    }

    pub fn column_count(&self, _parent: ModelIndex) -> usize {
        COLUMN_COUNT
    }

    /// Whether `(row, column)` lies inside `parent`'s bounds.
    pub fn has_index(&self, row: usize, column: usize, parent: ModelIndex) -> bool {
        column < self.column_count(parent) && row < self.row_count(parent)
    }

    /// Address of the child at `row` under `parent` (the root if `parent` is invalid).
    pub fn index(&self, row: usize, column: usize, parent: ModelIndex) -> ModelIndex {
        if !self.has_index(row, column, parent) {
            return ModelIndex::invalid();
        }
        self.parent_node(parent)
            .and_then(|id| self.nodes.get(id))
            .and_then(|node| node.child_at(row))
            .map_or_else(ModelIndex::invalid, |child| {
                ModelIndex::new(row, column, child)
            })
    }

    /// Address of `child`'s parent, in column 0.
    ///
    /// Children of the root report the invalid index: the root is never
    /// addressed as a parent.
    pub fn parent(&self, child: ModelIndex) -> ModelIndex {
        let Some(parent) = self
            .node_of(child)
            .and_then(|id| self.nodes.get(id))
            .and_then(TreeNode::parent)
        else {
            return ModelIndex::invalid();
        };
        if Some(parent) == self.root || !self.nodes.contains(parent) {
            return ModelIndex::invalid();
        }
        ModelIndex::new(self.nodes.row_in_parent(parent), 0, parent)
    }

    /// Whether the node still holds only its placeholder.
    pub fn is_placeholder_state(&self, index: ModelIndex) -> bool {
        self.node_of(index)
            .is_some_and(|id| self.awaits_expansion(id))
    }

    /// Whether the node's path has any entries. Does not touch the tree.
    pub fn can_expand(&self, index: ModelIndex) -> bool {
        self.node_of(index)
            .and_then(|id| self.nodes.get(id))
            .is_some_and(|node| {
                !node.is_placeholder() && !self.provider.list_entries(node.identifier()).is_empty()
            })
    }

    /// Replace the node's placeholder with its real entries.
    ///
    /// Does nothing unless the node holds exactly the placeholder, so repeated
    /// calls are harmless.
    pub fn expand(&mut self, index: ModelIndex) {
        let Some(id) = self.node_of(index) else {
            return;
        };
        if !self.awaits_expansion(id) {
            return;
        }
        if let Some(dummy) = self.nodes.get_mut(id).and_then(|node| node.remove_child_at(0)) {
            self.nodes.remove_subtree(dummy);
        }
        let count = self.populate(id);
        debug!("expanded {}: {count} entries", self.file_path(index));
    }

    /// Data for `index` in the given role, using the index's own column.
    pub fn data(&self, index: ModelIndex, role: Role) -> Option<AttributeValue> {
        match role {
            Role::Display => self.attribute_at(index, index.column()),
            Role::Decoration if index.column() == 0 => self.query(index, Attribute::Decoration),
            Role::Decoration => None,
        }
    }

    /// Display value of `column` for the node at `index`.
    ///
    /// Absent for the placeholder, for invalid indexes, and past the fourth column.
    pub fn attribute_at(&self, index: ModelIndex, column: usize) -> Option<AttributeValue> {
        let column = Column::from_index(column)?;
        self.query(index, Attribute::Display(column))
    }

    pub fn header_data(&self, section: usize) -> Option<&'static str> {
        Column::from_index(section).map(Column::title)
    }

    /// The node's path, or an empty string for an invalid index.
    pub fn file_path(&self, index: ModelIndex) -> String {
        self.node_of(index)
            .and_then(|id| self.nodes.get(id))
            .map(|node| node.identifier().to_string())
            .unwrap_or_default()
    }

    /// Drop the node's children and list them again.
    ///
    /// A node still awaiting expansion is left alone. Indexes into the old
    /// children become invalid.
    pub fn refresh(&mut self, index: ModelIndex) {
        let Some(id) = self.node_of(index) else {
            return;
        };
        if self.awaits_expansion(id) {
            return;
        }
        let old = self
            .nodes
            .get_mut(id)
            .map(TreeNode::take_children)
            .unwrap_or_default();
        let released: usize = old
            .into_iter()
            .map(|child| self.nodes.remove_subtree(child))
            .sum();
        let path = self.file_path(index);
        let count = if self.provider.is_directory(&path) {
            self.populate(id)
        } else {
            0
        };
        debug!("refreshed {path}: {released} nodes released, {count} entries");
    }

    fn node_of(&self, index: ModelIndex) -> Option<NodeId> {
        index.node.filter(|id| self.nodes.contains(*id))
    }

    /// The node `parent` names, falling back to the root for the invalid index.
    fn parent_node(&self, parent: ModelIndex) -> Option<NodeId> {
        if parent.is_valid() {
            self.node_of(parent)
        } else {
            self.root
        }
    }

    fn awaits_expansion(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        node.child_count() == 1
            && node
                .child_at(0)
                .and_then(|child| self.nodes.get(child))
                .is_some_and(TreeNode::is_placeholder)
    }

    fn query(&self, index: ModelIndex, attribute: Attribute) -> Option<AttributeValue> {
        let node = self.node_of(index).and_then(|id| self.nodes.get(id))?;
        if node.is_placeholder() {
            return None;
        }
        self.provider.attribute(node.identifier(), attribute)
    }

    /// List `parent`'s path and append one child per entry. Directories get a
    /// placeholder child. Returns the number of entries.
    fn populate(&mut self, parent: NodeId) -> usize {
        let Some(path) = self
            .nodes
            .get(parent)
            .map(|node| node.identifier().to_string())
        else {
            return 0;
        };
        let mut entries: Vec<(String, bool)> = self
            .provider
            .list_entries(&path)
            .iter()
            .map(|name| {
                let child_path = self.provider.join(&path, name);
                let is_dir = self.provider.is_directory(&child_path);
                (child_path, is_dir)
            })
            .collect();
        if self.options.dirs_first {
            entries.sort_by_key(|(_, is_dir)| !is_dir);
        }

        let count = entries.len();
        for (child_path, is_dir) in entries {
            let child = self.nodes.insert(TreeNode::new(child_path, Some(parent)));
            if is_dir {
                let dummy = self.nodes.insert(TreeNode::placeholder(child));
                if let Some(node) = self.nodes.get_mut(child) {
                    node.append_child(dummy);
                }
            }
            if let Some(node) = self.nodes.get_mut(parent) {
                node.append_child(child);
            }
        }
        count
    }
}
