//! Tree nodes and the arena that owns them.
//!
//! A node owns its children through the arena: removing a node removes its
//! whole subtree. The parent link is a plain handle and never keeps anything
//! alive. Handles carry a generation, so a handle to a destroyed node resolves
//! to `None` even after its slot has been reused.

/// Handle to a node stored in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    slot: u32,
    generation: u32,
}

/// A node in the lazy filesystem tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Path this node represents. Empty for the placeholder sentinel.
    identifier: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    /// Create a node for `identifier` under `parent` (`None` for the root).
    pub fn new(identifier: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            identifier: identifier.into(),
            parent,
            children: Vec::new(),
        }
    }

    /// Create the sentinel child that marks `parent` as not yet expanded.
    pub fn placeholder(parent: NodeId) -> Self {
        Self::new(String::new(), Some(parent))
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether this node is the placeholder sentinel.
    pub fn is_placeholder(&self) -> bool {
        self.identifier.is_empty()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn append_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Detach the child at `row`, returning its handle.
    ///
    /// The child's subtree is still stored in the arena; pass the handle to
    /// [`NodeArena::remove_subtree`] to destroy it.
    pub fn remove_child_at(&mut self, row: usize) -> Option<NodeId> {
        if row < self.children.len() {
            Some(self.children.remove(row))
        } else {
            None
        }
    }

    pub fn child_at(&self, row: usize) -> Option<NodeId> {
        self.children.get(row).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Detach every child at once.
    pub(crate) fn take_children(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.children)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<TreeNode>,
}

/// Generational storage for [`TreeNode`]s.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `node` and return its handle. Freed slots are reused first.
    pub fn insert(&mut self, node: TreeNode) -> NodeId {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.node = Some(node);
            return NodeId {
                slot,
                generation: entry.generation,
            };
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            slot,
            generation: 0,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots
            .get(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Position of `id` in its parent's child list.
    ///
    /// Returns 0 for the root, for a node whose parent is gone, and for a
    /// handle that no longer resolves.
    pub fn row_in_parent(&self, id: NodeId) -> usize {
        self.get(id)
            .and_then(TreeNode::parent)
            .and_then(|parent| self.get(parent))
            .and_then(|parent| parent.children().iter().position(|child| *child == id))
            .unwrap_or(0)
    }

    /// Destroy `id` and everything below it, detaching it from its parent.
    ///
    /// Returns how many nodes were freed (0 for a stale handle).
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.get(id).and_then(TreeNode::parent) else {
            return self.free_subtree(id);
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }
        self.free_subtree(id)
    }

    fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(entry) = self
                .slots
                .get_mut(current.slot as usize)
                .filter(|entry| entry.generation == current.generation)
            else {
                continue;
            };
            let Some(node) = entry.node.take() else {
                continue;
            };
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(current.slot);
            self.len -= 1;
            freed += 1;
            stack.extend(node.children);
        }
        freed
    }

    /// Destroy every node. All outstanding handles become stale.
    pub fn clear(&mut self) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.node.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(slot as u32);
            }
        }
        self.len = 0;
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
