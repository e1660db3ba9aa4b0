//! Node storage and the filesystem capability behind the tree model.

pub mod memory;
pub mod native;
pub mod node;
pub mod provider;

pub use memory::MemoryProvider;
pub use native::NativeProvider;
pub use node::{NodeArena, NodeId, TreeNode};
pub use provider::{
    Attribute, AttributeValue, Column, EntryInfo, EntryKind, Glyph, PathProvider, COLUMN_COUNT,
};
