// Core types shared by every partview crate

pub mod progress;
pub mod tree;

pub use progress::TaskProgress;
pub use tree::{DocumentId, DocumentTree, EntityId, NodeKind, TreeNode, TreeNodeId, TreeNodeRef};
