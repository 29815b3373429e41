//! Document tree arena.
//!
//! Nodes live in a `DocumentTree` and are addressed by `TreeNodeId` (an index
//! into the arena). Code outside the tree never holds a raw reference to a
//! node: it gets a `TreeNodeRef`, which borrows the owning tree, so a node
//! handle can never outlive the document it belongs to.
//!
//! Geometry is identified by `EntityId`, which is stable across tree rebuilds
//! and is what per-entity settings (mesh overrides, etc.) are keyed by.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeNodeId(pub u32);

/// Stable identity of a geometric entity (shape, mesh, point cloud)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Assembly,
    Part,
    Mesh,
    PointCloud,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Assembly => "assembly",
            NodeKind::Part => "part",
            NodeKind::Mesh => "mesh",
            NodeKind::PointCloud => "point_cloud",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub entity: Option<EntityId>,
    pub parent: Option<TreeNodeId>,
}

#[derive(Debug, Clone)]
pub struct DocumentTree {
    id: DocumentId,
    name: String,
    nodes: Vec<TreeNode>,
}

impl DocumentTree {
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a top-level node
    pub fn add_root(&mut self, name: impl Into<String>, kind: NodeKind, entity: Option<EntityId>) -> TreeNodeId {
        self.push(TreeNode {
            name: name.into(),
            kind,
            entity,
            parent: None,
        })
    }

    /// Add a child node. Returns None if `parent` is not a node of this tree.
    pub fn add_child(
        &mut self,
        parent: TreeNodeId,
        name: impl Into<String>,
        kind: NodeKind,
        entity: Option<EntityId>,
    ) -> Option<TreeNodeId> {
        self.nodes.get(parent.0 as usize)?;
        Some(self.push(TreeNode {
            name: name.into(),
            kind,
            entity,
            parent: Some(parent),
        }))
    }

    fn push(&mut self, node: TreeNode) -> TreeNodeId {
        let id = TreeNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: TreeNodeId) -> Option<TreeNodeRef<'_>> {
        self.nodes.get(id.0 as usize)?;
        Some(TreeNodeRef { tree: self, id })
    }

    pub fn roots(&self) -> impl Iterator<Item = TreeNodeRef<'_>> + '_ {
        self.iter().filter(|n| n.data().parent.is_none())
    }

    pub fn children(&self, parent: TreeNodeId) -> impl Iterator<Item = TreeNodeRef<'_>> + '_ {
        self.iter().filter(move |n| n.data().parent == Some(parent))
    }

    /// All nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = TreeNodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| TreeNodeRef {
            tree: self,
            id: TreeNodeId(i as u32),
        })
    }

    /// Entities referenced by the tree, in node order, without duplicates
    pub fn entities(&self) -> Vec<EntityId> {
        let mut out: Vec<EntityId> = Vec::new();
        for node in &self.nodes {
            if let Some(entity) = node.entity {
                if !out.contains(&entity) {
                    out.push(entity);
                }
            }
        }
        out
    }
}

/// Handle to a node: the owning tree plus the node index.
/// Only constructed by `DocumentTree`, so the index is always valid.
#[derive(Debug, Clone, Copy)]
pub struct TreeNodeRef<'a> {
    tree: &'a DocumentTree,
    id: TreeNodeId,
}

impl<'a> TreeNodeRef<'a> {
    pub fn id(&self) -> TreeNodeId {
        self.id
    }

    pub fn tree(&self) -> &'a DocumentTree {
        self.tree
    }

    pub fn document(&self) -> DocumentId {
        self.tree.id
    }

    pub fn data(&self) -> &'a TreeNode {
        &self.tree.nodes[self.id.0 as usize]
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.data().entity
    }

    pub fn parent(&self) -> Option<TreeNodeRef<'a>> {
        self.data().parent.and_then(|p| self.tree.node(p))
    }
}

impl PartialEq for TreeNodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.tree.id == other.tree.id && self.id == other.id
    }
}

impl Eq for TreeNodeRef<'_> {}
