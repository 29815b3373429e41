// Properties shown for a selected document tree node

use partview_config::{PropertyExt, PropertyGroup, PropertyInt, PropertyString};
use partview_core::TreeNodeRef;

/// Describes tree nodes of the kinds it understands
pub trait DocumentTreeNodePropertiesProvider: Send + Sync {
    /// Properties of `node`, None if this provider does not handle it
    fn properties(&self, node: TreeNodeRef<'_>) -> Option<PropertyGroup>;
}

/// Providers queried in registration order, first match wins
#[derive(Default)]
pub struct PropertiesProviders {
    providers: Vec<Box<dyn DocumentTreeNodePropertiesProvider>>,
}

impl PropertiesProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_provider(&mut self, provider: Box<dyn DocumentTreeNodePropertiesProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn properties_for(&self, node: TreeNodeRef<'_>) -> Option<PropertyGroup> {
        self.providers.iter().find_map(|p| p.properties(node))
    }
}

/// Handles any node: name, kind and entity, none of them persisted.
/// Register last so specialized providers take precedence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeInfoProvider;

impl DocumentTreeNodePropertiesProvider for NodeInfoProvider {
    fn properties(&self, node: TreeNodeRef<'_>) -> Option<PropertyGroup> {
        let mut group = PropertyGroup::new("node").with_label(node.name());
        group.add_property(PropertyString::new("name", node.name().to_string()).with_label("Name").transient());
        group.add_property(
            PropertyString::new("kind", node.kind().as_str().to_string())
                .with_label("Kind")
                .transient(),
        );
        if let Some(entity) = node.entity() {
            match i64::try_from(entity.0) {
                Ok(id) => group.add_property(PropertyInt::new("entity", id).with_label("Entity").transient()),
                Err(_) => group.add_property(
                    PropertyString::new("entity", entity.to_string())
                        .with_label("Entity")
                        .transient(),
                ),
            }
        }
        Some(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partview_core::{DocumentId, DocumentTree, EntityId, NodeKind};

    /// Only answers for mesh nodes
    struct MeshProvider;

    impl DocumentTreeNodePropertiesProvider for MeshProvider {
        fn properties(&self, node: TreeNodeRef<'_>) -> Option<PropertyGroup> {
            (node.kind() == NodeKind::Mesh).then(|| PropertyGroup::new("mesh"))
        }
    }

    fn tree() -> DocumentTree {
        let mut tree = DocumentTree::new(DocumentId(1), "doc");
        let root = tree.add_root("asm", NodeKind::Assembly, None);
        tree.add_child(root, "bunny", NodeKind::Mesh, Some(EntityId(9)));
        tree
    }

    #[test]
    fn test_first_match_wins() {
        let tree = tree();
        let mut providers = PropertiesProviders::new();
        providers.add_provider(Box::new(MeshProvider));
        providers.add_provider(Box::new(NodeInfoProvider));

        let nodes: Vec<_> = tree.iter().collect();
        assert_eq!(providers.properties_for(nodes[1]).unwrap().name(), "mesh");
        assert_eq!(providers.properties_for(nodes[0]).unwrap().name(), "node");
    }

    #[test]
    fn test_no_provider_matches() {
        let tree = tree();
        let mut providers = PropertiesProviders::new();
        providers.add_provider(Box::new(MeshProvider));
        let root = tree.roots().next().unwrap();
        assert!(providers.properties_for(root).is_none());
    }

    #[test]
    fn test_node_info() {
        let tree = tree();
        let bunny = tree.iter().nth(1).unwrap();
        let group = NodeInfoProvider.properties(bunny).unwrap();
        assert_eq!(group.get::<PropertyString>("kind").unwrap().value(), "mesh");
        assert_eq!(*group.get::<PropertyInt>("entity").unwrap().value(), 9);
        assert!(!group.property("name").unwrap().meta().persistent);
    }

    #[test]
    fn test_node_info_large_entity_id() {
        let mut tree = DocumentTree::new(DocumentId(1), "doc");
        tree.add_root("huge", NodeKind::Part, Some(EntityId(u64::MAX)));
        let node = tree.roots().next().unwrap();
        let group = NodeInfoProvider.properties(node).unwrap();
        assert!(group.get::<PropertyInt>("entity").is_none());
        assert_eq!(group.get::<PropertyString>("entity").unwrap().value(), &format!("#{}", u64::MAX));
    }
}
