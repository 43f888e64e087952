// SPDX-License-Identifier: MIT OR Apache-2.0
//! Translation between graph identities and dense stream ids.

use indexmap::IndexMap;
use trellis_graph::{EdgeId, Graph, GroupId, NodeId};

/// A graph primitive, whatever its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    /// A node
    Node(NodeId),
    /// An edge
    Edge(EdgeId),
    /// A group
    Group(GroupId),
}

/// Stream id of every primitive of a graph, used while encoding.
///
/// Ids are dense and start at 1: nodes first, then edges, then groups, in
/// graph order.
#[derive(Debug, Clone, Default)]
pub struct ObjectIdMap {
    ids: IndexMap<ObjectKey, i32>,
}

impl ObjectIdMap {
    /// Assign an id to every primitive of `graph`
    pub fn generate(graph: &Graph) -> Self {
        let keys = graph
            .nodes()
            .map(|n| ObjectKey::Node(n.id()))
            .chain(graph.edges().map(|e| ObjectKey::Edge(e.id())))
            .chain(graph.groups().map(|g| ObjectKey::Group(g.id())));
        let ids = keys.zip(1..).collect();
        Self { ids }
    }

    /// Stream id of a primitive
    pub fn get(&self, key: ObjectKey) -> Option<i32> {
        self.ids.get(&key).copied()
    }

    /// Stream id of a node
    pub fn node(&self, node: NodeId) -> Option<i32> {
        self.get(ObjectKey::Node(node))
    }

    /// Stream id of an edge
    pub fn edge(&self, edge: EdgeId) -> Option<i32> {
        self.get(ObjectKey::Edge(edge))
    }

    /// Stream id of a group
    pub fn group(&self, group: GroupId) -> Option<i32> {
        self.get(ObjectKey::Group(group))
    }

    /// Number of mapped primitives
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no primitive is mapped
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Primitive rebuilt for every stream id, filled while decoding
#[derive(Debug, Clone, Default)]
pub struct IdObjectMap {
    objects: IndexMap<i32, ObjectKey>,
}

impl IdObjectMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the primitive rebuilt for stream id `id`.
    ///
    /// Negative ids mean "unmapped" and are ignored.
    pub fn insert(&mut self, id: i32, key: ObjectKey) {
        if id < 0 {
            return;
        }
        if let Some(previous) = self.objects.insert(id, key) {
            tracing::warn!("Stream id {id} is used twice, {previous:?} replaced by {key:?}");
        }
    }

    /// Primitive rebuilt for `id`
    pub fn get(&self, id: i32) -> Option<ObjectKey> {
        self.objects.get(&id).copied()
    }

    /// Node rebuilt for `id`
    pub fn node(&self, id: i32) -> Option<NodeId> {
        match self.get(id)? {
            ObjectKey::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Edge rebuilt for `id`
    pub fn edge(&self, id: i32) -> Option<EdgeId> {
        match self.get(id)? {
            ObjectKey::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    /// Group rebuilt for `id`
    pub fn group(&self, id: i32) -> Option<GroupId> {
        match self.get(id)? {
            ObjectKey::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Number of nodes in the map
    pub fn node_count(&self) -> usize {
        self.objects
            .values()
            .filter(|k| matches!(k, ObjectKey::Node(_)))
            .count()
    }

    /// Number of mapped ids
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no id is mapped
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Forget every id
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_ordered() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let e = graph.create_edge(a, b).unwrap();
        let g = graph.create_group();

        let ids = ObjectIdMap::generate(&graph);
        assert_eq!(ids.len(), 4);
        assert_eq!(ids.node(a), Some(1));
        assert_eq!(ids.node(b), Some(2));
        assert_eq!(ids.edge(e), Some(3));
        assert_eq!(ids.group(g), Some(4));
        assert_eq!(ids.node(NodeId::new()), None);
    }

    #[test]
    fn test_empty_graph_map() {
        let graph = Graph::new();
        assert!(ObjectIdMap::generate(&graph).is_empty());
    }

    #[test]
    fn test_id_object_map_kinds() {
        let mut map = IdObjectMap::new();
        let node = NodeId::new();
        let edge = EdgeId::new();
        map.insert(1, ObjectKey::Node(node));
        map.insert(2, ObjectKey::Edge(edge));
        map.insert(-1, ObjectKey::Node(NodeId::new()));

        assert_eq!(map.len(), 2);
        assert_eq!(map.node(1), Some(node));
        assert_eq!(map.node(2), None);
        assert_eq!(map.edge(2), Some(edge));
        assert_eq!(map.node_count(), 1);
        map.clear();
        assert!(map.is_empty());
    }
}
