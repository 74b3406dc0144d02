//! Value-flow graph over literal and return vertices.
//!
//! An edge `src -> dst` means the value at `src` is an input of the command
//! that produces `dst`. Adjacency sets keep insertion order, so every walk
//! over neighbours is deterministic.

use std::fmt;

use indexmap::IndexSet;

/// Index of a vertex in a [`Dag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(u32);

impl VertexId {
    /// Position of the vertex in insertion order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Directed graph with in/out adjacency, vertices identified by insertion.
#[derive(Debug, Clone)]
pub struct Dag<V> {
    vertices: Vec<V>,
    inbound: Vec<IndexSet<VertexId>>,
    outbound: Vec<IndexSet<VertexId>>,
}

impl<V> Default for Dag<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            inbound: Vec::new(),
            outbound: Vec::new(),
        }
    }
}

impl<V> Dag<V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, vertex: V) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(vertex);
        self.inbound.push(IndexSet::new());
        self.outbound.push(IndexSet::new());
        id
    }

    /// Add an edge `src -> dst`. Returns false if the edge already existed.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId) -> bool {
        if !self.inbound[dst.index()].insert(src) {
            return false;
        }
        self.outbound[src.index()].insert(dst);
        true
    }

    /// Vertices with an edge into `id`, in insertion order.
    pub fn inbound(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.inbound[id.index()].iter().copied()
    }

    /// Vertices `id` has an edge into, in insertion order.
    pub fn outbound(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.outbound[id.index()].iter().copied()
    }

    /// Payload of vertex `id`.
    pub fn vertex(&self, id: VertexId) -> &V {
        &self.vertices[id.index()]
    }

    /// Mutable payload of vertex `id`.
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut V {
        &mut self.vertices[id.index()]
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.inbound.iter().map(IndexSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut dag = Dag::new();
        let a = dag.add_vertex("a");
        let b = dag.add_vertex("b");

        assert!(dag.add_edge(a, b));
        assert!(!dag.add_edge(a, b));
        assert_eq!(dag.edge_count(), 1);
        assert_eq!(dag.inbound(b).collect::<Vec<_>>(), vec![a]);
        assert_eq!(dag.outbound(a).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_neighbours_keep_insertion_order() {
        let mut dag = Dag::new();
        let x = dag.add_vertex(0);
        let y = dag.add_vertex(1);
        let z = dag.add_vertex(2);
        let out = dag.add_vertex(3);

        dag.add_edge(z, out);
        dag.add_edge(x, out);
        dag.add_edge(y, out);
        dag.add_edge(x, out);

        assert_eq!(dag.inbound(out).collect::<Vec<_>>(), vec![z, x, y]);
        assert!(dag.inbound(x).next().is_none());
        assert!(dag.outbound(out).next().is_none());
    }

    #[test]
    fn test_vertex_access() {
        let mut dag = Dag::new();
        let id = dag.add_vertex(1u8);
        *dag.vertex_mut(id) += 1;

        assert_eq!(*dag.vertex(id), 2);
        assert_eq!(dag.len(), 1);
        assert!(!dag.is_empty());
        assert_eq!(id.to_string(), "v0");
    }
}
