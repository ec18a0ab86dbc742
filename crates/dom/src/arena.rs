//! Arena-based document tree storage
//!
//! The arena eliminates:
//! - Rc/Arc overhead (16 bytes per pointer)
//! - Recursive drop chains (stack overflow risk on deep documents)
//! - Cache misses (nodes stored sequentially)
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         - 4-byte index, not 8-byte pointer
//! ```
//!
//! Detachment is an unlink, not a free: a removed node loses its parent
//! link but stays in the arena, so its last-known content remains readable
//! for as long as the arena lives. Edit tracking relies on this.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Arena allocator for document nodes
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - No Rc/Arc: indices everywhere
/// - Nodes are never deallocated individually
#[derive(Debug, Default)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(1024), // Pre-allocate for typical document
            root_id: None,
        }
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Create an arena seeded with a root node of the given type and name
    pub fn with_root(node_type: NodeType, node_name: &str) -> (Self, NodeId) {
        let mut arena = Self::new();
        let root = arena.alloc(node_type, node_name);
        arena.root_id = Some(root);
        (arena, root)
    }

    /// Allocate a node of the given type and name, returns its ID
    pub fn alloc(&mut self, node_type: NodeType, node_name: impl Into<String>) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes
            .push(DomNode::new(node_id, node_type, node_name.into()));
        node_id
    }

    /// Add a pre-built node to the arena, returns its ID
    ///
    /// The node's `node_id` field is rewritten to its arena slot.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        // Verify node exists
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Result<&DomNode> {
        let root_id = self
            .root_id
            .ok_or_else(|| DomError::MalformedSnapshot("no root node set".to_string()))?;
        self.get(root_id)
    }

    /// Total number of nodes ever allocated (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    /// Iterator over all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Whether a node still chains up to the document root.
    ///
    /// False for nodes that were removed (or live under a removed subtree).
    pub fn is_attached(&self, node_id: NodeId) -> bool {
        let mut current = node_id;
        loop {
            if Some(current) == self.root_id {
                return true;
            }
            match self.get(current).ok().and_then(|n| n.parent_id) {
                Some(parent_id) => current = parent_id,
                None => return false,
            }
        }
    }

    /// Append `child` under `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        // Verify both exist up front
        self.get(parent_id)?;
        self.get(child_id)?;

        self.unlink(child_id)?;
        self.get_mut(child_id)?.parent_id = Some(parent_id);
        self.get_mut(parent_id)?.children_ids.push(child_id);
        Ok(())
    }

    /// Unlink a node from its parent. The node and its subtree stay in the
    /// arena and keep their content.
    pub fn unlink(&mut self, node_id: NodeId) -> Result<()> {
        let parent_id = match self.get(node_id)?.parent_id {
            Some(parent_id) => parent_id,
            None => return Ok(()),
        };
        let parent = self.get_mut(parent_id)?;
        parent.children_ids.retain(|&mut id| id != node_id);
        self.get_mut(node_id)?.parent_id = None;
        Ok(())
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Find nodes matching predicate
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| {
                if predicate(node) {
                    Some(idx as NodeId)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Find first node matching predicate
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes.iter().enumerate().find_map(|(idx, node)| {
            if predicate(node) {
                Some(idx as NodeId)
            } else {
                None
            }
        })
    }

    /// Find all elements by tag name
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| {
            node.node_type == NodeType::Element && node.node_name.eq_ignore_ascii_case(tag)
        })
    }

    /// Find the element carrying a given logical location identifier
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        self.find_one(|node| node.is_element() && node.path() == Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PATH_ATTRIBUTE;

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();

        let id = arena.alloc(NodeType::Element, "div");
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "div");
        assert_eq!(retrieved.node_type, NodeType::Element);
    }

    #[test]
    fn test_append_and_unlink() {
        let mut arena = DomArena::new();
        let root = arena.alloc(NodeType::Document, "#document");
        arena.set_root(root).unwrap();

        let div = arena.alloc(NodeType::Element, "div");
        arena.append_child(root, div).unwrap();
        assert!(arena.is_attached(div));

        arena.unlink(div).unwrap();
        assert!(!arena.is_attached(div));
        assert!(arena.get(root).unwrap().children_ids.is_empty());

        // Detached node keeps its content
        assert_eq!(arena.get(div).unwrap().node_name, "div");
    }

    #[test]
    fn test_detached_subtree() {
        let mut arena = DomArena::new();
        let root = arena.alloc(NodeType::Document, "#document");
        arena.set_root(root).unwrap();

        let div = arena.alloc(NodeType::Element, "div");
        let text = arena.alloc(NodeType::Text, "#text");
        arena.append_child(root, div).unwrap();
        arena.append_child(div, text).unwrap();

        arena.unlink(div).unwrap();

        // The whole subtree reads as detached, but stays intact
        assert!(!arena.is_attached(div));
        assert!(!arena.is_attached(text));
        assert_eq!(arena.get(div).unwrap().children_ids.as_slice(), &[text]);
    }

    #[test]
    fn test_traverse_df() {
        let mut arena = DomArena::new();

        let root = arena.alloc(NodeType::Element, "div");
        let child1 = arena.alloc(NodeType::Element, "span");
        let child2 = arena.alloc(NodeType::Element, "span");
        arena.set_root(root).unwrap();
        arena.append_child(root, child1).unwrap();
        arena.append_child(root, child2).unwrap();

        let mut visited = Vec::new();
        arena
            .traverse_df(root, |node| {
                visited.push(node.node_id);
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec![root, child1, child2]);
    }

    #[test]
    fn test_find_by_path() {
        let mut arena = DomArena::new();
        let span = arena.alloc(NodeType::Element, "span");
        arena
            .get_mut(span)
            .unwrap()
            .attributes
            .insert(PATH_ATTRIBUTE.to_string(), "3/0/1".to_string());

        assert_eq!(arena.find_by_path("3/0/1"), Some(span));
        assert_eq!(arena.find_by_path("missing"), None);
        assert_eq!(arena.find_by_tag("SPAN"), vec![span]);
    }
}
