//! Rendered-text extraction - convert a subtree to its visible text
//!
//! This is what a user sees, not what the markup says:
//! - text nodes contribute their character data in document order
//! - `<br>` contributes a line break
//! - block-level elements put their content on its own line
//! - comments and processing instructions contribute nothing
//! - whitespace runs collapse, ends are trimmed

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::{NodeId, NodeType};
use crate::utils;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Collapse whitespace runs and trim line ends (what a renderer does
    /// outside of `white-space: pre` content)
    pub collapse_whitespace: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
        }
    }
}

/// Extracts the rendered text of a subtree
pub struct TextSerializer {
    config: TextConfig,
}

impl TextSerializer {
    pub fn new() -> Self {
        Self::with_config(TextConfig::default())
    }

    pub fn with_config(config: TextConfig) -> Self {
        Self { config }
    }

    /// Rendered text of the subtree rooted at `node_id`.
    ///
    /// Succeeds for detached nodes: the arena keeps their content.
    pub fn rendered_text(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut raw = String::with_capacity(256);
        self.collect(arena, node_id, &mut raw)?;

        if self.config.collapse_whitespace {
            Ok(utils::collapse_rendered_text(&raw))
        } else {
            Ok(raw)
        }
    }

    /// Accumulate visible text recursively
    fn collect(&self, arena: &DomArena, node_id: NodeId, out: &mut String) -> Result<()> {
        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Text | NodeType::CdataSection => {
                out.push_str(&node.node_value);
            }
            NodeType::Element => {
                if node.node_name.eq_ignore_ascii_case("br") {
                    out.push('\n');
                    return Ok(());
                }

                let block = utils::is_block_element(&node.node_name);
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }

                for &child_id in &node.children_ids {
                    self.collect(arena, child_id, out)?;
                }

                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            NodeType::Document | NodeType::DocumentFragment => {
                for &child_id in &node.children_ids {
                    self.collect(arena, child_id, out)?;
                }
            }
            // Comments, processing instructions and the rest are invisible
            _ => {}
        }

        Ok(())
    }
}

impl Default for TextSerializer {
    fn default() -> Self {
        Self::new()
    }
}
