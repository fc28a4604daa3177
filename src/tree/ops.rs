//! Mutating operations on an assembled section forest.

use crate::error::{Error, Result};
use crate::model::{SectionKey, SectionNode};

/// A forest of section trees supporting structural edits.
///
/// Every mutation either succeeds completely or leaves the forest
/// unchanged; validation happens before any node is detached.
#[derive(Debug, Clone, Default)]
pub struct SectionForest {
    pub roots: Vec<SectionNode>,
}

impl SectionForest {
    pub fn new(roots: Vec<SectionNode>) -> Self {
        Self { roots }
    }

    pub fn find(&self, key: &SectionKey) -> Option<&SectionNode> {
        self.roots.iter().find_map(|r| r.find(key))
    }

    pub fn contains(&self, key: &SectionKey) -> bool {
        self.find(key).is_some()
    }

    /// Total number of sections in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(SectionNode::total_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Move a section under a new parent (`None` = make it a root) at the
    /// given sibling position. Sibling orders are renumbered contiguously
    /// at both the old and the new location.
    ///
    /// Moving a section under itself or under one of its own descendants
    /// is rejected with [`Error::CycleDetected`] and the forest is left
    /// unchanged.
    pub fn move_section(
        &mut self,
        key: &SectionKey,
        new_parent: Option<&SectionKey>,
        new_order: usize,
    ) -> Result<()> {
        let moved = self
            .find(key)
            .ok_or_else(|| Error::SectionNotFound(key.to_string()))?;

        if let Some(parent_key) = new_parent {
            if parent_key == key || moved.find(parent_key).is_some() {
                return Err(Error::CycleDetected(format!(
                    "cannot move {} under its own subtree ({})",
                    key, parent_key
                )));
            }
            if !self.contains(parent_key) {
                return Err(Error::SectionNotFound(parent_key.to_string()));
            }
        }

        let mut node = detach(&mut self.roots, key)
            .ok_or_else(|| Error::SectionNotFound(key.to_string()))?;

        match new_parent {
            Some(parent_key) => {
                let parent = find_mut(&mut self.roots, parent_key)
                    .ok_or_else(|| Error::SectionNotFound(parent_key.to_string()))?;
                let position = new_order.min(parent.children.len());
                set_level(&mut node, parent.level + 1);
                parent.children.insert(position, node);
                renumber(&mut parent.children);
            }
            None => {
                let position = new_order.min(self.roots.len());
                set_level(&mut node, 1);
                self.roots.insert(position, node);
                renumber(&mut self.roots);
            }
        }

        Ok(())
    }

    /// Reorder the children of `parent` (`None` = the roots) so the listed
    /// keys appear first, in the given sequence; unlisted siblings keep
    /// their relative order after them. Fails if any listed key is not a
    /// child of `parent`.
    pub fn reorder_children(
        &mut self,
        parent: Option<&SectionKey>,
        ordering: &[SectionKey],
    ) -> Result<()> {
        let siblings = match parent {
            Some(parent_key) => {
                let node = find_mut(&mut self.roots, parent_key)
                    .ok_or_else(|| Error::SectionNotFound(parent_key.to_string()))?;
                &mut node.children
            }
            None => &mut self.roots,
        };

        for key in ordering {
            if !siblings.iter().any(|c| &c.key == key) {
                return Err(Error::SectionNotFound(key.to_string()));
            }
        }

        let mut reordered = Vec::with_capacity(siblings.len());
        for key in ordering {
            if let Some(pos) = siblings.iter().position(|c| &c.key == key) {
                reordered.push(siblings.remove(pos));
            }
        }
        reordered.append(siblings);
        *siblings = reordered;
        renumber(siblings);

        Ok(())
    }
}

/// Set a node's level and shift its whole subtree accordingly.
fn set_level(node: &mut SectionNode, level: u32) {
    node.level = level;
    for child in &mut node.children {
        set_level(child, level + 1);
    }
}

fn renumber(siblings: &mut [SectionNode]) {
    for (i, node) in siblings.iter_mut().enumerate() {
        node.order = i;
    }
}

fn find_mut<'a>(nodes: &'a mut [SectionNode], key: &SectionKey) -> Option<&'a mut SectionNode> {
    for node in nodes {
        if &node.key == key {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, key) {
            return Some(found);
        }
    }
    None
}

/// Remove the node with `key` from the forest, renumbering the siblings it
/// leaves behind.
fn detach(nodes: &mut Vec<SectionNode>, key: &SectionKey) -> Option<SectionNode> {
    if let Some(pos) = nodes.iter().position(|n| &n.key == key) {
        let node = nodes.remove(pos);
        renumber(nodes);
        return Some(node);
    }
    for node in nodes {
        if let Some(found) = detach(&mut node.children, key) {
            return Some(found);
        }
    }
    None
}
