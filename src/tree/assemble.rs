//! Forest assembly from a flat, leveled section list.
//!
//! Parent assignment is a pluggable strategy. The default streams over the
//! list and attaches each section to the most recently seen section one
//! level up; the stricter stack-based alternative attaches to the deepest
//! open ancestor with a smaller level, which handles skipped and
//! non-monotonic levels more predictably.

use std::collections::HashMap;

use crate::model::{FlatSection, SectionKey, SectionNode};

/// Parent assignment over a flat section list in document order.
///
/// Returns one entry per input section: the key of its parent, or `None`
/// for a root. A parent key always refers to an earlier section, so the
/// result can never form a cycle. A section whose natural parent is missing
/// (e.g. level 3 with no preceding level 2) becomes a root.
pub trait AssemblyStrategy {
    fn assign_parents(&self, sections: &[FlatSection]) -> Vec<Option<SectionKey>>;

    fn name(&self) -> &'static str;
}

/// One-pass heuristic: the parent of a level-L section is the last section
/// seen at level L-1. Can mis-nest on deeper-then-shallower-then-deeper
/// sequences, which is accepted for typical academic outlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastSeenByLevel;

impl AssemblyStrategy for LastSeenByLevel {
    fn assign_parents(&self, sections: &[FlatSection]) -> Vec<Option<SectionKey>> {
        let mut last_seen: HashMap<u32, SectionKey> = HashMap::new();
        let mut parents = Vec::with_capacity(sections.len());

        for section in sections {
            let parent = if section.level > 1 {
                last_seen.get(&(section.level - 1)).cloned()
            } else {
                None
            };
            parents.push(parent);
            last_seen.insert(section.level, section.key());
        }

        parents
    }

    fn name(&self) -> &'static str {
        "last-seen-by-level"
    }
}

/// Stack-based assignment: maintain the chain of open ancestors; each
/// section attaches to the deepest open section with a strictly smaller
/// level.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackBased;

impl AssemblyStrategy for StackBased {
    fn assign_parents(&self, sections: &[FlatSection]) -> Vec<Option<SectionKey>> {
        let mut stack: Vec<(u32, SectionKey)> = Vec::new();
        let mut parents = Vec::with_capacity(sections.len());

        for section in sections {
            while stack
                .last()
                .is_some_and(|(level, _)| *level >= section.level)
            {
                stack.pop();
            }
            parents.push(stack.last().map(|(_, key)| key.clone()));
            stack.push((section.level, section.key()));
        }

        parents
    }

    fn name(&self) -> &'static str {
        "stack-based"
    }
}

/// Assemble a forest from flat sections using the given strategy. Roots
/// keep encounter order; children are renumbered zero-based within their
/// parent.
pub fn assemble<S: AssemblyStrategy + ?Sized>(
    sections: &[FlatSection],
    strategy: &S,
) -> Vec<SectionNode> {
    let parents = strategy.assign_parents(sections);
    log::debug!(
        "assembling {} sections with {} strategy",
        sections.len(),
        strategy.name()
    );

    let key_index: HashMap<SectionKey, usize> = sections
        .iter()
        .enumerate()
        .map(|(i, s)| (s.key(), i))
        .collect();

    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for (i, parent) in parents.iter().enumerate() {
        match parent.as_ref().and_then(|k| key_index.get(k)) {
            Some(&p) if p != i => children_of.entry(p).or_default().push(i),
            _ => roots.push(i),
        }
    }

    let mut nodes: Vec<Option<SectionNode>> = sections
        .iter()
        .map(|s| Some(SectionNode::from_flat(s)))
        .collect();

    roots
        .iter()
        .enumerate()
        .map(|(order, &i)| {
            let mut node = take_subtree(i, &mut nodes, &children_of);
            node.order = order;
            node
        })
        .collect()
}

fn take_subtree(
    index: usize,
    nodes: &mut Vec<Option<SectionNode>>,
    children_of: &HashMap<usize, Vec<usize>>,
) -> SectionNode {
    let mut node = nodes[index]
        .take()
        .expect("each section is taken exactly once");
    if let Some(child_indices) = children_of.get(&index) {
        for (order, &child_index) in child_indices.iter().enumerate() {
            let mut child = take_subtree(child_index, nodes, children_of);
            child.order = order;
            node.children.push(child);
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(title: &str, level: u32, order: usize) -> FlatSection {
        FlatSection::new(title, level, order, String::new())
    }

    #[test]
    fn test_two_roots_with_nested_children() {
        let sections = vec![
            flat("T1", 1, 0),
            flat("T2", 2, 1),
            flat("T3", 2, 2),
            flat("T4", 1, 3),
        ];
        let forest = assemble(&sections, &LastSeenByLevel);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].title, "T1");
        assert_eq!(forest[1].title, "T4");

        let children: Vec<&str> = forest[0].children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(children, vec!["T2", "T3"]);
        assert_eq!(forest[0].children[0].order, 0);
        assert_eq!(forest[0].children[1].order, 1);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_orphan_level_becomes_root() {
        // Level 3 with no preceding level 2.
        let sections = vec![flat("A", 1, 0), flat("B", 3, 1)];
        let forest = assemble(&sections, &LastSeenByLevel);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[1].title, "B");
    }

    #[test]
    fn test_stack_strategy_attaches_skipped_level() {
        let sections = vec![flat("A", 1, 0), flat("B", 3, 1), flat("C", 2, 2)];

        let last_seen = assemble(&sections, &LastSeenByLevel);
        // B has no level-2 ancestor yet, so the streaming heuristic roots it.
        assert_eq!(last_seen.len(), 2);

        let stacked = assemble(&sections, &StackBased);
        // The stack strategy attaches B to the deepest shallower ancestor.
        assert_eq!(stacked.len(), 1);
        assert_eq!(stacked[0].children.len(), 2);
        assert_eq!(stacked[0].children[0].title, "B");
        assert_eq!(stacked[0].children[1].title, "C");
    }

    #[test]
    fn test_duplicate_titles_key_by_order() {
        // Two sections with the same title at different positions must not
        // collapse into one tree position.
        let sections = vec![
            flat("Methods", 1, 0),
            flat("Details", 2, 1),
            flat("Methods", 1, 2),
            flat("Details", 2, 3),
        ];
        let forest = assemble(&sections, &LastSeenByLevel);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[1].children.len(), 1);
        assert_eq!(forest[1].children[0].key.order, 3);
    }

    #[test]
    fn test_total_count() {
        let sections = vec![flat("A", 1, 0), flat("B", 2, 1), flat("C", 3, 2)];
        let forest = assemble(&sections, &StackBased);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].total_count(), 3);
    }
}
