//! Integration tests for the markdown -> structured data -> tree path.

use paperlode::{
    extract_structured_data, render, tree, LastSeenByLevel, SectionForest, StackBased,
};

const PAPER: &str = "\
# Attention Is All You Need

**Authors**: Ada Lovelace, Alan Turing

**Keywords**: attention, transformers

## Abstract

We propose a network architecture based entirely on attention.

## Introduction

Sequence transduction models are built on recurrent networks.

### Background

Earlier approaches used convolution to relate signals.

## Results

The model reaches a new state of the art.

## References

[1] Bahdanau, D. (2015). Neural machine translation by jointly learning to align.
[2] Sutskever, I. (2014). Sequence to sequence learning with neural networks.
";

#[test]
fn test_full_extraction() {
    let doc = extract_structured_data(PAPER).into_document();

    assert_eq!(doc.title.as_deref(), Some("Attention Is All You Need"));
    assert_eq!(doc.authors, vec!["Ada Lovelace", "Alan Turing"]);
    assert_eq!(doc.keywords, vec!["attention", "transformers"]);
    assert_eq!(
        doc.abstract_text.as_deref(),
        Some("We propose a network architecture based entirely on attention.")
    );

    let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Attention Is All You Need",
            "Abstract",
            "Introduction",
            "Background",
            "Results",
            "References"
        ]
    );

    assert_eq!(doc.references.len(), 2);
    assert_eq!(doc.references[0].year, Some(2015));
    assert_eq!(doc.references[1].year, Some(2014));
}

// Re-extracting from rendered markdown must reproduce the same section
// structure: headings survive the round trip.
#[test]
fn test_render_roundtrip_preserves_sections() {
    let doc = extract_structured_data(PAPER).into_document();
    let rendered = render::to_markdown(&doc);
    let again = extract_structured_data(&rendered).into_document();

    let before: Vec<(&str, u32)> = doc
        .sections
        .iter()
        .map(|s| (s.title.as_str(), s.level))
        .collect();
    let after: Vec<(&str, u32)> = again
        .sections
        .iter()
        .map(|s| (s.title.as_str(), s.level))
        .collect();
    assert_eq!(before, after);

    assert_eq!(again.title, doc.title);
    assert_eq!(again.authors, doc.authors);
    assert_eq!(again.references.len(), doc.references.len());
}

#[test]
fn test_tree_assembly_from_extraction() {
    let doc = extract_structured_data(PAPER).into_document();
    let roots = tree::assemble(&doc.sections, &LastSeenByLevel);

    // One level-1 root (the title section) holding everything else.
    assert_eq!(roots.len(), 1);
    let root = &roots[0];
    assert_eq!(root.title, "Attention Is All You Need");

    let child_titles: Vec<&str> = root.children.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        child_titles,
        vec!["Abstract", "Introduction", "Results", "References"]
    );

    let intro = root.find(&doc.sections[2].key()).unwrap();
    assert_eq!(intro.children.len(), 1);
    assert_eq!(intro.children[0].title, "Background");
}

#[test]
fn test_strategies_agree_on_well_nested_input() {
    let doc = extract_structured_data(PAPER).into_document();
    let last_seen = tree::assemble(&doc.sections, &LastSeenByLevel);
    let stacked = tree::assemble(&doc.sections, &StackBased);

    fn shape(nodes: &[paperlode::SectionNode]) -> Vec<(String, Vec<String>)> {
        nodes
            .iter()
            .flat_map(|n| {
                let mut out = vec![(
                    n.title.clone(),
                    n.children.iter().map(|c| c.title.clone()).collect(),
                )];
                out.extend(shape(&n.children));
                out
            })
            .collect()
    }

    assert_eq!(shape(&last_seen), shape(&stacked));
}

#[test]
fn test_move_section_after_assembly() {
    let doc = extract_structured_data(PAPER).into_document();
    let mut forest = SectionForest::new(tree::assemble(&doc.sections, &LastSeenByLevel));

    let background = doc.sections[3].key();
    let results = doc.sections[4].key();

    // Move Background under Results.
    forest.move_section(&background, Some(&results), 0).unwrap();

    let results_node = forest.find(&results).unwrap();
    assert_eq!(results_node.children.len(), 1);
    assert_eq!(results_node.children[0].title, "Background");
    assert_eq!(results_node.children[0].order, 0);
    assert_eq!(results_node.children[0].level, results_node.level + 1);

    let intro = forest.find(&doc.sections[2].key()).unwrap();
    assert!(intro.children.is_empty());
}
