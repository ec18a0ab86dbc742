//! Utility functions for rendered-document processing

/// Check whether a logical-identifier attribute value is usable as a
/// tracking key. Empty and whitespace-only values are not - elements
/// carrying them are skipped by the observer, the same as elements with
/// no attribute at all.
pub fn is_trackable_path(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Elements that introduce a line break in rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "dt", "dd", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Check if a tag renders as a block (its content sits on its own line)
pub fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS
        .iter()
        .any(|block| block.eq_ignore_ascii_case(tag))
}

/// Collapse raw accumulated text into its rendered form: whitespace runs
/// within a line become a single space, lines are trimmed, and empty lines
/// are dropped.
pub fn collapse_rendered_text(raw: &str) -> String {
    let lines: Vec<String> = raw
        .lines()
        .map(|line| {
            line.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}
