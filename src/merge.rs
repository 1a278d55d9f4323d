//! Aggregation of rule documents for single-file tools
//!
//! Output layout is part of the on-disk contract:
//! `# <name-without-extension>\n\n<trimmed content>` per document, joined by
//! `\n\n---\n\n`, ascending by priority.

use crate::rules::RuleDocument;

/// Separator placed between merged sections
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Stable ascending sort by priority; equal priorities keep their input order.
pub fn sort_by_priority(docs: &[RuleDocument]) -> Vec<&RuleDocument> {
    let mut sorted: Vec<&RuleDocument> = docs.iter().collect();
    sorted.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    sorted
}

/// Merge documents into the single-file format.
pub fn merge(docs: &[RuleDocument]) -> String {
    sort_by_priority(docs)
        .into_iter()
        .map(|doc| format!("# {}\n\n{}", doc.stem(), doc.content.trim()))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Character count of [`merge`]'s output, checked against tool limits.
pub fn merged_size(docs: &[RuleDocument]) -> usize {
    merge(docs).chars().count()
}
