use std::collections::BTreeSet;

use crate::config::CategoryWeights;

/// The four category scores that feed the overall grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScores {
    pub security: u8,
    pub performance: u8,
    pub seo: u8,
    pub accessibility: u8,
}

/// Weighted mean rounded half up, using integer arithmetic throughout.
pub fn overall_score(scores: &CategoryScores, weights: &CategoryWeights) -> u8 {
    let total = weights.total().max(1);
    let weighted = scores.security as u32 * weights.security
        + scores.performance as u32 * weights.performance
        + scores.seo as u32 * weights.seo
        + scores.accessibility as u32 * weights.accessibility;

    ((weighted * 2 + total) / (total * 2)).min(100) as u8
}

/// Union of all issue lists, deduplicated and sorted.
pub fn merge_issues<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    lists
        .into_iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
