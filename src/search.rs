use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::node::Node;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of nodes whose title or id fuzzy-matches `query`; a blank query matches nothing.
pub fn matching_nodes(nodes: &[Node], query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            fuzzy_match_score(&matcher, &node.title, query).is_some()
                || fuzzy_match_score(&matcher, &node.id, query).is_some()
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Color32, Vec2};

    use super::*;

    fn node(id: &str, title: &str) -> Node {
        Node {
            id: id.to_owned(),
            title: title.to_owned(),
            position: Vec2::ZERO,
            radius: 10.0,
            color: Color32::GRAY,
            category: "default".to_owned(),
            year: 2020,
            importance: 0.5,
            authors: Vec::new(),
            source: None,
        }
    }

    #[test]
    fn matches_titles_and_ids_fuzzily() {
        let nodes = vec![
            node("2401.00001", "Agentic Planning with Tools"),
            node("2402.00002", "Retrieval Augmented Generation"),
        ];

        assert_eq!(matching_nodes(&nodes, "agplan"), HashSet::from([0]));
        assert_eq!(matching_nodes(&nodes, "2402"), HashSet::from([1]));
        assert!(matching_nodes(&nodes, "   ").is_empty());
        assert!(matching_nodes(&nodes, "quantum").is_empty());
    }
}
