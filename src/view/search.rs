use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use crate::network::{GraphSnapshot, Node};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub node_id: String,
    pub score: i64,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn best_field_score(matcher: &SkimMatcherV2, node: &Node, query: &str) -> Option<i64> {
    let fields = std::iter::once(node.label.as_str())
        .chain(node.institution.as_deref())
        .chain(node.department.as_deref())
        .chain(node.expertise.iter().map(String::as_str));

    fields
        .filter_map(|field| fuzzy_match_score(matcher, field, query))
        .max()
}

/// Nodes whose label, affiliation or expertise fuzzily match `query`,
/// best first.
pub fn search_nodes(snapshot: &GraphSnapshot, query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits = snapshot
        .nodes
        .iter()
        .filter_map(|node| {
            best_field_score(&matcher, node, query).map(|score| SearchHit {
                node_id: node.id.clone(),
                score,
            })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::node;

    fn snapshot() -> GraphSnapshot {
        let mut ada = node("1", 0, 1);
        ada.label = "Ada Lovelace".into();
        ada.expertise = vec!["Analytical Engines".into()];

        let mut grace = node("2", 0, 1);
        grace.label = "Grace Hopper".into();
        grace.institution = Some("Navy Research".into());

        GraphSnapshot::new(vec![ada, grace], Vec::new())
    }

    #[test]
    fn test_search_by_label() {
        let hits = search_nodes(&snapshot(), "lovelace", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node_id, "1");
    }

    #[test]
    fn test_search_other_fields() {
        let snapshot = snapshot();
        assert_eq!(search_nodes(&snapshot, "engines", 10)[0].node_id, "1");
        assert_eq!(search_nodes(&snapshot, "navy", 10)[0].node_id, "2");
    }

    #[test]
    fn test_blank_query_and_limit() {
        let snapshot = snapshot();
        assert!(search_nodes(&snapshot, "   ", 10).is_empty());
        assert_eq!(search_nodes(&snapshot, "a", 10).len(), 2);
        assert_eq!(search_nodes(&snapshot, "a", 1).len(), 1);
        assert!(search_nodes(&snapshot, "zzzzqqq", 10).is_empty());
    }
}
