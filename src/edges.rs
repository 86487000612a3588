use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Node;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    #[default]
    Topic,
    Year,
    Author,
    Source,
    Similarity,
}

impl Dimension {
    pub const ALL: [Self; 5] = [
        Self::Topic,
        Self::Year,
        Self::Author,
        Self::Source,
        Self::Similarity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Topic => "Topic",
            Self::Year => "Year",
            Self::Author => "Author",
            Self::Source => "Source",
            Self::Similarity => "Similarity",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgePolicy {
    pub dimension: Dimension,
    /// Edges are kept only when their weight is strictly above this.
    pub threshold: f32,
    /// Maximum edge count as a multiple of the node count.
    pub cap_factor: f32,
    /// Year distance at which year similarity reaches zero.
    pub year_window: f32,
}

impl EdgePolicy {
    pub fn cap(&self, node_count: usize) -> usize {
        (node_count as f32 * self.cap_factor.max(0.0)).floor() as usize
    }
}

impl Default for EdgePolicy {
    fn default() -> Self {
        Self {
            dimension: Dimension::Topic,
            threshold: 0.5,
            cap_factor: 1.5,
            year_window: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f32,
    pub reason: String,
    pub group: String,
}

struct Relation {
    weight: f32,
    reason: String,
    group: String,
}

pub fn derive_edges(nodes: &[Node], policy: &EdgePolicy) -> Vec<Edge> {
    let cap = policy.cap(nodes.len());
    if cap == 0 || nodes.len() < 2 {
        return Vec::new();
    }

    let threshold = policy.threshold.max(0.0);
    let author_sets = if policy.dimension == Dimension::Author {
        nodes.iter().map(|node| author_set(&node.authors)).collect()
    } else {
        Vec::new()
    };

    let mut edges = Vec::new();
    for source in 0..nodes.len() {
        for target in (source + 1)..nodes.len() {
            let relation = match policy.dimension {
                Dimension::Topic => topic_relation(&nodes[source], &nodes[target]),
                Dimension::Year => {
                    year_relation(&nodes[source], &nodes[target], policy.year_window)
                }
                Dimension::Author => author_relation(&author_sets[source], &author_sets[target]),
                Dimension::Source => source_relation(&nodes[source], &nodes[target]),
                Dimension::Similarity => {
                    similarity_relation(&nodes[source], &nodes[target], policy.year_window)
                }
            };

            let Some(relation) = relation else {
                continue;
            };
            let weight = relation.weight.clamp(0.0, 1.0);
            if weight > threshold {
                edges.push(Edge {
                    source,
                    target,
                    weight,
                    reason: relation.reason,
                    group: relation.group,
                });
            }
        }
    }

    if edges.len() > cap {
        edges.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| (a.source, a.target).cmp(&(b.source, b.target)))
        });
        edges.truncate(cap);
        edges.sort_by_key(|edge| (edge.source, edge.target));
    }

    edges
}

/// Edge counts per legend group, largest first.
pub fn legend_groups(edges: &[Edge]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for edge in edges {
        *counts.entry(edge.group.as_str()).or_default() += 1;
    }

    let mut groups = counts
        .into_iter()
        .map(|(group, count)| (group.to_owned(), count))
        .collect::<Vec<_>>();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    groups
}

fn year_similarity(a: &Node, b: &Node, window: f32) -> f32 {
    let distance = a.year.abs_diff(b.year) as f32;
    (1.0 - distance / window.max(1.0)).max(0.0)
}

fn topic_relation(a: &Node, b: &Node) -> Option<Relation> {
    (a.category == b.category).then(|| Relation {
        weight: 1.0,
        reason: format!("Same topic: {}", a.category),
        group: a.category.clone(),
    })
}

fn year_relation(a: &Node, b: &Node, window: f32) -> Option<Relation> {
    let gap = a.year.abs_diff(b.year);
    let (reason, group) = match gap {
        0 => (format!("Both from {}", a.year), "same year".to_owned()),
        1 => ("One year apart".to_owned(), "adjacent years".to_owned()),
        _ => (format!("{gap} years apart"), "nearby years".to_owned()),
    };

    Some(Relation {
        weight: year_similarity(a, b, window),
        reason,
        group,
    })
}

fn author_set(authors: &[String]) -> BTreeSet<String> {
    authors
        .iter()
        .map(|author| author.trim().to_lowercase())
        .filter(|author| !author.is_empty())
        .collect()
}

fn author_relation(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Option<Relation> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let shared = a.intersection(b).cloned().collect::<Vec<_>>();
    if shared.is_empty() {
        return None;
    }

    let union = a.union(b).count();
    Some(Relation {
        weight: shared.len() as f32 / union as f32,
        reason: format!("Shared authors: {}", shared.join(", ")),
        group: "shared authors".to_owned(),
    })
}

fn source_relation(a: &Node, b: &Node) -> Option<Relation> {
    let left = a.source.as_deref().map(str::trim).filter(|value| !value.is_empty())?;
    let right = b.source.as_deref().map(str::trim).filter(|value| !value.is_empty())?;

    left.eq_ignore_ascii_case(right).then(|| Relation {
        weight: 1.0,
        reason: format!("Same source: {left}"),
        group: left.to_owned(),
    })
}

fn similarity_relation(a: &Node, b: &Node, window: f32) -> Option<Relation> {
    let importance_similarity = 1.0 - (a.importance - b.importance).abs();
    let weight = 0.5 * year_similarity(a, b, window) + 0.5 * importance_similarity;
    let group = if weight >= 0.8 {
        "strong similarity"
    } else {
        "moderate similarity"
    };

    Some(Relation {
        weight,
        reason: format!("Similar year and relevance ({:.0}%)", weight * 100.0),
        group: group.to_owned(),
    })
}
