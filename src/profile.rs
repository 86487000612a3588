use serde::{Deserialize, Serialize};

use crate::edges::{Dimension, EdgePolicy};
use crate::engine::EngineConfig;
use crate::layout::{CenterTarget, LayoutConfig, SeedLayout};

/// Preset engine configurations, one per paper view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Topic clusters on a circle.
    #[default]
    PaperGraph,
    /// Category clusters tied together by year/relevance similarity.
    Similarity,
    /// One lane per publication year.
    Timeline,
    /// Co-authorship network.
    Relationship,
}

impl Profile {
    pub fn label(self) -> &'static str {
        match self {
            Self::PaperGraph => "Paper graph",
            Self::Similarity => "Similarity",
            Self::Timeline => "Timeline",
            Self::Relationship => "Relationships",
        }
    }

    pub fn config(self) -> EngineConfig {
        let (layout, edges) = match self {
            Self::PaperGraph => (
                LayoutConfig {
                    jitter: 12.0,
                    ..LayoutConfig::default()
                },
                EdgePolicy::default(),
            ),
            Self::Similarity => (
                LayoutConfig {
                    seed: SeedLayout::CategoryClusters,
                    center_target: CenterTarget::Anchor,
                    iterations: 150,
                    repulsion: 3500.0,
                    centering: 0.01,
                    edge_attraction: 0.004,
                    ..LayoutConfig::default()
                },
                EdgePolicy {
                    dimension: Dimension::Similarity,
                    threshold: 0.7,
                    cap_factor: 2.0,
                    ..EdgePolicy::default()
                },
            ),
            Self::Timeline => (
                LayoutConfig {
                    seed: SeedLayout::YearLanes,
                    center_target: CenterTarget::Anchor,
                    iterations: 100,
                    repulsion: 1500.0,
                    centering: 0.01,
                    ..LayoutConfig::default()
                },
                EdgePolicy {
                    dimension: Dimension::Year,
                    threshold: 0.7,
                    ..EdgePolicy::default()
                },
            ),
            Self::Relationship => (
                LayoutConfig {
                    repulsion: 2500.0,
                    centering: 0.003,
                    edge_attraction: 0.01,
                    ..LayoutConfig::default()
                },
                EdgePolicy {
                    dimension: Dimension::Author,
                    threshold: 0.3,
                    cap_factor: 2.0,
                    ..EdgePolicy::default()
                },
            ),
        };

        EngineConfig {
            layout,
            edges,
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_select_distinct_strategies() {
        let timeline = Profile::Timeline.config();
        assert_eq!(timeline.layout.seed, SeedLayout::YearLanes);
        assert_eq!(timeline.edges.dimension, Dimension::Year);

        let similarity = Profile::Similarity.config();
        assert_eq!(similarity.layout.center_target, CenterTarget::Anchor);
        assert!(similarity.layout.edge_attraction > 0.0);

        assert_eq!(Profile::default().config().edges.dimension, Dimension::Topic);
    }

    #[test]
    fn profile_configs_round_trip_through_json() {
        let config = Profile::Relationship.config();
        let encoded = serde_json::to_string(&config).expect("config serializes");
        let decoded: EngineConfig = serde_json::from_str(&encoded).expect("config parses");
        assert_eq!(decoded, config);
    }
}
