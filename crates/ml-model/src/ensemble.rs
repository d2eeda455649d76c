//! Regression tree ensemble.
//!
//! Trees are stored as flat node arrays with the root at index 0. Child
//! indices always point forward, which `validate` checks once at load time
//! so that evaluation cannot loop.

use serde::{Deserialize, Serialize};

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: trees already carry the learning rate
    #[default]
    Sum,
    /// Random forest: average of the trees
    Mean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Samples with `features[feature] < threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// A tree that always predicts `value`
    pub fn leaf(value: f64) -> Self {
        Self::new(vec![Node::Leaf { value }])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Walk from the root to a leaf
    ///
    /// Must only be called on a validated tree.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if value < *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(format!("leaf {idx} has non-finite value {value}"));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature} but the model has {n_features} features"
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {idx} has a NaN threshold"));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn predict(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        match self.aggregation {
            Aggregation::Sum => self.base_score + total,
            Aggregation::Mean if self.trees.is_empty() => self.base_score,
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
        }
    }

    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        if !self.base_score.is_finite() {
            return Err(format!("base score {} is not finite", self.base_score));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|reason| format!("tree {idx}: {reason}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree::new(vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: low },
            Node::Leaf { value: high },
        ])
    }

    #[test]
    fn test_tree_routes_by_threshold() {
        let tree = stump(0, 2.5, 10.0, 20.0);
        assert_eq!(tree.predict(&[1.0]), 10.0);
        assert_eq!(tree.predict(&[2.5]), 20.0);
        assert_eq!(tree.predict(&[f64::NAN]), 20.0);
    }

    #[test]
    fn test_sum_and_mean_aggregation() {
        let mut ensemble = TreeEnsemble {
            base_score: 1.0,
            aggregation: Aggregation::Sum,
            trees: vec![stump(0, 0.5, 2.0, 4.0), RegressionTree::leaf(6.0)],
        };
        assert_eq!(ensemble.predict(&[0.0]), 9.0);

        ensemble.aggregation = Aggregation::Mean;
        assert_eq!(ensemble.predict(&[1.0]), 6.0);
    }

    #[test]
    fn test_validate_rejects_backward_children() {
        let tree = RegressionTree::new(vec![
            Node::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            Node::Leaf { value: 1.0 },
        ]);
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        assert!(stump(3, 1.0, 0.0, 1.0).validate(2).is_err());
        assert!(stump(1, 1.0, 0.0, 1.0).validate(2).is_ok());
    }

    #[test]
    fn test_node_json_shape() {
        let json = r#"[{"type":"split","feature":0,"threshold":1.5,"left":1,"right":2},{"type":"leaf","value":3.0},{"type":"leaf","value":4.0}]"#;
        let tree: RegressionTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree, stump(0, 1.5, 3.0, 4.0));
    }
}
