//! Shallow Decision Tree

use crate::model::{Architecture, Classifier};
use crate::{ModelError, ModelParameters};
use ndarray::{ArrayView1, ArrayView2};
use tracing::debug;

/// Training settings for the CART tree
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    /// Maximum tree depth (root at depth 0)
    pub max_depth: usize,
    /// Minimum samples each child of a split must keep
    pub min_samples_leaf: usize,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_leaf: 10,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Fraction of malicious samples at this leaf
        probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Axis-aligned CART classifier with Gini impurity splits.
///
/// Splits scan features in index order and thresholds in value order, and a
/// tie keeps the earlier candidate, so fitting is fully deterministic.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    nodes: Vec<Node>,
    input_dim: usize,
}

impl DecisionTreeClassifier {
    /// Fit on a training batch.
    pub fn fit(
        features: ArrayView2<'_, f64>,
        labels: &[u8],
        config: &DecisionTreeConfig,
    ) -> Result<Self, ModelError> {
        let n = features.nrows();
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if labels.len() != n {
            return Err(ModelError::LabelMismatch {
                rows: n,
                labels: labels.len(),
            });
        }

        let mut tree = Self {
            nodes: Vec::new(),
            input_dim: features.ncols(),
        };
        let indices: Vec<usize> = (0..n).collect();
        tree.build(features, labels, indices, 0, config);

        debug!(nodes = tree.nodes.len(), "decision tree fitted");
        Ok(tree)
    }

    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Recursively grow the subtree over `indices`; returns the node index.
    fn build(
        &mut self,
        features: ArrayView2<'_, f64>,
        labels: &[u8],
        indices: Vec<usize>,
        depth: usize,
        config: &DecisionTreeConfig,
    ) -> usize {
        let positives = indices.iter().filter(|&&i| labels[i] == 1).count();
        let probability = positives as f64 / indices.len() as f64;

        let splittable = depth < config.max_depth
            && indices.len() >= 2 * config.min_samples_leaf
            && positives != 0
            && positives != indices.len();

        if let Some((feature, threshold)) = splittable
            .then(|| best_split(features, labels, &indices, config.min_samples_leaf))
            .flatten()
        {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| features[[i, feature]] <= threshold);

            // Reserve this node's slot before recursing so children land after it
            let node_index = self.nodes.len();
            self.nodes.push(Node::Leaf { probability });
            let left = self.build(features, labels, left_idx, depth + 1, config);
            let right = self.build(features, labels, right_idx, depth + 1, config);
            self.nodes[node_index] = Node::Split {
                feature,
                threshold,
                left,
                right,
            };
            node_index
        } else {
            self.nodes.push(Node::Leaf { probability });
            self.nodes.len() - 1
        }
    }
}

/// Gini impurity of a sample set described by its positive count.
fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

/// Exhaustive best split over all features and midpoint thresholds.
///
/// Returns `None` when no candidate improves on the parent impurity or
/// satisfies the leaf-size minimum.
fn best_split(
    features: ArrayView2<'_, f64>,
    labels: &[u8],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<(usize, f64)> {
    let total = indices.len();
    let parent_positives = indices.iter().filter(|&&i| labels[i] == 1).count();
    let parent_gini = gini(parent_positives, total);

    let mut best: Option<(usize, f64)> = None;
    let mut best_score = parent_gini - 1e-12;

    for feature in 0..features.ncols() {
        let mut values: Vec<(f64, u8)> = indices
            .iter()
            .map(|&i| (features[[i, feature]], labels[i]))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_total = 0usize;
        let mut left_positives = 0usize;
        for w in 0..total - 1 {
            left_total += 1;
            left_positives += values[w].1 as usize;

            // No threshold separates equal values
            if values[w].0 == values[w + 1].0 {
                continue;
            }
            let right_total = total - left_total;
            if left_total < min_samples_leaf || right_total < min_samples_leaf {
                continue;
            }

            let right_positives = parent_positives - left_positives;
            let score = (left_total as f64 * gini(left_positives, left_total)
                + right_total as f64 * gini(right_positives, right_total))
                / total as f64;

            if score < best_score {
                best_score = score;
                best = Some((feature, (values[w].0 + values[w + 1].0) / 2.0));
            }
        }
    }
    best
}

impl Classifier for DecisionTreeClassifier {
    fn name(&self) -> &str {
        "DecisionTree(max_depth=5)"
    }

    fn forward(&self, features: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0usize;
        loop {
            match self.nodes[index] {
                Node::Leaf { probability } => return probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    fn parameter_count(&self) -> usize {
        // feature, threshold and two child links per node; the same size
        // approximation the model comparison report uses
        self.nodes.len() * 4
    }

    fn architecture(&self) -> Architecture {
        Architecture {
            input_dim: self.input_dim,
            hidden_dims: Vec::new(),
            output_dim: 1,
            parameter_count: self.parameter_count(),
        }
    }

    fn export_parameters(&self) -> Option<ModelParameters> {
        // Trees have no dense-layer form; selection of a tree winner means
        // export must fail explicitly instead of emitting garbage tables.
        None
    }
}
