// src/forest/tree.rs
// Weighted CART decision tree (Gini impurity) stored as a flat node arena

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A node in the flattened tree. Children are indices into the node vector,
/// which keeps serialized models free of deep nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities, indexed by class id
        distribution: Vec<f64>,
    },
}

/// Growth limits applied while fitting a tree
#[derive(Debug, Clone, Copy)]
pub struct TreeLimits {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features examined per split before settling for the best one found
    pub max_features: usize,
}

/// A fitted classification tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct Pending {
    node: usize,
    indices: Vec<usize>,
    depth: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl DecisionTree {
    /// Grow a tree over the samples with positive weight.
    ///
    /// `x` rows are feature vectors, `y` class ids below `n_classes`, and
    /// `weights` per-sample weights (bootstrap multiplicity times class weight).
    pub fn fit<R: Rng + ?Sized>(
        x: &[Vec<f64>],
        y: &[usize],
        weights: &[f64],
        n_classes: usize,
        limits: TreeLimits,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let root: Vec<usize> = (0..y.len()).filter(|&i| weights[i] > 0.0).collect();

        let mut nodes = vec![Node::Leaf {
            distribution: Vec::new(),
        }];
        let mut stack = vec![Pending {
            node: 0,
            indices: root,
            depth: 0,
        }];

        while let Some(Pending {
            node,
            indices,
            depth,
        }) = stack.pop()
        {
            let counts = weighted_counts(&indices, y, weights, n_classes);

            let at_limit = limits.max_depth.is_some_and(|max| depth >= max);
            let split = if at_limit
                || indices.len() < limits.min_samples_split.max(2)
                || is_pure(&counts)
            {
                None
            } else {
                best_split(x, y, weights, &indices, &counts, n_features, limits, rng)
            };

            let Some(split) = split else {
                nodes[node] = Node::Leaf {
                    distribution: normalize(counts),
                };
                continue;
            };

            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| x[i][split.feature] <= split.threshold);

            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf {
                distribution: Vec::new(),
            });
            nodes.push(Node::Leaf {
                distribution: Vec::new(),
            });
            nodes[node] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            stack.push(Pending {
                node: right,
                indices: right_idx,
                depth: depth + 1,
            });
            stack.push(Pending {
                node: left,
                indices: left_idx,
                depth: depth + 1,
            });
        }

        Self { nodes }
    }

    /// Class distribution of the leaf the sample falls into
    pub fn predict_proba(&self, sample: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        max_depth
    }
}

fn weighted_counts(indices: &[usize], y: &[usize], weights: &[f64], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0.0; n_classes];
    for &i in indices {
        counts[y[i]] += weights[i];
    }
    counts
}

fn is_pure(counts: &[f64]) -> bool {
    counts.iter().filter(|&&c| c > 0.0).count() <= 1
}

fn normalize(counts: Vec<f64>) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return counts;
    }
    counts.into_iter().map(|c| c / total).collect()
}

/// Sum of squared class weights over total weight.
///
/// Maximizing the children's sum of this quantity is equivalent to
/// minimizing their weighted Gini impurity.
fn gini_proxy(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    counts.iter().map(|c| c * c).sum::<f64>() / total
}

#[allow(clippy::too_many_arguments)]
fn best_split<R: Rng + ?Sized>(
    x: &[Vec<f64>],
    y: &[usize],
    weights: &[f64],
    indices: &[usize],
    parent_counts: &[f64],
    n_features: usize,
    limits: TreeLimits,
    rng: &mut R,
) -> Option<BestSplit> {
    let mut features: Vec<usize> = (0..n_features).collect();
    features.shuffle(rng);

    let parent_total: f64 = parent_counts.iter().sum();
    let mut best: Option<BestSplit> = None;
    let mut sorted = indices.to_vec();

    // Keep drawing features past max_features until at least one valid
    // partition exists; constant features never yield one.
    for (visited, &feature) in features.iter().enumerate() {
        if visited >= limits.max_features && best.is_some() {
            break;
        }

        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left = vec![0.0; parent_counts.len()];
        let mut left_total = 0.0;
        for pos in 0..sorted.len() - 1 {
            let i = sorted[pos];
            left[y[i]] += weights[i];
            left_total += weights[i];

            let current = x[i][feature];
            let next = x[sorted[pos + 1]][feature];
            if next <= current {
                continue;
            }

            let right_total = parent_total - left_total;
            let right: Vec<f64> = parent_counts
                .iter()
                .zip(&left)
                .map(|(p, l)| p - l)
                .collect();
            let score = gini_proxy(&left, left_total) + gini_proxy(&right, right_total);

            if best.as_ref().is_none_or(|b| score > b.score) {
                let mut threshold = current + (next - current) / 2.0;
                if threshold >= next {
                    threshold = current;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    score,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn limits() -> TreeLimits {
        TreeLimits {
            max_depth: None,
            min_samples_split: 2,
            max_features: 2,
        }
    }

    #[test]
    fn test_separable_data_fits_exactly() {
        let x = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![8.0, 0.0],
            vec![9.0, 0.0],
        ];
        let y = vec![0, 0, 1, 1];
        let w = vec![1.0; 4];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, &w, 2, limits(), &mut rng);

        assert_eq!(tree.predict_proba(&[1.5, 0.0]), &[1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[8.5, 0.0]), &[0.0, 1.0]);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_threshold_is_midpoint() {
        let x = vec![vec![1.0], vec![3.0]];
        let y = vec![0, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, &[1.0, 1.0], 2, limits(), &mut rng);
        assert_eq!(tree.predict_proba(&[2.0]), &[1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[2.01]), &[0.0, 1.0]);
    }

    #[test]
    fn test_pure_node_is_single_leaf() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![1, 1, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, &[1.0; 3], 3, limits(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[10.0]), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_identical_features_yield_weighted_leaf() {
        let x = vec![vec![5.0], vec![5.0], vec![5.0]];
        let y = vec![0, 1, 1];
        let w = vec![2.0, 1.0, 1.0];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, &w, 2, limits(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[5.0]), &[0.5, 0.5]);
    }

    #[test]
    fn test_zero_weight_samples_are_ignored() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![0, 1, 0];
        let w = vec![1.0, 0.0, 1.0];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(&x, &y, &w, 2, limits(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[2.0]), &[1.0, 0.0]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Vec<f64>> = (0..16).map(|i| vec![i as f64]).collect();
        let y: Vec<usize> = (0..16).map(|i| i % 2).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let limited = TreeLimits {
            max_depth: Some(2),
            ..limits()
        };
        let tree = DecisionTree::fit(&x, &y, &[1.0; 16], 2, limited, &mut rng);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_leaf_distributions_sum_to_one() {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![(i % 7) as f64, (i % 3) as f64]).collect();
        let y: Vec<usize> = (0..40).map(|i| i % 4).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(&x, &y, &[1.0; 40], 4, limits(), &mut rng);
        for row in &x {
            let sum: f64 = tree.predict_proba(row).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
