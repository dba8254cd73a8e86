//! Regression Tree over a single (already scaled) feature
//!
//! Because there is only one feature, a node's samples stay contiguous once
//! sorted by that feature: every split is a prefix/suffix of the parent's
//! slice. Growing the tree therefore sorts once and recurses on sub-slices.

use serde::{Deserialize, Serialize};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until the other limits stop it
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

/// Node impurity below this is treated as pure
const PURE_EPSILON: f64 = 1e-12;

impl RegressionTree {
    /// Grow a tree on `(feature, target)` pairs. Duplicated pairs (bootstrap
    /// draws) are allowed. Returns a single-leaf tree predicting 0.0 when
    /// `pairs` is empty.
    pub fn fit(mut pairs: Vec<(f64, f64)>, params: &TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        if pairs.is_empty() {
            tree.nodes.push(Node::Leaf { value: 0.0 });
            return tree;
        }

        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        tree.grow(&pairs, 0, params);
        tree
    }

    /// Appends the subtree for `pairs` and returns its root index
    fn grow(&mut self, pairs: &[(f64, f64)], depth: usize, params: &TreeParams) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean_target(pairs) });

        let min_leaf = params.min_samples_leaf.max(1);
        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached
            || pairs.len() < params.min_samples_split.max(2)
            || pairs.len() < 2 * min_leaf
        {
            return index;
        }

        let Some((cut, threshold)) = best_split(pairs, min_leaf) else {
            return index;
        };

        let left = self.grow(&pairs[..cut], depth + 1, params);
        let right = self.grow(&pairs[cut..], depth + 1, params);
        self.nodes[index] = Node::Split { threshold, left, right };
        index
    }

    pub fn predict(&self, x: f64) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split { threshold, left, right }) => {
                    index = if x <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes.get(index) {
                Some(Node::Split { left, right, .. }) => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    /// Structural check used when loading a persisted forest: every child
    /// index points forward into the node table.
    pub fn is_well_formed(&self) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                Node::Leaf { value } => value.is_finite(),
                Node::Split { threshold, left, right } => {
                    threshold.is_finite()
                        && *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}

fn mean_target(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    pairs.iter().map(|p| p.1).sum::<f64>() / pairs.len() as f64
}

/// Lowest summed squared error cut over a slice sorted by feature.
/// Returns the cut position (left = `..cut`) and the threshold.
fn best_split(pairs: &[(f64, f64)], min_leaf: usize) -> Option<(usize, f64)> {
    let n = pairs.len();
    let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
    let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= PURE_EPSILON {
        return None;
    }

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<(usize, f64)> = None;

    for cut in 1..n {
        let y = pairs[cut - 1].1;
        left_sum += y;
        left_sq += y * y;

        if cut < min_leaf || n - cut < min_leaf {
            continue;
        }
        // Equal feature values cannot be separated by a threshold
        if pairs[cut - 1].0 >= pairs[cut].0 {
            continue;
        }

        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let nl = cut as f64;
        let nr = (n - cut) as f64;
        let sse = (left_sq - left_sum * left_sum / nl) + (right_sq - right_sum * right_sum / nr);

        if best.map_or(true, |(_, b)| sse < b) {
            best = Some((cut, sse));
        }
    }

    best.map(|(cut, _)| {
        let lo = pairs[cut - 1].0;
        let hi = pairs[cut].0;
        let mut threshold = lo + (hi - lo) / 2.0;
        if threshold >= hi {
            threshold = lo;
        }
        (cut, threshold)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> Vec<(f64, f64)> {
        vec![(0.0, 10.0), (1.0, 10.0), (2.0, 10.0), (3.0, 50.0), (4.0, 50.0), (5.0, 50.0)]
    }

    #[test]
    fn test_learns_step_function() {
        let tree = RegressionTree::fit(step_data(), &TreeParams::default());
        assert_eq!(tree.predict(1.0), 10.0);
        assert_eq!(tree.predict(4.5), 50.0);
        // Single split at the midpoint 2.5
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(2.5), 10.0);
        assert_eq!(tree.predict(2.51), 50.0);
    }

    #[test]
    fn test_max_depth_zero_is_mean() {
        let params = TreeParams { max_depth: Some(0), ..Default::default() };
        let tree = RegressionTree::fit(step_data(), &params);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(0.0), 30.0);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let data: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, (i * i) as f64)).collect();
        let params = TreeParams { min_samples_leaf: 4, ..Default::default() };
        let tree = RegressionTree::fit(data, &params);
        // 10 samples with leaves of >= 4 allow exactly one split
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_min_samples_split_blocks_small_nodes() {
        let params = TreeParams { min_samples_split: 10, ..Default::default() };
        let tree = RegressionTree::fit(step_data(), &params);
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn test_duplicate_features_not_split() {
        let data = vec![(1.0, 5.0), (1.0, 7.0), (1.0, 9.0)];
        let tree = RegressionTree::fit(data, &TreeParams::default());
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(1.0), 7.0);
    }

    #[test]
    fn test_empty_input_and_well_formed() {
        let tree = RegressionTree::fit(Vec::new(), &TreeParams::default());
        assert_eq!(tree.predict(3.0), 0.0);
        assert!(tree.is_well_formed());
        assert!(RegressionTree::fit(step_data(), &TreeParams::default()).is_well_formed());
    }
}
