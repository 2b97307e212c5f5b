//! CART regression trees used by the random forest.

use crate::core::SplitCriterion;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Splits whose impurity decrease is at or below this are not made.
const MIN_DECREASE: f64 = 1e-12;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub criterion: SplitCriterion,
    /// Candidate features examined per split, already resolved to a count.
    pub max_features: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    /// Samples going left once the node's indices are sorted on `feature`.
    n_left: usize,
    score: f64,
    decrease: f64,
}

/// A fitted regression tree.
#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error decrease contributed by each feature.
    importances: Vec<f64>,
}

/// Sum and sum of squares of `y` over `indices`.
fn moments(y: &[f64], indices: &[usize]) -> (f64, f64) {
    indices.iter().fold((0.0, 0.0), |(s, ss), &i| (s + y[i], ss + y[i] * y[i]))
}

fn sse(sum: f64, sum_sq: f64, n: usize) -> f64 {
    (sum_sq - sum * sum / n as f64).max(0.0)
}

impl RegressionTree {
    /// Grow a tree on the rows listed in `samples` (duplicates allowed).
    pub(crate) fn fit(
        data: &[Vec<f64>],
        y: &[f64],
        mut samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = data.first().map_or(0, Vec::len);
        let mut tree = Self {
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        tree.grow(data, y, &mut samples, 0, params, rng);
        tree
    }

    fn grow(
        &mut self,
        data: &[Vec<f64>],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> usize {
        let n = indices.len();
        let (sum, sum_sq) = moments(y, indices);
        let value = if n > 0 { sum / n as f64 } else { 0.0 };

        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || n < params.min_samples_split || n < 2 * params.min_samples_leaf {
            return node_id;
        }
        if sse(sum, sum_sq, n) <= MIN_DECREASE {
            return node_id;
        }

        let Some(split) = self.best_split(data, y, indices, sum, sum_sq, params, rng) else {
            return node_id;
        };

        indices.sort_by(|&a, &b| data[a][split.feature].total_cmp(&data[b][split.feature]));
        self.importances[split.feature] += split.decrease;

        let (left_idx, right_idx) = indices.split_at_mut(split.n_left);
        let left = self.grow(data, y, left_idx, depth + 1, params, rng);
        let right = self.grow(data, y, right_idx, depth + 1, params, rng);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    #[allow(clippy::too_many_arguments)]
    fn best_split(
        &self,
        data: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        sum: f64,
        sum_sq: f64,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Option<Split> {
        let n = indices.len();
        let n_features = self.importances.len();
        let parent_sse = sse(sum, sum_sq, n);

        let mut features: Vec<usize> = (0..n_features).collect();
        if params.max_features < n_features {
            features.shuffle(rng);
            features.truncate(params.max_features);
        }

        let mut order = indices.to_vec();
        let mut best: Option<Split> = None;

        for &feature in &features {
            order.sort_by(|&a, &b| data[a][feature].total_cmp(&data[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let prev = order[k - 1];
                left_sum += y[prev];
                left_sq += y[prev] * y[prev];

                let lo = data[prev][feature];
                let hi = data[order[k]][feature];
                if k < params.min_samples_leaf || n - k < params.min_samples_leaf || lo >= hi {
                    continue;
                }

                let (n_l, n_r) = (k as f64, (n - k) as f64);
                let right_sum = sum - left_sum;
                let decrease =
                    parent_sse - sse(left_sum, left_sq, k) - sse(right_sum, sum_sq - left_sq, n - k);

                let score = match params.criterion {
                    SplitCriterion::SquaredError => decrease,
                    SplitCriterion::FriedmanMse => {
                        let diff = left_sum / n_l - right_sum / n_r;
                        n_l * n_r / (n_l + n_r) * diff * diff
                    }
                };

                if decrease > MIN_DECREASE && best.map_or(true, |b| score > b.score) {
                    let mid = lo + (hi - lo) / 2.0;
                    best = Some(Split {
                        feature,
                        threshold: if mid < hi { mid } else { lo },
                        n_left: k,
                        score,
                        decrease,
                    });
                }
            }
        }

        best
    }

    /// Predict a single row.
    pub(crate) fn predict_row(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    /// Raw per-feature impurity decrease.
    pub(crate) fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Number of internal (split) nodes.
    pub(crate) fn n_splits(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Split { .. }))
            .count()
    }
}
