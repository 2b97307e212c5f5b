//! Bootstrap-aggregated regression trees.

use crate::core::{ForestOptions, MaxFeatures, OptionsError, RegressionError, SplitCriterion};
use crate::data::DatasetView;
use crate::importance::{rank_importances, RankedFeature};
use crate::solvers::traits::{FittedRegressor, Regressor};
use crate::solvers::tree::{RegressionTree, TreeParams};
use crate::utils::{parallel, rows};
use faer::{Col, Mat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Random-forest strategy.
///
/// Each tree is grown on a bootstrap sample with its own RNG, seeded from a
/// master generator before training starts, so a fixed `seed` yields the
/// same forest for any `parallelism`.
#[derive(Debug, Clone, Default)]
pub struct RandomForestRegressor {
    options: ForestOptions,
}

impl RandomForestRegressor {
    /// Create a regressor with the given options.
    pub fn new(options: ForestOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> RandomForestRegressorBuilder {
        RandomForestRegressorBuilder::default()
    }

    /// Options used for fitting.
    pub fn options(&self) -> &ForestOptions {
        &self.options
    }

    fn train_tree(
        &self,
        data: &[Vec<f64>],
        y: &[f64],
        params: &TreeParams,
        seed: u64,
    ) -> RegressionTree {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = y.len();
        let samples: Vec<usize> = if self.options.bootstrap {
            (0..n).map(|_| rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };
        RegressionTree::fit(data, y, samples, params, &mut rng)
    }
}

impl Regressor for RandomForestRegressor {
    type Fitted = FittedForest;

    fn fit(&self, view: &DatasetView) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let n_features = view.n_features();
        let params = TreeParams {
            criterion: self.options.criterion,
            max_features: self.options.max_features.resolve(n_features),
            max_depth: self.options.max_depth,
            min_samples_split: self.options.min_samples_split,
            min_samples_leaf: self.options.min_samples_leaf,
        };
        log::debug!(
            "fitting random forest: {} trees, {} of {} features per split, seed {:?}",
            self.options.n_trees,
            params.max_features,
            n_features,
            self.options.seed
        );

        let mut master = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let seeds: Vec<u64> = (0..self.options.n_trees).map(|_| master.random::<u64>()).collect();

        let data = rows(view.explanatory_matrix());
        let y: Vec<f64> = view.criterion_vector().iter().copied().collect();

        let trees: Vec<RegressionTree> = parallel::install(self.options.parallelism, || {
            seeds
                .into_par_iter()
                .map(|seed| self.train_tree(&data, &y, &params, seed))
                .collect()
        })?;

        let importances = forest_importances(&trees, n_features);
        let feature_importances: Vec<(String, f64)> = view
            .explanatory_columns()
            .iter()
            .cloned()
            .zip(importances)
            .collect();
        let ranking = rank_importances(&feature_importances);

        Ok(FittedForest {
            explanatory_columns: view.explanatory_columns().to_vec(),
            trees,
            feature_importances,
            ranking,
        })
    }
}

/// Mean of the per-tree normalized impurity decreases, normalized to sum 1.
///
/// Uniform when no tree made a split.
fn forest_importances(trees: &[RegressionTree], n_features: usize) -> Vec<f64> {
    let mut total = vec![0.0; n_features];
    for tree in trees {
        let sum: f64 = tree.importances().iter().sum();
        if sum > 0.0 {
            for (t, v) in total.iter_mut().zip(tree.importances()) {
                *t += v / sum;
            }
        }
    }

    let sum: f64 = total.iter().sum();
    if sum > 0.0 {
        total.iter().map(|v| v / sum).collect()
    } else {
        log::warn!("no tree split on any feature; importances are uniform");
        vec![1.0 / n_features as f64; n_features]
    }
}

/// A fitted random forest.
#[derive(Debug, Clone)]
pub struct FittedForest {
    explanatory_columns: Vec<String>,
    trees: Vec<RegressionTree>,
    feature_importances: Vec<(String, f64)>,
    ranking: Vec<RankedFeature>,
}

impl FittedForest {
    /// Importance per explanatory column, in column order; sums to 1.
    pub fn feature_importances(&self) -> &[(String, f64)] {
        &self.feature_importances
    }

    /// Importances sorted from most to least important.
    pub fn ranking(&self) -> &[RankedFeature] {
        &self.ranking
    }

    /// Number of trees in the forest.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl FittedRegressor for FittedForest {
    fn explanatory_columns(&self) -> &[String] {
        &self.explanatory_columns
    }

    fn predict_unchecked(&self, x: &Mat<f64>) -> Col<f64> {
        let data = rows(x);
        let n_trees = self.trees.len() as f64;
        Col::from_fn(x.nrows(), |i| {
            self.trees.iter().map(|t| t.predict_row(&data[i])).sum::<f64>() / n_trees
        })
    }
}

/// Builder for `RandomForestRegressor`.
#[derive(Debug, Clone, Default)]
pub struct RandomForestRegressorBuilder {
    options: ForestOptions,
}

impl RandomForestRegressorBuilder {
    /// Set the number of trees.
    pub fn n_trees(mut self, n: usize) -> Self {
        self.options.n_trees = n;
        self
    }

    /// Set the split criterion.
    pub fn criterion(mut self, criterion: SplitCriterion) -> Self {
        self.options.criterion = criterion;
        self
    }

    /// Set the number of candidate features per split.
    pub fn max_features(mut self, max_features: MaxFeatures) -> Self {
        self.options.max_features = max_features;
        self
    }

    /// Limit tree depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }

    /// Set the minimum samples required to split a node.
    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.options.min_samples_split = n;
        self
    }

    /// Set the minimum samples per leaf.
    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.options.min_samples_leaf = n;
        self
    }

    /// Enable or disable bootstrap sampling.
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.options.bootstrap = bootstrap;
        self
    }

    /// Fix the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    /// Set worker threads (`-1` for all cores).
    pub fn parallelism(mut self, threads: i32) -> Self {
        self.options.parallelism = threads;
        self
    }

    /// Build the regressor, validating the options.
    pub fn build(self) -> Result<RandomForestRegressor, OptionsError> {
        self.options.validate()?;
        Ok(RandomForestRegressor::new(self.options))
    }

    /// Build without validation; `fit` still validates.
    pub fn build_unchecked(self) -> RandomForestRegressor {
        RandomForestRegressor::new(self.options)
    }
}
