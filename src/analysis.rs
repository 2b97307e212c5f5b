//! Fit a strategy and forward its chartable output to a renderer.

use crate::core::RegressionError;
use crate::data::DatasetView;
use crate::render::{NoopRenderer, Renderer};
use crate::solvers::{FittedModel, ModelStrategy};

/// Runs a strategy on a view and routes results to a `Renderer`.
///
/// RandomForest fits produce one `importance_chart` call, StatisticalOLS fits
/// one `autocorrelation_plot` call; Linear and SVR fits render nothing.
///
/// # Example
///
/// ```rust
/// use regress_harness::prelude::*;
///
/// let table = Table::from_columns([
///     ("a", Column::float((0..20).map(|i| i as f64).collect::<Vec<_>>())),
///     ("b", Column::float((0..20).map(|i| ((i * 3) % 7) as f64).collect::<Vec<_>>())),
///     ("y", Column::float((0..20).map(|i| i as f64 * 0.5 + ((i * 3) % 7) as f64).collect::<Vec<_>>())),
/// ]).unwrap();
/// let view = DatasetView::new(&table, &["a", "b"], "y").unwrap();
///
/// let mut renderer = NoopRenderer;
/// let fitted = Analysis::new(&view)
///     .renderer(&mut renderer)
///     .run(&ModelStrategy::statistical_ols())
///     .unwrap();
/// assert!(fitted.as_statistical_ols().is_some());
/// ```
pub struct Analysis<'a> {
    view: &'a DatasetView,
    renderer: Option<&'a mut dyn Renderer>,
}

impl<'a> Analysis<'a> {
    /// Start an analysis of `view` with no renderer attached.
    pub fn new(view: &'a DatasetView) -> Self {
        Self {
            view,
            renderer: None,
        }
    }

    /// Attach a renderer.
    pub fn renderer(mut self, renderer: &'a mut dyn Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Fit `strategy` and render its output.
    pub fn run(self, strategy: &ModelStrategy) -> Result<FittedModel, RegressionError> {
        log::info!(
            "running {} on {} ({} observations)",
            strategy.name(),
            self.view.criterion_column(),
            self.view.n_observations()
        );
        let fitted = strategy.fit(self.view)?;

        let mut noop = NoopRenderer;
        let renderer: &mut dyn Renderer = match self.renderer {
            Some(r) => r,
            None => &mut noop,
        };

        match &fitted {
            FittedModel::RandomForest(forest) => renderer.importance_chart(forest.ranking()),
            FittedModel::StatisticalOls(ols) => {
                let residuals: Vec<f64> = ols.residuals().iter().copied().collect();
                renderer.autocorrelation_plot(&residuals, &ols.diagnostics().autocorrelation);
            }
            FittedModel::Linear(_) | FittedModel::Svr(_) => {}
        }

        Ok(fitted)
    }
}
