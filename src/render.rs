//! Rendering hooks for fitted results.
//!
//! Fitting never draws anything. A `Renderer` receives the data a chart
//! would need and decides what to do with it.

use crate::importance::RankedFeature;

/// Receives chart data from an [`Analysis`](crate::analysis::Analysis) run.
pub trait Renderer {
    /// Horizontal bar chart of ranked feature importances.
    fn importance_chart(&mut self, ranking: &[RankedFeature]);

    /// Autocorrelation plot of a residual series and its ACF.
    fn autocorrelation_plot(&mut self, residuals: &[f64], acf: &[f64]);
}

/// A renderer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn importance_chart(&mut self, _ranking: &[RankedFeature]) {}

    fn autocorrelation_plot(&mut self, _residuals: &[f64], _acf: &[f64]) {}
}
