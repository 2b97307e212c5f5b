//! Fit all four strategies to a synthetic housing table and print a text report.
//!
//! Run with `cargo run --example regression_report`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regress_harness::prelude::*;

/// Prints charts as text tables.
struct TextRenderer;

impl Renderer for TextRenderer {
    fn importance_chart(&mut self, ranking: &[RankedFeature]) {
        println!("  feature importances");
        for feature in ranking {
            let bar = "#".repeat((feature.importance * 40.0).round() as usize);
            println!("  {:>2}. {:<8} {:.3} {}", feature.rank, feature.name, feature.importance, bar);
        }
    }

    fn autocorrelation_plot(&mut self, residuals: &[f64], acf: &[f64]) {
        println!("  residual ACF ({} residuals)", residuals.len());
        for (lag, r) in acf.iter().enumerate().take(8) {
            println!("  lag {lag:>2}: {r:+.3}");
        }
    }
}

fn housing_table(n: usize) -> Result<Table, SchemaError> {
    let mut rng = StdRng::seed_from_u64(2024);

    let mut area = Vec::with_capacity(n);
    let mut rooms = Vec::with_capacity(n);
    let mut age = Vec::with_capacity(n);
    let mut price = Vec::with_capacity(n);
    for _ in 0..n {
        let a: f64 = rng.random_range(40.0..140.0);
        let r = (a / 25.0).round() as i64;
        let g: f64 = rng.random_range(0.0..50.0);
        price.push(1500.0 * a + 8000.0 * r as f64 - 900.0 * g + rng.random_range(-10000.0..10000.0_f64));
        area.push(a);
        rooms.push(r);
        age.push(g);
    }

    Table::from_columns([
        ("area", Column::float(area)),
        ("rooms", Column::int(rooms)),
        ("age", Column::float(age)),
        ("price", Column::float(price)),
    ])
}

fn main() -> Result<(), RegressionError> {
    let table = housing_table(200)?;
    let view = DatasetView::new(&table, &["area", "rooms", "age"], "price")?;
    let mut renderer = TextRenderer;

    let strategies = [
        ModelStrategy::linear(),
        ModelStrategy::svr(),
        ModelStrategy::from(RandomForestRegressor::builder().n_trees(100).seed(7).build()?),
        ModelStrategy::statistical_ols(),
    ];

    for strategy in &strategies {
        println!("== {} ==", strategy.name());
        let fitted = Analysis::new(&view).renderer(&mut renderer).run(strategy)?;
        println!("  in-sample R² = {:.4}", fitted.score(&view)?);

        if let Some(ols) = fitted.as_statistical_ols() {
            for term in ols.terms() {
                println!(
                    "  {:<10} {:>12.3} (se {:.3}, p {:.4})",
                    term.name, term.estimate, term.std_error, term.p_value
                );
            }
            let diagnostics = ols.diagnostics();
            if let Some(adf) = &diagnostics.stationarity {
                println!(
                    "  ADF statistic {:.3}, p = {:.4}, stationary residuals: {}",
                    adf.statistic, adf.p_value, adf.rejects_unit_root
                );
            }
            for (name, vif) in &diagnostics.vif {
                println!("  VIF {name:<8} {vif:.2}");
            }
        }
    }

    Ok(())
}
