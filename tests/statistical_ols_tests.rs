//! Statistical OLS integration tests.

mod common;

use approx::assert_relative_eq;
use faer::{Col, Mat};
use regress_harness::prelude::*;

#[test]
fn test_two_rows_two_columns_is_singular() {
    let table = Table::from_columns([
        ("a", Column::float(vec![1.0, 2.0])),
        ("b", Column::float(vec![3.0, 5.0])),
        ("y", Column::float(vec![0.0, 1.0])),
    ])
    .unwrap();
    let view = DatasetView::new(&table, &["a", "b"], "y").unwrap();

    let err = ModelStrategy::statistical_ols().fit(&view).unwrap_err();
    assert!(err.is_singular());
    assert!(matches!(err, RegressionError::SingularMatrix { n_params: 3, .. }));
}

#[test]
fn test_collinear_design_is_singular() {
    let x = Mat::from_fn(20, 2, |i, j| if j == 0 { i as f64 } else { 3.0 * i as f64 + 1.0 });
    let y = Col::from_fn(20, |i| i as f64);
    let view = DatasetView::from_parts(&["a", "b"], "y", x, y).unwrap();

    let err = StatisticalOlsRegressor::default().fit(&view).unwrap_err();
    assert!(matches!(err, RegressionError::SingularMatrix { rank: 2, n_params: 3 }));
}

#[test]
fn test_collinear_design_in_large_units_is_singular() {
    let (x, y, _) = common::generate_linear_data(40, 2, 3.0, 1.0, 17);
    let big = Mat::from_fn(40, 3, |i, j| match j {
        2 => 1e5 * (x[(i, 0)] + x[(i, 1)]),
        _ => 1e5 * x[(i, j)],
    });
    let view = DatasetView::from_parts(&["a", "b", "c"], "y", big, y).unwrap();

    let err = StatisticalOlsRegressor::default().fit(&view).unwrap_err();
    assert!(matches!(err, RegressionError::SingularMatrix { rank: 3, n_params: 4 }));
}

#[test]
fn test_small_units_keep_full_inference() {
    let (x, y, _) = common::generate_linear_data(30, 1, 2.0, 0.5, 23);

    for scale in [1e-8, 1e-12] {
        let tiny = Mat::from_fn(30, 1, |i, _| scale * x[(i, 0)]);
        let view = DatasetView::from_parts(&["x"], "y", tiny, y.clone()).unwrap();
        let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();

        let term = ols.term("x").unwrap();
        assert_relative_eq!(term.estimate * scale, 1.0, max_relative = 0.1);
        assert!(term.std_error.is_finite() && term.std_error > 0.0);
        assert!(term.p_value < 1e-6);
        assert!(ols.term(INTERCEPT).unwrap().std_error.is_finite());
    }
}

#[test]
fn test_terms_match_linear_strategy() {
    let view = common::linear_view(60, 2, 4.0, 1.0, 5);

    let linear = LinearRegressor::default().fit(&view).unwrap();
    let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();

    assert_eq!(ols.terms().len(), 3);
    assert_eq!(ols.terms()[0].name, INTERCEPT);
    assert_relative_eq!(ols.term(INTERCEPT).unwrap().estimate, linear.intercept(), epsilon = 1e-10);
    for name in ["x1", "x2"] {
        let term = ols.term(name).unwrap();
        assert_relative_eq!(term.estimate, linear.coefficient(name).unwrap(), epsilon = 1e-10);
        assert!(term.std_error > 0.0);
        assert!(term.p_value < 1e-6);
        assert!(term.conf_interval.0 < term.estimate && term.estimate < term.conf_interval.1);
    }
}

#[test]
fn test_summary_statistics() {
    let view = common::linear_view(60, 2, 4.0, 1.0, 5);
    let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();
    let summary = ols.summary();

    assert_eq!(summary.n_observations, 60);
    assert_eq!(summary.df_model, 2);
    assert_eq!(summary.df_residual, 57);
    assert!(summary.r_squared > 0.9 && summary.r_squared <= 1.0);
    assert!(summary.adj_r_squared <= summary.r_squared);
    assert!(summary.f_pvalue < 1e-10);
    assert_relative_eq!(summary.aic, -2.0 * summary.log_likelihood + 6.0, epsilon = 1e-9);
    assert_relative_eq!(
        summary.bic,
        -2.0 * summary.log_likelihood + 3.0 * 60f64.ln(),
        epsilon = 1e-9
    );

    let rss: f64 = ols.residuals().iter().map(|e| e * e).sum();
    assert_relative_eq!(summary.residual_std_error, (rss / 57.0).sqrt(), epsilon = 1e-10);
}

#[test]
fn test_diagnostics_are_populated() {
    let view = common::linear_view(60, 2, 4.0, 1.0, 9);
    let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();
    let diagnostics = ols.diagnostics();

    assert_eq!(diagnostics.autocorrelation.len(), 41);
    assert_eq!(diagnostics.autocorrelation[0], 1.0);
    assert_eq!(
        diagnostics.vif.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["x1", "x2"]
    );
    assert!(diagnostics.vif.values().all(|&v| v >= 1.0 && v < 10.0));
    assert!(diagnostics.high_vif.is_empty());
    assert!(diagnostics.durbin_watson > 0.0 && diagnostics.durbin_watson < 4.0);

    let adf = diagnostics.stationarity.as_ref().unwrap();
    assert_eq!(adf.regression, AdfRegression::NoConstant);
    assert!((0.0..=1.0).contains(&adf.p_value));
    assert_eq!(adf.rejects_unit_root, adf.p_value < 0.05);
}

#[test]
fn test_acf_lags_capped_by_observations() {
    let view = common::linear_view(12, 1, 0.0, 1.0, 2);
    let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();
    assert_eq!(ols.diagnostics().autocorrelation.len(), 12);

    let ols = StatisticalOlsRegressor::builder()
        .acf_lags(5)
        .build()
        .unwrap()
        .fit(&view)
        .unwrap();
    assert_eq!(ols.diagnostics().autocorrelation.len(), 6);
}

#[test]
fn test_exclude_pads_residuals() {
    let mut x1: Vec<f64> = (0..12).map(|i| i as f64).collect();
    x1[4] = f64::NAN;
    let y: Vec<f64> = (0..12).map(|i| 1.0 + 2.0 * i as f64 + if i % 2 == 0 { 0.3 } else { -0.3 }).collect();
    let table = Table::from_columns([("x1", Column::float(x1)), ("y", Column::float(y))]).unwrap();

    let view = DatasetView::with_na_action(&table, &["x1"], "y", NaAction::Exclude).unwrap();
    let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();

    assert_eq!(ols.residuals().nrows(), 11);
    let expanded = ols.residuals_expanded();
    assert_eq!(expanded.nrows(), 12);
    assert!(expanded[4].is_nan());
    assert_relative_eq!(expanded[5], ols.residuals()[4], epsilon = 1e-15);

    let omitted = DatasetView::with_na_action(&table, &["x1"], "y", NaAction::Omit).unwrap();
    let ols = StatisticalOlsRegressor::default().fit(&omitted).unwrap();
    assert_eq!(ols.residuals_expanded().nrows(), 11);
}

#[test]
fn test_standardized_residuals_scale() {
    let view = common::linear_view(40, 1, 0.0, 2.0, 4);
    let ols = StatisticalOlsRegressor::default().fit(&view).unwrap();

    let scale = ols.summary().residual_std_error;
    let standardized = ols.standardized_residuals();
    for i in 0..40 {
        assert_relative_eq!(standardized[i] * scale, ols.residuals()[i], epsilon = 1e-10);
    }
}

#[test]
fn test_invalid_options_rejected_at_fit() {
    let view = common::linear_view(20, 1, 0.0, 1.0, 4);
    let err = StatisticalOlsRegressor::builder()
        .significance(0.0)
        .build_unchecked()
        .fit(&view)
        .unwrap_err();
    assert!(matches!(
        err,
        RegressionError::InvalidOptions(OptionsError::InvalidSignificance(_))
    ));
}
