//! Ranking of feature importances.

/// One feature in an importance ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFeature {
    /// 1-based position, 1 = most important.
    pub rank: usize,
    pub name: String,
    pub importance: f64,
}

/// Sort `(name, importance)` pairs by descending importance.
///
/// Ties keep their input order, so ranking the importances of a fitted
/// forest is deterministic.
pub fn rank_importances(importances: &[(String, f64)]) -> Vec<RankedFeature> {
    let mut ordered: Vec<&(String, f64)> = importances.iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (name, importance))| RankedFeature {
            rank: i + 1,
            name: name.clone(),
            importance: *importance,
        })
        .collect()
}
