//! Revenue projection across the two revenue streams

use super::COMMERCIAL_REVENUE_SHARE;

/// Project total revenue for each forecast period.
///
/// Base revenue is split into commercial and government streams, each stream
/// compounds on its own prior projected value, and the period total is the
/// sum of the two. One value per period covered by both series.
pub fn project_revenues(
    base_revenue: f64,
    commercial_growth_rates: &[f64],
    government_growth_rates: &[f64],
) -> Vec<f64> {
    let mut commercial = base_revenue * COMMERCIAL_REVENUE_SHARE;
    let mut government = base_revenue * (1.0 - COMMERCIAL_REVENUE_SHARE);

    commercial_growth_rates
        .iter()
        .zip(government_growth_rates)
        .map(|(c, g)| {
            commercial *= 1.0 + c;
            government *= 1.0 + g;
            commercial + government
        })
        .collect()
}
