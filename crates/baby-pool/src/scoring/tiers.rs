//! Distinct-value tier allocation for the ranked categories.
//!
//! Guesses are ranked by distance and every *distinct* distance value takes the next tier, so
//! tied guesses share points and the following value still earns the next tier down.

/// Smallest distinct finite distances in ascending order, at most `limit` of them.
pub fn distinct_distances(distances: &[f64], limit: usize) -> Vec<f64> {
    let mut finite: Vec<f64> = distances
        .iter()
        .copied()
        .filter(|distance| distance.is_finite())
        .collect();
    finite.sort_by(f64::total_cmp);

    finite
        .into_iter()
        .fold(Vec::with_capacity(limit), |mut distinct, distance| {
            let is_new = distinct.last().map_or(true, |last| distance > *last);
            if is_new && distinct.len() < limit {
                distinct.push(distance);
            }
            distinct
        })
}

/// Points for each entry of `distances`, index-aligned with the input.
///
/// Infinite distances and distances beyond the last tier's distinct value earn zero.
pub fn allocate(distances: &[f64], tiers: &[u32]) -> Vec<u32> {
    let distinct = distinct_distances(distances, tiers.len());

    distances
        .iter()
        .map(|distance| {
            if !distance.is_finite() {
                return 0;
            }
            distinct
                .iter()
                .position(|value| value == distance)
                .and_then(|slot| tiers.get(slot).copied())
                .unwrap_or(0)
        })
        .collect()
}
