/// Choose up to `partitions - 1` strictly increasing bucket boundaries from
/// a pool of weighted candidates.
///
/// Candidates are swept in key order, cutting a boundary each time the
/// cumulative weight crosses the next multiple of `total weight /
/// partitions`. A candidate that doesn't exceed the previous boundary is
/// skipped, which keeps boundaries strictly monotone; heavily duplicated
/// pools may therefore yield fewer boundaries than asked for, and the caller
/// settles for fewer buckets.
pub fn determine_bounds<K: Ord>(mut candidates: Vec<(K, f32)>, partitions: usize) -> Vec<K> {
    if partitions <= 1 || candidates.is_empty() {
        return Vec::new();
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let sum_weights: f64 = candidates.iter().map(|&(_, weight)| weight as f64).sum();
    let step = sum_weights / partitions as f64;
    let mut cum_weight = 0.0;
    let mut target = step;
    let mut bounds: Vec<K> = Vec::with_capacity(partitions - 1);

    for (key, weight) in candidates {
        cum_weight += weight as f64;
        if cum_weight < target {
            continue;
        }
        if bounds.last().map_or(true, |prev| key > *prev) {
            bounds.push(key);
            target += step;
            if bounds.len() == partitions - 1 {
                break;
            }
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_candidates() {
        // weights pull the cuts away from the naive percentiles
        let candidates = vec![
            (7u64, 2.0),
            (1, 1.0),
            (4, 1.0),
            (3, 1.0),
            (2, 1.0),
            (5, 1.0),
            (10, 3.0),
        ];
        assert_eq!(determine_bounds(candidates, 3), vec![4, 7]);
    }

    #[test]
    fn uniform_weights_cut_at_percentiles() {
        let candidates: Vec<(u64, f32)> = (1..=100).map(|key| (key, 1.0)).collect();
        assert_eq!(determine_bounds(candidates, 4), vec![25, 50, 75]);
    }

    #[test]
    fn duplicate_keys_are_skipped() {
        let mut candidates: Vec<(u64, f32)> = vec![(5, 1.0); 40];
        candidates.push((9, 1.0));
        let bounds = determine_bounds(candidates, 4);
        // one cut at the duplicated key, later cuts suppressed until a larger
        // key shows up
        assert_eq!(bounds, vec![5, 9]);
    }

    #[test]
    fn degenerate_requests() {
        assert!(determine_bounds(Vec::<(u64, f32)>::new(), 4).is_empty());
        assert!(determine_bounds(vec![(1u64, 1.0), (2, 1.0)], 1).is_empty());
        assert!(determine_bounds(vec![(1u64, 1.0), (2, 1.0)], 0).is_empty());
    }

    #[test]
    fn bounds_are_strictly_monotone_and_capped() {
        let candidates: Vec<(u32, f32)> = (0..500)
            .map(|i| ((i * 7919) % 97, 1.0 + (i % 5) as f32))
            .collect();
        for partitions in [2usize, 3, 8, 40, 200] {
            let bounds = determine_bounds(candidates.clone(), partitions);
            assert!(bounds.len() <= partitions - 1);
            assert!(bounds.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
