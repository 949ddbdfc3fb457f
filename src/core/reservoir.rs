use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform sample of at most `size` items from a single pass over `iter`,
/// plus the exact number of items seen.
///
/// Streams no longer than `size` come back whole, in input order. Longer
/// streams get the classic reservoir treatment: item `i` draws `j` uniform
/// in `[0, i]` and lands in slot `j` when `j` falls inside the reservoir,
/// which gives every size-`size` subset the same probability. The generator
/// is a PCG stream derived from `seed` alone, so samples are reproducible.
pub fn sample_and_count<T>(
    mut iter: impl Iterator<Item = T>,
    size: usize,
    seed: u32,
) -> (Vec<T>, u64) {
    let mut reservoir = Vec::with_capacity(size);
    while reservoir.len() < size {
        match iter.next() {
            Some(item) => reservoir.push(item),
            None => {
                let count = reservoir.len() as u64;
                return (reservoir, count);
            }
        }
    }

    let mut rng = Pcg32::seed_from_u64(seed as u64);
    let mut count = size as u64;
    for item in iter {
        count += 1;
        let j = rng.gen_range(0..count);
        if (j as usize) < size {
            reservoir[j as usize] = item;
        }
    }
    (reservoir, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn short_stream_passes_through_in_order() {
        let (sample, count) = sample_and_count(0..5u64, 10, 1);
        assert_eq!(sample, vec![0, 1, 2, 3, 4]);
        assert_eq!(count, 5);

        let (sample, count) = sample_and_count(0..10u64, 10, 1);
        assert_eq!(sample, (0..10).collect::<Vec<_>>());
        assert_eq!(count, 10);
    }

    #[test]
    fn long_stream_is_capped_and_counted() {
        let (sample, count) = sample_and_count(0..1000u64, 10, 1);
        assert_eq!(count, 1000);
        assert_eq!(sample.len(), 10);
        // without replacement: all picks distinct and from the stream
        let distinct: HashSet<u64> = sample.iter().copied().collect();
        assert_eq!(distinct.len(), 10);
        assert!(sample.iter().all(|&item| item < 1000));
    }

    #[test]
    fn zero_cap_still_counts() {
        let (sample, count) = sample_and_count(0..321u64, 0, 9);
        assert!(sample.is_empty());
        assert_eq!(count, 321);
    }

    #[test]
    fn same_seed_same_sample() {
        let (first, _) = sample_and_count(0..5000u64, 100, 77);
        let (second, _) = sample_and_count(0..5000u64, 100, 77);
        assert_eq!(first, second);
    }

    #[test]
    fn tiny_input_is_fair() {
        // sample 1 of [0, 1] many times; counts should come out close
        let mut counts = [0i64; 2];
        for seed in 0..500u32 {
            let (sample, _) = sample_and_count(0..2u64, 1, seed);
            counts[sample[0] as usize] += 1;
        }
        assert!((counts[0] - counts[1]).abs() <= 100);
    }

    #[test]
    fn item_frequency_converges_to_m_over_n() {
        // m/n = 5/50, so each item should appear ~300 times in 3000 runs
        let mut counts = vec![0u32; 50];
        for seed in 0..3000u32 {
            let (sample, _) = sample_and_count(0..50u64, 5, seed);
            for item in sample {
                counts[item as usize] += 1;
            }
        }
        for (item, &count) in counts.iter().enumerate() {
            assert!(
                (220..=380).contains(&count),
                "item {item} sampled {count} times, expected ~300"
            );
        }
    }
}
