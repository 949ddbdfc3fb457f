use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::bounds::determine_bounds;
use crate::core::dataset::{Data, Dataset, DatasetId, PrunedDataset};
use crate::core::engine::bernoulli_sample;
use crate::core::partition::Partitioner;
use crate::core::sketch::sketch_dataset;
use crate::{Config, Result};

/// Boundary arrays up to this long are scanned linearly; longer ones are
/// binary searched. Either path computes the same bucket.
const LINEAR_SCAN_MAX_BOUNDS: usize = 128;

/// Buckets keys by range. `bounds` holds the ordered bucket dividers, so `n`
/// dividers make `n + 1` buckets; bucket `i` precedes bucket `i + 1` in key
/// order, or follows it when descending. Built from a weighted sample of the
/// input so bucket weights come out roughly balanced even when the input
/// partitions are badly skewed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RangePartitioner<K> {
    ascending: bool,
    bounds: Vec<K>,
    // bounds.len() + 1, except that a request for zero buckets stays zero
    partitions: usize,
}

impl<K: Data + Ord> RangePartitioner<K> {
    /// Build with the default [`Config`].
    pub fn new(partitions: usize, input: &dyn Dataset<K>, ascending: bool) -> Result<Self> {
        Self::with_config(partitions, input, ascending, &Config::default())
    }

    /// Sample `input` and choose boundaries for `partitions` buckets of
    /// roughly equal weight. Requests for 0 or 1 buckets skip sampling
    /// entirely; an empty input or a low-diversity sample yields fewer
    /// buckets than requested.
    pub fn with_config(
        partitions: usize,
        input: &dyn Dataset<K>,
        ascending: bool,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;

        let bounds = if partitions <= 1 {
            Vec::new()
        } else {
            Self::sample_bounds(partitions, input, config)?
        };

        let num = if partitions == 0 { 0 } else { bounds.len() + 1 };
        Ok(Self {
            ascending,
            bounds,
            partitions: num,
        })
    }

    /// Sketch the input, re-sample skewed partitions at the global rate, and
    /// cut boundaries from the weighted candidate pool.
    fn sample_bounds(
        partitions: usize,
        input: &dyn Dataset<K>,
        config: &Config,
    ) -> Result<Vec<K>> {
        // Hard cap on the keys pulled back to the coordinator.
        let sample_size = (config.sample_size_multiplier as u64 * partitions as u64)
            .min(config.sample_size_cap);
        // Over-sample each partition so moderate imbalance still yields
        // enough candidates without a second pass.
        let source_partitions = input.partitions_num().max(1);
        let sample_size_per_partition = (config.over_sample_factor * sample_size as f64
            / source_partitions as f64)
            .ceil() as usize;

        let (total, sketches) = sketch_dataset(input, sample_size_per_partition)?;
        if total == 0 {
            return Ok(Vec::new());
        }

        let fraction = (sample_size as f64 / total.max(1) as f64).min(1.0);
        let mut candidates: Vec<(K, f32)> = Vec::new();
        let mut skewed: HashSet<usize> = HashSet::new();
        for (idx, items, sample) in sketches {
            if fraction * items as f64 > sample_size_per_partition as f64 {
                // under-sampled relative to its share of the input
                skewed.insert(idx);
            } else {
                let weight = (items as f64 / sample.len() as f64) as f32;
                candidates.extend(sample.into_iter().map(|key| (key, weight)));
            }
        }

        if !skewed.is_empty() {
            info!(
                "re-sampling {} skewed partition(s) at fraction {fraction:.6}",
                skewed.len()
            );
            let pruned = PrunedDataset::new(input, |idx| skewed.contains(&idx));
            let weight = (1.0 / fraction) as f32;
            let keys = bernoulli_sample(&pruned, fraction, resample_seed(input.id()))?;
            candidates.extend(keys.into_iter().map(|key| (key, weight)));
        }

        debug!(
            "{} boundary candidates for {partitions} buckets",
            candidates.len()
        );
        Ok(determine_bounds(candidates, partitions))
    }

    pub fn bounds(&self) -> &[K] {
        &self.bounds
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Wire form for shipping the partitioner to workers.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Seed for the skew re-sample pass, disjoint from every per-partition
/// sketch seed of the same input.
fn resample_seed(id: DatasetId) -> u32 {
    (id.0 as i32).wrapping_neg().wrapping_sub(1).swap_bytes() as u32
}

impl<K: Data + Ord> Partitioner for RangePartitioner<K> {
    type Key = K;

    fn partitions_num(&self) -> usize {
        self.partitions
    }

    fn partition_of(&self, key: &Self::Key) -> usize {
        let len = self.bounds.len();
        // Count the bounds strictly below the key. A key equal to a bound
        // stays on the lower side, so equal keys always share a bucket.
        let ascending_idx = if len <= LINEAR_SCAN_MAX_BOUNDS {
            let mut idx = 0;
            while idx < len && *key > self.bounds[idx] {
                idx += 1;
            }
            idx
        } else {
            self.bounds.partition_point(|bound| bound < key)
        };
        if self.ascending {
            ascending_idx
        } else {
            len - ascending_idx
        }
    }
}

impl<K: Data + Ord> PartialEq for RangePartitioner<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ascending == other.ascending && self.bounds == other.bounds
    }
}

impl<K: Data + Ord> Eq for RangePartitioner<K> {}

impl<K: Data + Ord + Hash> Hash for RangePartitioner<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ascending.hash(state);
        self.bounds.hash(state);
    }
}
