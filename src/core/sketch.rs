use log::debug;

use crate::core::dataset::{Data, Dataset, DatasetId};
use crate::core::engine::map_partitions_collect;
use crate::core::reservoir;
use crate::Result;

/// Per-partition sampling seed: stable for a given input, decorrelated
/// across partitions and across inputs.
pub(crate) fn partition_seed(id: DatasetId, partition: usize) -> u32 {
    ((partition as u32) ^ id.0.wrapping_shl(16)).swap_bytes()
}

/// Sketch every partition of `input`: an exact item count plus a uniform
/// sample of at most `cap` keys each, collected in partition-index order.
///
/// Returns the total item count and one `(index, items, sample)` triple per
/// source partition. A failed partition read fails the whole sketch.
pub fn sketch_dataset<K: Data>(
    input: &dyn Dataset<K>,
    cap: usize,
) -> Result<(u64, Vec<(usize, u64, Vec<K>)>)> {
    let id = input.id();
    let sketches: Vec<(usize, u64, Vec<K>)> = map_partitions_collect(input, |idx, keys| {
        reservoir::sample_and_count(keys, cap, partition_seed(id, idx))
    })?
    .into_iter()
    .map(|(idx, (sample, items))| (idx, items, sample))
    .collect();

    let total: u64 = sketches.iter().map(|&(_, items, _)| items).sum();
    debug!(
        "sketched {} partitions of dataset {:?}: {} items total",
        sketches.len(),
        id,
        total
    );
    Ok((total, sketches))
}
