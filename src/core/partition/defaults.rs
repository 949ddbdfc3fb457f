use std::cmp::Reverse;
use std::hash::Hash;
use std::sync::Arc;

use log::debug;

use crate::core::dataset::{Data, Dataset};
use crate::core::partition::hash::HashPartitioner;
use crate::core::partition::DynPartitioner;
use crate::Config;

/// Pick the partitioner for a join-like operation over `first` and `rest`.
///
/// The widest input wins: if any input, largest first, already carries a
/// partitioner with at least one bucket, it is reused and that side of the
/// join avoids a reshuffle. Otherwise keys are hashed into
/// `default_parallelism` buckets when configured, else into as many buckets
/// as the widest input has partitions.
pub fn default_partitioner<K: Data + Hash>(
    config: &Config,
    first: &dyn Dataset<K>,
    rest: &[&dyn Dataset<K>],
) -> Arc<dyn DynPartitioner<K>> {
    let mut inputs: Vec<&dyn Dataset<K>> = Vec::with_capacity(rest.len() + 1);
    inputs.push(first);
    inputs.extend_from_slice(rest);
    inputs.sort_by_key(|input| Reverse(input.partitions_num()));

    for input in &inputs {
        if let Some(existing) = input.partitioner() {
            if existing.partitions_num() > 0 {
                return existing;
            }
        }
    }

    let buckets = config
        .default_parallelism
        .unwrap_or_else(|| inputs[0].partitions_num());
    debug!("no reusable partitioner, hashing into {buckets} buckets");
    Arc::new(HashPartitioner::new(buckets))
}
