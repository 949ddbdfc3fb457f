use crate::core::dataset::Data;

/// A deterministic map from keys to bucket indices, plus the declared bucket
/// count. Partitioners are plain serializable values, so one computed on the
/// coordinator can be shipped to every worker of a shuffle and consulted
/// read-only from any number of threads.
pub trait Partitioner: Data {
    type Key: Data;

    fn partitions_num(&self) -> usize;

    fn partition_of(&self, key: &Self::Key) -> usize;
}

/// Object-safe face of [`Partitioner`], for carrying partitioners of mixed
/// concrete types behind one pointer. Serde stays on the sized trait;
/// lookups are all the erased form needs.
pub trait DynPartitioner<K>: Send + Sync {
    fn partitions_num(&self) -> usize;

    fn partition_of(&self, key: &K) -> usize;
}

impl<P: Partitioner> DynPartitioner<P::Key> for P {
    fn partitions_num(&self) -> usize {
        Partitioner::partitions_num(self)
    }

    fn partition_of(&self, key: &P::Key) -> usize {
        Partitioner::partition_of(self, key)
    }
}

pub mod hash;

pub mod range;

pub mod defaults;
