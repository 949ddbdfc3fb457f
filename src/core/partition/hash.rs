use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Serialize};

use crate::core::dataset::Data;
use crate::core::partition::Partitioner;

/// Buckets by key hash, modulo the bucket count.
#[derive(Clone, Serialize, Deserialize)]
pub struct HashPartitioner<K> {
    partitions: usize,
    #[serde(skip)]
    _key: PhantomData<K>,
}

impl<K> HashPartitioner<K> {
    pub fn new(partitions: usize) -> Self {
        Self {
            // zero buckets would leave keys nowhere to go
            partitions: partitions.max(1),
            _key: PhantomData,
        }
    }
}

impl<K: Data + Hash> Partitioner for HashPartitioner<K> {
    type Key = K;

    fn partitions_num(&self) -> usize {
        self.partitions
    }

    fn partition_of(&self, key: &Self::Key) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish() as usize % self.partitions
    }
}
