use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::core::partition::DynPartitioner;
use crate::{Error, Result};

pub trait Data: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Data for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Stable identifier of a partitioned input; sampling seeds are derived from
/// it, so two inputs never share a seed stream.
#[derive(Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct DatasetId(pub u32);

impl DatasetId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> DatasetId {
        static COUNTER: AtomicU32 = AtomicU32::new(1);
        DatasetId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Iterator over the keys of one partition.
pub type KeyIter<'a, K> = Box<dyn Iterator<Item = K> + 'a>;

/// A partitioned collection of keys, as the partitioner sees it.
///
/// Reading a partition can fail (a real engine reads over the network); a
/// failed read aborts whatever pass is running.
pub trait Dataset<K: Data>: Send + Sync {
    fn id(&self) -> DatasetId;

    fn partitions_num(&self) -> usize;

    fn partition(&self, idx: usize) -> Result<KeyIter<'_, K>>;

    /// The partitioner this input was last shuffled by, if any.
    fn partitioner(&self) -> Option<Arc<dyn DynPartitioner<K>>> {
        None
    }
}

/// In-memory dataset, one `Vec` per partition.
#[derive(Clone)]
pub struct VecDataset<K> {
    id: DatasetId,
    data: Vec<Vec<K>>,
    partitioner: Option<Arc<dyn DynPartitioner<K>>>,
}

impl<K: Data> VecDataset<K> {
    pub fn new(data: Vec<Vec<K>>) -> Self {
        Self {
            id: DatasetId::new(),
            data,
            partitioner: None,
        }
    }

    /// Mark this dataset as already shuffled by `partitioner`.
    pub fn with_partitioner(mut self, partitioner: Arc<dyn DynPartitioner<K>>) -> Self {
        self.partitioner = Some(partitioner);
        self
    }
}

impl<K: Data> Dataset<K> for VecDataset<K> {
    fn id(&self) -> DatasetId {
        self.id
    }

    fn partitions_num(&self) -> usize {
        self.data.len()
    }

    fn partition(&self, idx: usize) -> Result<KeyIter<'_, K>> {
        let part = self.data.get(idx).ok_or_else(|| {
            Error::Upstream(format!(
                "partition {idx} out of range ({} partitions)",
                self.data.len()
            ))
        })?;
        Ok(Box::new(part.iter().cloned()))
    }

    fn partitioner(&self) -> Option<Arc<dyn DynPartitioner<K>>> {
        self.partitioner.clone()
    }
}

/// Lazy view over a chosen subset of a source dataset's partitions.
///
/// View partition `i` reads source partition `retained[i]`; no data is
/// copied or moved.
pub struct PrunedDataset<'a, K: Data> {
    source: &'a dyn Dataset<K>,
    retained: Vec<usize>,
}

impl<'a, K: Data> PrunedDataset<'a, K> {
    pub fn new<F>(source: &'a dyn Dataset<K>, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let retained = (0..source.partitions_num()).filter(|&i| keep(i)).collect();
        Self { source, retained }
    }

    /// Source partition index backing view partition `idx`.
    pub fn source_partition(&self, idx: usize) -> usize {
        self.retained[idx]
    }
}

impl<K: Data> Dataset<K> for PrunedDataset<'_, K> {
    fn id(&self) -> DatasetId {
        self.source.id()
    }

    fn partitions_num(&self) -> usize {
        self.retained.len()
    }

    fn partition(&self, idx: usize) -> Result<KeyIter<'_, K>> {
        let src = *self.retained.get(idx).ok_or_else(|| {
            Error::Upstream(format!(
                "pruned partition {idx} out of range ({} retained)",
                self.retained.len()
            ))
        })?;
        self.source.partition(src)
    }
}
