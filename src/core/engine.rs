use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use rand::distributions::{Bernoulli, Distribution};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::core::dataset::{Data, Dataset, KeyIter};
use crate::{Error, Result};

/// Run `f` over every partition of `input` and collect the results on the
/// caller, tagged and ordered by partition index.
///
/// Local stand-in for the execution engine's job-run primitive: partitions
/// are drained from a shared queue by at most `num_cpus` worker threads. The
/// first failed partition read fails the whole pass; nothing partial is
/// returned.
pub fn map_partitions_collect<K, R, F>(input: &dyn Dataset<K>, f: F) -> Result<Vec<(usize, R)>>
where
    K: Data,
    R: Send,
    F: Fn(usize, KeyIter<'_, K>) -> R + Send + Sync,
{
    let total = input.partitions_num();
    if total == 0 {
        return Ok(Vec::new());
    }

    let next = AtomicUsize::new(0);
    let workers = num_cpus::get().min(total);

    let mut collected = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| -> Result<Vec<(usize, R)>> {
                    let mut done = Vec::new();
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        if idx >= total {
                            return Ok(done);
                        }
                        let keys = input.partition(idx)?;
                        done.push((idx, f(idx, keys)));
                    }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("partition worker panicked"))
            .collect::<Result<Vec<_>>>()
    })?
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    collected.sort_by_key(|&(idx, _)| idx);
    Ok(collected)
}

/// Materialize a uniform Bernoulli sample of `input`.
///
/// Every key is kept independently with probability `fraction`. Each
/// partition draws from its own generator seeded `seed + partition index`,
/// so a given (input, fraction, seed) triple always realizes the same
/// sample.
pub fn bernoulli_sample<K: Data>(
    input: &dyn Dataset<K>,
    fraction: f64,
    seed: u32,
) -> Result<Vec<K>> {
    let gate = Bernoulli::new(fraction)
        .map_err(|_| Error::InvalidArgument(format!("sample fraction {fraction} not in [0, 1]")))?;

    let picked = map_partitions_collect(input, |idx, keys| {
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(idx as u32) as u64);
        keys.filter(|_| gate.sample(&mut rng)).collect::<Vec<_>>()
    })?;

    Ok(picked.into_iter().flat_map(|(_, keys)| keys).collect())
}
