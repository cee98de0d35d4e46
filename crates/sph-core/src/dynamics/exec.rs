//! Data-parallel loops over particle indices.
//!
//! Every stage of the pipeline funnels through these functions. Results
//! are gathered in index order, so the end of a call is the barrier between
//! one stage and the next.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate `f(i)` for every particle index and collect in index order.
pub fn particle_map<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..count).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).collect()
    }
}

/// Reduce `f(i)` over all particle indices with `merge`.
///
/// `identity` may be merged in any number of times, so it must be neutral for
/// `merge` (0 for sums, a lower bound for maxima).
pub fn particle_reduce<T, F, M>(count: usize, identity: T, f: F, merge: M) -> T
where
    T: Copy + Send + Sync,
    F: Fn(usize) -> T + Sync + Send,
    M: Fn(T, T) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..count)
            .into_par_iter()
            .map(f)
            .reduce(|| identity, merge)
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..count).map(f).fold(identity, merge)
    }
}

/// Lowest particle index for which `f` returns `Some`, with that value.
pub fn particle_find_first<T, F>(count: usize, f: F) -> Option<(usize, T)>
where
    T: Send,
    F: Fn(usize) -> Option<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..count)
            .into_par_iter()
            .find_map_first(|i| f(i).map(|value| (i, value)))
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..count).find_map(|i| f(i).map(|value| (i, value)))
    }
}
