//! Bounded rayon execution for the `parallelism` option.

use crate::core::{RegressionError, ALL_CORES};

/// Run `op` with the requested degree of parallelism.
///
/// `-1` runs on rayon's global pool, any other value on a dedicated pool of
/// that many threads. Results never depend on the thread count.
pub fn install<T, F>(parallelism: i32, op: F) -> Result<T, RegressionError>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    if parallelism == ALL_CORES {
        return Ok(op());
    }

    let threads = usize::try_from(parallelism.max(1)).unwrap_or(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| RegressionError::NumericalError(format!("thread pool: {e}")))?;

    Ok(pool.install(op))
}
