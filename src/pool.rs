use rayon::{ThreadPool, ThreadPoolBuilder};
use crate::errors::PoolError;

/// Builds a worker pool with the given number of threads
///
/// # Arguments
///
/// * 'name' - prefix for the thread names
/// * 'workers' - number of threads, at least one is always used
pub fn worker_pool(name: &'static str, workers: usize) -> Result<ThreadPool, PoolError> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(move |i| format!("{}-{}", name, i))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_still_gives_one_thread() {
        assert_eq!(worker_pool("test", 0).unwrap().current_num_threads(), 1);
        assert_eq!(worker_pool("test", 3).unwrap().current_num_threads(), 3);
    }
}
