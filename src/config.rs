//! Fork-join configuration
//!
//! Controls where the recursive passes stop forking. A node at depth `d`
//! forks its right subtree onto the rayon pool iff `d <= depth_threshold`;
//! everything deeper runs sequentially on the calling thread.

use crate::HeapError;

/// Environment variable overriding the depth threshold (negative = sequential)
pub const DEPTH_THRESHOLD_ENV: &str = "SUMHEAP_DEPTH_THRESHOLD";
/// Environment variable requesting a dedicated pool of this many threads
pub const THREADS_ENV: &str = "SUMHEAP_THREADS";

/// Configuration parameters for the reduction and scan passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForkJoinConfig {
    /// Deepest tree level that still forks (`None` = fully sequential)
    pub depth_threshold: Option<u32>,

    /// Size of a dedicated thread pool (`None` = global rayon pool)
    pub num_threads: Option<usize>,
}

impl ForkJoinConfig {
    /// Never fork
    pub fn sequential() -> Self {
        Self {
            depth_threshold: None,
            num_threads: None,
        }
    }

    /// Fork at every node down to `depth` inclusive
    pub fn with_depth_threshold(depth: u32) -> Self {
        Self {
            depth_threshold: Some(depth),
            num_threads: None,
        }
    }

    /// Threshold tuned for `threads` workers: `⌈log2 threads⌉`
    ///
    /// Forking through that depth yields at least one leaf task per worker.
    /// A single worker gets no forks at all.
    pub fn tuned_for(threads: usize) -> Self {
        let depth_threshold = match threads {
            0 | 1 => None,
            n => Some(n.next_power_of_two().trailing_zeros()),
        };
        Self {
            depth_threshold,
            num_threads: None,
        }
    }

    /// Dedicated pool of `threads` workers with a matching threshold
    pub fn for_threads(threads: usize) -> Self {
        Self::tuned_for(threads).with_num_threads(threads)
    }

    /// Set depth threshold (`None` = sequential)
    pub fn with_threshold(mut self, depth_threshold: Option<u32>) -> Self {
        self.depth_threshold = depth_threshold;
        self
    }

    /// Run passes on a dedicated pool of `threads` workers
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Default configuration overridden by `SUMHEAP_*` environment variables
    pub fn from_env() -> Result<Self, HeapError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, HeapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEPTH_THRESHOLD_ENV) {
            let depth: i64 = raw.trim().parse().map_err(|_| {
                HeapError::InvalidConfiguration(format!(
                    "{} must be an integer, got {:?}",
                    DEPTH_THRESHOLD_ENV, raw
                ))
            })?;
            config.depth_threshold = if depth < 0 {
                None
            } else {
                Some(u32::try_from(depth).unwrap_or(u32::MAX))
            };
        }

        if let Some(raw) = lookup(THREADS_ENV) {
            let threads: usize = raw.trim().parse().map_err(|_| {
                HeapError::InvalidConfiguration(format!(
                    "{} must be a positive integer, got {:?}",
                    THREADS_ENV, raw
                ))
            })?;
            config.num_threads = Some(threads);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<(), HeapError> {
        if self.num_threads == Some(0) {
            return Err(HeapError::InvalidConfiguration(
                "thread pool size must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a node at `depth` forks
    #[inline]
    pub fn should_fork(&self, depth: u32) -> bool {
        matches!(self.depth_threshold, Some(threshold) if depth <= threshold)
    }

    /// Upper bound on forks for a tree of the given height
    ///
    /// Every interior node at depth `<= threshold` forks exactly once.
    pub fn max_forks(&self, height: u32) -> usize {
        match self.depth_threshold {
            None => 0,
            Some(threshold) => {
                let levels = threshold.saturating_add(1).min(height);
                (1usize << levels) - 1
            }
        }
    }

    /// Build the dedicated pool, if one was requested
    pub(crate) fn build_pool(&self) -> Result<Option<rayon::ThreadPool>, HeapError> {
        self.validate()?;
        match self.num_threads {
            None => Ok(None),
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|idx| format!("sumheap-{}", idx))
                    .build()?;
                Ok(Some(pool))
            }
        }
    }
}

impl Default for ForkJoinConfig {
    /// Tuned for the current rayon pool
    fn default() -> Self {
        Self::tuned_for(rayon::current_num_threads())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_tuned_threshold() {
        assert_eq!(ForkJoinConfig::tuned_for(1).depth_threshold, None);
        assert_eq!(ForkJoinConfig::tuned_for(2).depth_threshold, Some(1));
        assert_eq!(ForkJoinConfig::tuned_for(8).depth_threshold, Some(3));
        assert_eq!(ForkJoinConfig::tuned_for(12).depth_threshold, Some(4));
    }

    #[test]
    fn test_should_fork() {
        let config = ForkJoinConfig::with_depth_threshold(2);
        assert!(config.should_fork(0));
        assert!(config.should_fork(2));
        assert!(!config.should_fork(3));
        assert!(!ForkJoinConfig::sequential().should_fork(0));
    }

    #[test]
    fn test_max_forks() {
        assert_eq!(ForkJoinConfig::sequential().max_forks(10), 0);
        assert_eq!(ForkJoinConfig::with_depth_threshold(0).max_forks(10), 1);
        assert_eq!(ForkJoinConfig::with_depth_threshold(2).max_forks(10), 7);
        // Capped by the number of interior levels
        assert_eq!(ForkJoinConfig::with_depth_threshold(u32::MAX).max_forks(3), 7);
        assert_eq!(ForkJoinConfig::with_depth_threshold(5).max_forks(0), 0);
    }

    #[test]
    fn test_env_overrides() {
        let config =
            ForkJoinConfig::from_lookup(lookup_from(&[(DEPTH_THRESHOLD_ENV, "4"), (THREADS_ENV, "3")]))
                .unwrap();
        assert_eq!(config.depth_threshold, Some(4));
        assert_eq!(config.num_threads, Some(3));

        let config = ForkJoinConfig::from_lookup(lookup_from(&[(DEPTH_THRESHOLD_ENV, "-1")])).unwrap();
        assert_eq!(config.depth_threshold, None);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = ForkJoinConfig::from_lookup(lookup_from(&[(DEPTH_THRESHOLD_ENV, "deep")]));
        assert!(matches!(err, Err(HeapError::InvalidConfiguration(_))));

        let err = ForkJoinConfig::from_lookup(lookup_from(&[(THREADS_ENV, "0")]));
        assert!(matches!(err, Err(HeapError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_dedicated_pool() {
        let pool = ForkJoinConfig::for_threads(2).build_pool().unwrap();
        assert_eq!(pool.map(|p| p.current_num_threads()), Some(2));
        assert!(ForkJoinConfig::sequential().build_pool().unwrap().is_none());
    }
}
