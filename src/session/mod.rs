//! Execution session for a report run.
//!
//! A [`Session`] owns the worker pool every parallel step runs on. It is
//! created once at the start of a run and released when dropped, so teardown
//! happens on the error path as well as on success.

use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::TrendsConfig;
use crate::error::{Error, Result};

/// Scoped execution context backed by a rayon thread pool
#[derive(Debug)]
pub struct Session {
    name: String,
    pool: ThreadPool,
    started: Instant,
}

impl Session {
    /// Start a session sized from `config`
    pub fn start(name: &str, config: &TrendsConfig) -> Result<Self> {
        let threads = config.effective_worker_threads();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name({
                let name = name.to_string();
                move |i| format!("{name}-worker-{i}")
            })
            .build()
            .map_err(|e| Error::Session(format!("failed to build worker pool: {e}")))?;

        log::info!("Started session '{name}' with {threads} worker threads");

        Ok(Self {
            name: name.to_string(),
            pool,
            started: Instant::now(),
        })
    }

    /// Run `op` inside the session's worker pool
    ///
    /// Parallel iterators used by `op` execute on this pool.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        log::info!(
            "Stopped session '{}' after {:?}",
            self.name,
            self.started.elapsed()
        );
    }
}
