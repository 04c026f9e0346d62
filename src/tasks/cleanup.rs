//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! The sweeper holds a shared handle to the store and nothing else. Each tick it
//! takes the store lock and runs `cleanup_expired`. It waits on its tick timer and
//! on a one-shot stop signal in the same `select!`, so no tick fires after the
//! stop is observed. The stop sender lives in an `Option` and is consumed by the
//! first stop; later calls find nothing to send.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

#[derive(Debug)]
enum Worker {
    /// Spawned on the caller's tokio runtime
    Task(JoinHandle<()>),
    /// Dedicated thread driving its own current-thread runtime
    Thread(Option<thread::JoinHandle<()>>),
}

// == Sweeper ==
/// Handle to a running background sweeper. Dropping it stops the sweeper.
#[derive(Debug)]
pub struct Sweeper {
    interval: Duration,
    stop: Option<oneshot::Sender<()>>,
    worker: Worker,
}

impl Sweeper {
    /// Starts a sweeper that cleans `store` every `interval`.
    ///
    /// Inside a tokio runtime the sweeper is spawned as a task on it. Outside of
    /// one it gets a dedicated thread. A zero interval is rejected, as is failing
    /// to create that thread or its runtime.
    pub fn start(store: Arc<Mutex<CacheStore>>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweeper interval must be positive".to_string(),
            ));
        }
        let (stop_tx, stop_rx) = oneshot::channel();

        let worker = match Handle::try_current() {
            Ok(handle) => Worker::Task(handle.spawn(run(store, interval, stop_rx))),
            Err(_) => {
                let runtime = Builder::new_current_thread().enable_time().build()?;
                let thread = thread::Builder::new()
                    .name("local-cache-sweeper".to_string())
                    .spawn(move || runtime.block_on(run(store, interval, stop_rx)))?;
                Worker::Thread(Some(thread))
            }
        };

        info!(interval = ?interval, "background sweeper started");

        Ok(Self {
            interval,
            stop: Some(stop_tx),
            worker,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Stop ==
    /// Signals the sweeper to stop. Only the first call sends anything.
    ///
    /// A thread-backed sweeper is joined before returning. A task-backed sweeper
    /// exits the next time its runtime polls it.
    pub fn stop(&mut self) {
        let Some(stop) = self.stop.take() else {
            return;
        };
        // the task may already be gone with its runtime
        let _ = stop.send(());

        if let Worker::Thread(handle) = &mut self.worker {
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_none()
    }

    /// Reports whether the sweeper has terminated.
    pub fn is_finished(&self) -> bool {
        match &self.worker {
            Worker::Task(handle) => handle.is_finished(),
            Worker::Thread(handle) => handle.as_ref().map_or(true, |h| h.is_finished()),
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(store: Arc<Mutex<CacheStore>>, interval: Duration, mut stop: oneshot::Receiver<()>) {
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.lock().cleanup_expired();
                if removed > 0 {
                    info!("TTL sweep: removed {} expired entries", removed);
                } else {
                    debug!("TTL sweep: no expired entries found");
                }
            }
            // a dropped sender also ends the loop
            _ = &mut stop => break,
        }
    }

    info!("background sweeper stopped");
}
