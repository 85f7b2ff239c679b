use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use futures_util::future::{BoxFuture, FutureExt};

type Job = BoxFuture<'static, ()>;
type Notifier = Arc<dyn Fn() + Send + Sync>;

pub struct TaskQueue {
    jobs: Sender<Job>,
    notify: Notifier,
}

impl TaskQueue {
    /// `notify` runs on the worker after each result has been delivered,
    /// typically to wake the UI.
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> anyhow::Result<Self> {
        let (jobs, rx) = crossbeam_channel::unbounded::<Job>();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        thread::Builder::new()
            .name("task-queue".to_string())
            .spawn(move || {
                tracing::debug!("task queue worker started");
                while let Ok(job) = rx.recv() {
                    rt.block_on(job);
                }
                tracing::debug!("task queue worker stopped");
            })?;
        Ok(Self {
            jobs,
            notify: Arc::new(notify),
        })
    }

    /// Queues `work`. A failure comes back as the error's `Display` text;
    /// `label` only names the item in logs.
    pub fn submit<T, E, F>(&self, label: &'static str, work: F) -> Pending<T>
    where
        T: Send + 'static,
        E: Display,
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let notify = Arc::clone(&self.notify);
        let job = async move {
            tracing::info!(label, "work item started");
            let outcome = work.await.map_err(|e| {
                let msg = e.to_string();
                tracing::warn!(label, "work item failed: {msg}");
                msg
            });
            if outcome.is_ok() {
                tracing::info!(label, "work item finished");
            }
            let _ = done_tx.send(outcome);
            notify();
        }
        .boxed();

        if self.jobs.send(job).is_err() {
            tracing::error!(label, "task queue worker is gone; dropping work item");
        }
        Pending {
            rx: done_rx,
            label,
        }
    }
}

/// Receiving end of one submitted work item.
pub struct Pending<T> {
    rx: Receiver<Result<T, String>>,
    label: &'static str,
}

impl<T> Pending<T> {
    fn lost(&self) -> String {
        format!("Error during {}: background worker stopped", self.label)
    }

    /// Non-blocking; `None` while the item is queued or running.
    pub fn try_take(&self) -> Option<Result<T, String>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.lost())),
        }
    }

    pub fn wait(self) -> Result<T, String> {
        match self.rx.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(self.lost()),
        }
    }
}
