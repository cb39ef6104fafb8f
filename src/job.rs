//! Background job supervision
//!
//! A [`Job`] wraps one asynchronous unit of work as an observable,
//! cancellable entity. While the work runs on the tokio pool, any other task
//! can inspect the job's [`JobState`], status message, and `has_more_data`
//! flag, or abort it with [`Job::stop`]. The work itself runs outside the
//! job's lock, so long-running I/O never blocks status inspection.
//!
//! Two independently owned cancellation sources compose per run: the job's
//! internal stop token (settable only through [`Job::stop`]) and an external
//! token supplied to [`Job::run`]. They are combined with an OR at the point
//! of use and never collapsed into one handle.
//!
//! # Example
//!
//! ```no_run
//! use kaspa_rest_client::job::{Job, JobState};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let job = Arc::new(Job::new("fetch-transactions", |cancel| async move {
//!     // ... perform cancellable work with `cancel` ...
//!     Ok(42u64)
//! }));
//!
//! let handle = job.spawn(CancellationToken::new());
//!
//! // Poll observable state from any task
//! while job.has_more_data() {
//!     tokio::time::sleep(std::time::Duration::from_millis(100)).await;
//! }
//! assert_eq!(job.state(), JobState::Completed);
//! # handle.await.ok();
//! # }
//! ```

use crate::error::{Error, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle state of a background job
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Created but not yet run
    NotStarted,
    /// The unit of work is executing
    Running,
    /// The unit of work returned a result
    Completed,
    /// The unit of work returned an error or panicked
    Failed,
    /// The job was stopped or canceled
    Stopped,
}

impl JobState {
    /// Returns true for states from which no further transition is permitted
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Stopped
        )
    }
}

/// One entry in a job's record stream
#[derive(Debug)]
pub enum JobRecord<T> {
    /// The result produced by a completed unit of work
    Output(T),
    /// Informational message, e.g. a cancellation notice
    Notice(String),
    /// The error produced by a failed unit of work
    Error(Error),
}

type JobWork<T> = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, Result<T>> + Send>;

/// Mutable job fields, updated atomically as one group under the job's lock.
struct JobFields {
    state: JobState,
    status_message: String,
    has_more_data: bool,
}

/// An observable, cancellable wrapper around one asynchronous unit of work
///
/// See the [module documentation](self) for the lifecycle and cancellation
/// model.
pub struct Job<T> {
    name: String,
    fields: Mutex<JobFields>,
    stop_token: CancellationToken,
    work: Mutex<Option<JobWork<T>>>,
    records_tx: Mutex<Option<mpsc::UnboundedSender<JobRecord<T>>>>,
    records_rx: Mutex<Option<mpsc::UnboundedReceiver<JobRecord<T>>>>,
}

/// Recovers the guard from a poisoned lock; the field group stays usable
/// because every writer leaves it consistent before unwinding.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Send + 'static> Job<T> {
    /// Creates a job wrapping the given unit of work
    ///
    /// The work receives a cancellation token linked to both the job's stop
    /// token and the external token later passed to [`Job::run`]; it is
    /// expected to return [`Error::Canceled`] when that token fires.
    pub fn new<F, Fut>(name: impl Into<String>, work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name: name.into(),
            fields: Mutex::new(JobFields {
                state: JobState::NotStarted,
                status_message: "Job is initialized.".to_string(),
                has_more_data: true,
            }),
            stop_token: CancellationToken::new(),
            work: Mutex::new(Some(Box::new(move |token| work(token).boxed()))),
            records_tx: Mutex::new(Some(tx)),
            records_rx: Mutex::new(Some(rx)),
        }
    }

    /// Display name of the job
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state
    pub fn state(&self) -> JobState {
        lock(&self.fields).state
    }

    /// Human-readable status message
    pub fn status_message(&self) -> String {
        lock(&self.fields).status_message.clone()
    }

    /// True until the job reaches a terminal state
    pub fn has_more_data(&self) -> bool {
        lock(&self.fields).has_more_data
    }

    /// Takes the receiving end of the job's record stream
    ///
    /// Can be taken once; the stream ends (recv returns `None`) when the job
    /// reaches a terminal state.
    pub fn take_records(&self) -> Option<mpsc::UnboundedReceiver<JobRecord<T>>> {
        lock(&self.records_rx).take()
    }

    /// Stops the job
    ///
    /// Valid from `NotStarted` and `Running`: cancels the internal stop
    /// token, flips `has_more_data` to false, and transitions to `Stopped`.
    /// Calling it from a terminal state is a no-op, so repeated calls are
    /// idempotent.
    pub fn stop(&self) {
        let mut fields = lock(&self.fields);
        if matches!(fields.state, JobState::NotStarted | JobState::Running) {
            tracing::debug!(job = %self.name, "stopping job");
            self.stop_token.cancel();
            fields.has_more_data = false;
            fields.status_message = "Job stopped.".to_string();
            fields.state = JobState::Stopped;
        }
    }

    /// Runs the unit of work to completion
    ///
    /// If either cancellation source already fired, the job transitions
    /// straight to `Stopped` and the work is never invoked. Otherwise the
    /// work runs with a token linked to both sources, and the job finishes in
    /// exactly one of `Completed`, `Failed`, or `Stopped`. In every branch
    /// `has_more_data` becomes false and the record stream is completed
    /// exactly once.
    pub async fn run(&self, external: CancellationToken) {
        let admitted = {
            let mut fields = lock(&self.fields);
            let pre_canceled = self.stop_token.is_cancelled() || external.is_cancelled();
            match (fields.state, pre_canceled) {
                (JobState::NotStarted | JobState::Stopped, true) => {
                    fields.has_more_data = false;
                    fields.status_message = "Job was canceled before it started.".to_string();
                    fields.state = JobState::Stopped;
                    false
                }
                (JobState::NotStarted, false) => {
                    fields.status_message = "Job is running.".to_string();
                    fields.state = JobState::Running;
                    true
                }
                // Already running or finished
                _ => return,
            }
        };

        if !admitted {
            tracing::debug!(job = %self.name, "job canceled before execution");
            self.push_record(JobRecord::Notice(
                "Job was canceled before execution.".to_string(),
            ));
            self.complete_records();
            return;
        }

        let Some(work) = lock(&self.work).take() else {
            self.finish(
                JobState::Failed,
                "Job failed: unit of work already consumed.",
                Some(JobRecord::Error(Error::Unhandled(
                    "unit of work already consumed".to_string(),
                ))),
            );
            return;
        };

        // OR-combine the two cancellation sources into the token handed to
        // the work; the watcher exits once the linked token fires.
        let linked = CancellationToken::new();
        let watcher = {
            let stop = self.stop_token.clone();
            let external = external.clone();
            let linked = linked.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = stop.cancelled() => linked.cancel(),
                    _ = external.cancelled() => linked.cancel(),
                    _ = linked.cancelled() => {}
                }
            })
        };

        tracing::debug!(job = %self.name, "job started");
        let outcome = AssertUnwindSafe(work(linked.clone())).catch_unwind().await;
        linked.cancel();
        drop(watcher);

        // stop() may have won the race while the work was finishing; the
        // stopped outcome takes precedence over whatever the work returned.
        if self.state() == JobState::Stopped {
            self.finish(
                JobState::Stopped,
                "Job was canceled.",
                Some(JobRecord::Notice("Job was canceled.".to_string())),
            );
            return;
        }

        match outcome {
            Ok(Ok(value)) => {
                tracing::debug!(job = %self.name, "job completed");
                self.finish(
                    JobState::Completed,
                    "Job is completed.",
                    Some(JobRecord::Output(value)),
                );
            }
            Ok(Err(err)) if err.is_canceled() => {
                tracing::debug!(job = %self.name, "job canceled");
                self.finish(
                    JobState::Stopped,
                    "Job was canceled.",
                    Some(JobRecord::Notice("Job was canceled.".to_string())),
                );
            }
            Ok(Err(err)) => {
                tracing::warn!(job = %self.name, error = %err, "job failed");
                self.finish(
                    JobState::Failed,
                    &format!("Job failed: {err}"),
                    Some(JobRecord::Error(err)),
                );
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(job = %self.name, error = %message, "job panicked");
                self.finish(
                    JobState::Failed,
                    &format!("Job failed: {message}"),
                    Some(JobRecord::Error(Error::Unhandled(message))),
                );
            }
        }
    }

    /// Spawns [`Job::run`] onto the tokio pool
    pub fn spawn(self: &Arc<Self>, external: CancellationToken) -> JoinHandle<()> {
        let job = Arc::clone(self);
        tokio::spawn(async move { job.run(external).await })
    }

    /// Applies a terminal state, emits the final record, and completes the
    /// record stream.
    fn finish(&self, state: JobState, status: &str, record: Option<JobRecord<T>>) {
        {
            let mut fields = lock(&self.fields);
            fields.has_more_data = false;
            fields.status_message = status.to_string();
            fields.state = state;
        }
        if let Some(record) = record {
            self.push_record(record);
        }
        self.complete_records();
    }

    fn push_record(&self, record: JobRecord<T>) {
        if let Some(tx) = lock(&self.records_tx).as_ref() {
            tx.send(record).ok();
        }
    }

    /// Dropping the sender ends the stream; `take` makes this happen once.
    fn complete_records(&self) {
        lock(&self.records_tx).take();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "job panicked".to_string()
    }
}
