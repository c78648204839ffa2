//! Host side of an isolation channel.
//!
//! [`IsolationRuntime`] binds one script slot to at most one live
//! [`ScriptWorker`]. The simulation never waits on it: a tick requests the
//! next decision with [`IsolationRuntime::request_decision`] and reads the
//! cached one with [`IsolationRuntime::current_decision`], so the decision in
//! use may lag the tick that asked for it.
//!
//! Both sides may be driven by the same slot. Each side keeps its own cached
//! decision, and the worker answers in request order, so every reply is
//! credited to the side whose request is oldest.
//!
//! Every worker carries a generation number. Recompiling terminates the old
//! channel before the new one exists, and replies stamped with any other
//! generation are dropped, so a superseded script can never write the cache.
mod error;

pub use error::IsolationError;

use std::collections::VecDeque;

use arena_core::{ActorSnapshot, Decision, ScriptSlot, Side};
use arena_script::CompileOptions;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::{debug, trace, warn};

use crate::workers::{Reply, ScriptWorker, WorkerRequest, WorkerResponse};

/// Default bound of the request queue feeding one worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Result of a compile attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl CompileOutcome {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

struct Channel {
    requests: mpsc::Sender<WorkerRequest>,
    replies: mpsc::UnboundedReceiver<Reply>,
    /// Sides whose execute requests are sent and not yet answered, oldest
    /// first.
    pending: VecDeque<Side>,
}

pub struct IsolationRuntime {
    slot: ScriptSlot,
    options: CompileOptions,
    queue_capacity: usize,
    generation: u64,
    channel: Option<Channel>,
    ready: bool,
    /// Indexed by [`side_index`].
    cached: [Decision; 2],
    last_error: Option<String>,
}

impl IsolationRuntime {
    pub fn new(slot: ScriptSlot, options: CompileOptions) -> Self {
        Self::with_capacity(slot, options, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(slot: ScriptSlot, options: CompileOptions, queue_capacity: usize) -> Self {
        Self {
            slot,
            options,
            queue_capacity: queue_capacity.max(1),
            generation: 0,
            channel: None,
            ready: false,
            cached: [Decision::NEUTRAL; 2],
            last_error: None,
        }
    }

    pub fn slot(&self) -> ScriptSlot {
        self.slot
    }

    /// Generation of the current (or most recent) worker.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Compiles `source` into a fresh worker.
    ///
    /// Sources with a loop that can never exit are rejected on the host and
    /// leave the live channel untouched. Anything else terminates the current
    /// channel first, then spawns a new worker and waits for its
    /// acknowledgement.
    pub async fn compile(&mut self, source: &str) -> CompileOutcome {
        if let Some(diagnostic) = arena_script::analyze(source).diagnostic() {
            warn!(slot = %self.slot, "script rejected by safety analysis");
            self.last_error = Some(diagnostic.clone());
            return CompileOutcome::failed(diagnostic);
        }

        self.terminate();
        self.generation += 1;

        let outcome = match self.establish(source).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "script worker setup failed");
                CompileOutcome::failed(err.to_string())
            }
        };

        self.ready = outcome.success;
        self.last_error = outcome.error.clone();
        if outcome.success {
            debug!(slot = %self.slot, generation = self.generation, "script channel ready");
        }
        outcome
    }

    async fn establish(&mut self, source: &str) -> Result<CompileOutcome, IsolationError> {
        let (request_tx, request_rx) = mpsc::channel(self.queue_capacity);
        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();

        ScriptWorker::new(
            self.slot,
            self.generation,
            self.options,
            request_rx,
            reply_tx,
        )
        .spawn()
        .map_err(IsolationError::Setup)?;

        request_tx
            .send(WorkerRequest::Compile {
                source: source.to_owned(),
            })
            .await
            .map_err(|_| IsolationError::ChannelClosed)?;

        let outcome = loop {
            let reply = reply_rx.recv().await.ok_or(IsolationError::ChannelClosed)?;
            if let WorkerResponse::Compiled { success, error } = reply.response {
                break CompileOutcome { success, error };
            }
        };

        // A worker without a script only answers with failures; let it go.
        if outcome.success {
            self.channel = Some(Channel {
                requests: request_tx,
                replies: reply_rx,
                pending: VecDeque::new(),
            });
        }
        Ok(outcome)
    }

    /// Queues a decision request for `side` without waiting.
    ///
    /// When the queue is full the request is dropped; the side's cached
    /// decision stays in use until the worker catches up.
    pub fn request_decision(
        &mut self,
        side: Side,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
    ) {
        if !self.ready {
            return;
        }
        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        let request = WorkerRequest::Execute {
            me: *me,
            opponent: *opponent,
        };
        match channel.requests.try_send(request) {
            Ok(()) => channel.pending.push_back(side),
            Err(TrySendError::Full(_)) => {
                trace!(slot = %self.slot, "script request queue full, request dropped");
            }
            Err(TrySendError::Closed(_)) => self.lose_worker(),
        }
    }

    /// Applies every reply that has arrived and returns `side`'s cached
    /// decision.
    pub fn current_decision(&mut self, side: Side) -> Decision {
        loop {
            let Some(channel) = self.channel.as_mut() else {
                break;
            };
            match channel.replies.try_recv() {
                Ok(reply) => self.accept(reply),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.lose_worker();
                    break;
                }
            }
        }

        if self.ready {
            self.cached[side_index(side)]
        } else {
            Decision::NEUTRAL
        }
    }

    /// Waits until every queued request has been answered.
    pub async fn settle(&mut self) {
        loop {
            let Some(channel) = self.channel.as_mut() else {
                return;
            };
            if channel.pending.is_empty() {
                return;
            }
            match channel.replies.recv().await {
                Some(reply) => self.accept(reply),
                None => {
                    self.lose_worker();
                    return;
                }
            }
        }
    }

    fn accept(&mut self, reply: Reply) {
        if reply.generation != self.generation {
            trace!(
                slot = %self.slot,
                stale = reply.generation,
                current = self.generation,
                "discarding reply from superseded script"
            );
            return;
        }

        match reply.response {
            WorkerResponse::Result { action, error, .. } => {
                let side = self
                    .channel
                    .as_mut()
                    .and_then(|channel| channel.pending.pop_front());
                if let (Some(side), Some(action)) = (side, action) {
                    self.cached[side_index(side)] = action;
                }
                if let Some(error) = error {
                    self.last_error = Some(error);
                }
            }
            WorkerResponse::Compiled { .. } => {
                debug!(slot = %self.slot, "unexpected compile acknowledgement ignored");
            }
        }
    }

    fn lose_worker(&mut self) {
        warn!(slot = %self.slot, generation = self.generation, "script worker stopped unexpectedly");
        self.channel = None;
        self.ready = false;
        self.cached = [Decision::NEUTRAL; 2];
        self.last_error = Some(IsolationError::ChannelClosed.to_string());
    }

    /// Shuts the current worker down, discarding queued requests and any
    /// reply still in transit.
    pub fn terminate(&mut self) {
        if self.channel.take().is_some() {
            debug!(slot = %self.slot, generation = self.generation, "script channel terminated");
        }
        self.ready = false;
        self.cached = [Decision::NEUTRAL; 2];
    }

    pub fn is_ready(&self) -> bool {
        self.ready && self.channel.is_some()
    }

    /// Most recent compile or runtime error message.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::First => 0,
        Side::Second => 1,
    }
}

impl std::fmt::Debug for IsolationRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolationRuntime")
            .field("slot", &self.slot)
            .field("generation", &self.generation)
            .field("ready", &self.ready)
            .field("cached", &self.cached)
            .finish_non_exhaustive()
    }
}
