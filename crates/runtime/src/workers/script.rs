//! Worker that owns one compiled behavior script.
//!
//! Compiled scripts hold single-threaded interpreter state, so each worker
//! lives on a dedicated OS thread and talks to the host only through its
//! request and reply channels. Requests are answered strictly in arrival
//! order.

use std::io;
use std::thread;

use arena_core::{ActorSnapshot, ScriptSlot};
use arena_script::{CompileOptions, CompiledScript, compile};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::protocol::{Reply, WorkerRequest, WorkerResponse};

/// Interpreter recursion is bounded by the parser nesting cap and the call
/// depth limit; this stack covers both with room to spare.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Channel ends and settings for one worker thread. Everything here is
/// `Send`; the compiled script itself is created on the worker thread.
pub struct ScriptWorker {
    slot: ScriptSlot,
    generation: u64,
    options: CompileOptions,
    request_rx: mpsc::Receiver<WorkerRequest>,
    reply_tx: mpsc::UnboundedSender<Reply>,
}

impl ScriptWorker {
    pub fn new(
        slot: ScriptSlot,
        generation: u64,
        options: CompileOptions,
        request_rx: mpsc::Receiver<WorkerRequest>,
        reply_tx: mpsc::UnboundedSender<Reply>,
    ) -> Self {
        Self {
            slot,
            generation,
            options,
            request_rx,
            reply_tx,
        }
    }

    /// Starts the worker thread. The thread exits once the host drops its
    /// request sender or its reply receiver.
    pub fn spawn(self) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("script-{}-{}", self.slot.id(), self.generation))
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || self.run())
    }

    fn run(mut self) {
        debug!(slot = %self.slot, generation = self.generation, "script worker started");

        // Never leaves this thread.
        let mut script: Option<CompiledScript> = None;

        while let Some(request) = self.request_rx.blocking_recv() {
            let response = self.handle_request(&mut script, request);
            let reply = Reply {
                generation: self.generation,
                response,
            };
            if self.reply_tx.send(reply).is_err() {
                debug!(
                    slot = %self.slot,
                    generation = self.generation,
                    "script worker reply channel closed (host terminated channel)"
                );
                break;
            }
        }

        debug!(slot = %self.slot, generation = self.generation, "script worker stopped");
    }

    fn handle_request(
        &self,
        script: &mut Option<CompiledScript>,
        request: WorkerRequest,
    ) -> WorkerResponse {
        match request {
            WorkerRequest::Compile { source } => self.handle_compile(script, &source),
            WorkerRequest::Execute { me, opponent } => {
                self.handle_execute(script.as_mut(), &me, &opponent)
            }
        }
    }

    fn handle_compile(&self, script: &mut Option<CompiledScript>, source: &str) -> WorkerResponse {
        *script = None;
        match compile(source, &self.options) {
            Ok(compiled) => {
                *script = Some(compiled);
                WorkerResponse::Compiled {
                    success: true,
                    error: None,
                }
            }
            Err(err) => {
                debug!(slot = %self.slot, error = %err, "script compilation failed");
                WorkerResponse::Compiled {
                    success: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn handle_execute(
        &self,
        script: Option<&mut CompiledScript>,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
    ) -> WorkerResponse {
        let Some(script) = script else {
            return WorkerResponse::Result {
                success: false,
                action: None,
                error: Some("script is not compiled".to_owned()),
            };
        };

        let invocation = script.decide(me, opponent);
        trace!(slot = %self.slot, decision = ?invocation.decision, "decision computed");

        // A failed call still answers with the neutral decision it substituted.
        WorkerResponse::Result {
            success: invocation.error.is_none(),
            action: Some(invocation.decision),
            error: invocation.error.map(|err| err.to_string()),
        }
    }
}
