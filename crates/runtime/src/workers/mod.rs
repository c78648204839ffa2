//! Background workers for isolated script execution.
//!
//! Workers never touch fight state; they receive snapshot copies and reply
//! with decisions over channels.
mod protocol;
mod script;

pub use protocol::{Reply, WorkerRequest, WorkerResponse};
pub use script::ScriptWorker;
