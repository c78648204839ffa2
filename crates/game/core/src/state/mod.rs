//! Authoritative fight state and the read-only views derived from it.
//!
//! [`Actor`] is the only mutable record; scripts and other observers only
//! ever receive [`ActorSnapshot`] copies.

mod action;
mod actor;
mod decision;
mod geometry;
mod round;
mod snapshot;

pub use action::ActionState;
pub use actor::{Actor, ControlSource, Facing, ScriptSlot, Side};
pub use decision::Decision;
pub use geometry::Rect;
pub use round::{EndReason, RoundResult, RoundStatus, SessionStats};
pub use snapshot::ActorSnapshot;
