//! Static arena content and data loaders.
//!
//! - Default behavior scripts, one per script slot
//! - Fight configuration (data-driven via TOML)
//!
//! Content is read once when a session starts and never appears in fight state.

pub mod templates;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use templates::{RANDOM_TEMPLATE, STRATEGIC_TEMPLATE, template_for};

#[cfg(feature = "loaders")]
pub use loaders::{ContentFactory, FightConfigLoader, LoadResult};
