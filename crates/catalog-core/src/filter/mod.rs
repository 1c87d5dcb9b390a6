//! Filter state and the pure filter engine.

mod engine;
mod state;

pub use engine::{FilterEngine, filter};
pub use state::{FacetSelection, FilterState, NumericRange};
