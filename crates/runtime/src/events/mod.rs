//! Topic-based event routing.
//!
//! Events are split by topic so presentation layers can subscribe to phase
//! changes, round results or server errors independently.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{PhaseEvent, RoundEvent, ServerEvent};
