//! Session orchestration for the War card game simulation.
//!
//! This crate puts the deterministic rules from `war-core` behind an
//! unreliable asynchronous server boundary and drives them with a retrying,
//! phase-tracking session. Consumers build a [`Session`], issue triggers
//! through [`SessionHandle`], and subscribe to events by [`Topic`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`server`] defines the boundary and its latency/fault simulation
//! - [`retry`] classifies failures and computes backoff
//! - [`phase`] holds the phase state machine and its hooks
//! - [`events`] provides topic-based event bus for flexible event routing
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod phase;
pub mod retry;
pub mod server;
pub mod session;

mod workers;

pub use api::{Result, RuntimeError, SessionHandle};
pub use config::{NetworkConfig, RetryConfig, SessionConfig};
pub use events::{Event, EventBus, PhaseEvent, RoundEvent, ServerEvent, Topic};
pub use phase::{GamePhase, PhaseHook, PhaseHookRegistry, PhaseMachine, Transition};
pub use retry::{RetryController, backoff_delay, backoff_delay_with_jitter, is_retryable};
pub use server::{GameServer, ServerFailure, ServerResponse, SimulatedServer};
pub use session::{Session, SessionBuilder};
