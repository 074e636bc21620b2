//! Phase hooks: callbacks run when the session leaves or enters a phase.

use std::sync::Arc;

use tracing::trace;

use super::GamePhase;

/// Callback attached to phase transitions.
///
/// On every accepted transition the registry runs `on_exit` for the phase
/// being left, then `on_enter` for the phase being entered. Hooks are
/// synchronous and must not block; they run on the session worker.
pub trait PhaseHook: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// Lower values run first. Defaults to `0`.
    fn priority(&self) -> i32 {
        0
    }

    fn on_exit(&self, _phase: GamePhase, _next: GamePhase) {}

    fn on_enter(&self, _phase: GamePhase, _previous: GamePhase) {}
}

/// Priority-ordered set of [`PhaseHook`]s.
#[derive(Clone, Default)]
pub struct PhaseHookRegistry {
    hooks: Arc<[Arc<dyn PhaseHook>]>,
}

impl PhaseHookRegistry {
    /// Creates a registry. Hooks are sorted by priority; equal priorities keep
    /// registration order.
    pub fn new(mut hooks: Vec<Arc<dyn PhaseHook>>) -> Self {
        hooks.sort_by_key(|hook| hook.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn run_exit(&self, phase: GamePhase, next: GamePhase) {
        for hook in self.hooks.iter() {
            trace!(target: "runtime::phase", hook = hook.name(), %phase, "on_exit");
            hook.on_exit(phase, next);
        }
    }

    pub(crate) fn run_enter(&self, phase: GamePhase, previous: GamePhase) {
        for hook in self.hooks.iter() {
            trace!(target: "runtime::phase", hook = hook.name(), %phase, "on_enter");
            hook.on_enter(phase, previous);
        }
    }
}
