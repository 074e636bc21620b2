//! Game phase state machine.
//!
//! [`GamePhase::can_transition_to`] is the transition table. [`PhaseMachine`]
//! applies it: rejected moves are logged and returned as
//! [`RuntimeError::InvalidTransition`], re-entering the current phase is a
//! no-op, and accepted moves run exit hooks, enter hooks and then publish a
//! [`PhaseEvent::Changed`].
mod hooks;

pub use hooks::{PhaseHook, PhaseHookRegistry};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, PhaseEvent};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    Initializing,
    Playing,
    War,
    RoundComplete,
    GameOver,
    Paused,
}

impl GamePhase {
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;

        matches!(
            (self, next),
            (Idle, Initializing)
                | (Initializing, Playing)
                | (Initializing, Idle)
                | (Playing, War)
                | (Playing, RoundComplete)
                | (Playing, GameOver)
                | (Playing, Paused)
                | (Playing, Idle)
                | (War, Playing)
                | (War, GameOver)
                | (RoundComplete, Playing)
                | (RoundComplete, GameOver)
                | (Paused, Playing)
                | (GameOver, Idle)
        )
    }
}

/// Outcome of [`PhaseMachine::transition_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Changed { from: GamePhase, to: GamePhase },
    Unchanged(GamePhase),
}

/// Current phase plus the side effects of changing it.
pub struct PhaseMachine {
    current: GamePhase,
    hooks: PhaseHookRegistry,
    event_bus: EventBus,
    phase_tx: watch::Sender<GamePhase>,
}

impl PhaseMachine {
    pub fn new(hooks: PhaseHookRegistry, event_bus: EventBus) -> Self {
        let (phase_tx, _) = watch::channel(GamePhase::Idle);
        Self {
            current: GamePhase::Idle,
            hooks,
            event_bus,
            phase_tx,
        }
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    /// Receiver that always holds the latest phase.
    pub fn watch(&self) -> watch::Receiver<GamePhase> {
        self.phase_tx.subscribe()
    }

    pub fn transition_to(&mut self, next: GamePhase) -> Result<Transition> {
        let previous = self.current;

        if previous == next {
            debug!(target: "runtime::phase", phase = %next, "Already in phase");
            return Ok(Transition::Unchanged(next));
        }

        if !previous.can_transition_to(next) {
            warn!(target: "runtime::phase", from = %previous, to = %next, "Rejected phase transition");
            return Err(RuntimeError::InvalidTransition {
                from: previous,
                to: next,
            });
        }

        self.hooks.run_exit(previous, next);
        self.current = next;
        self.hooks.run_enter(next, previous);
        self.phase_tx.send_replace(next);

        info!(target: "runtime::phase", from = %previous, to = %next, "Phase changed");
        self.event_bus
            .publish(Event::Phase(PhaseEvent::Changed { new: next, previous }));

        Ok(Transition::Changed {
            from: previous,
            to: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use strum::IntoEnumIterator;

    use super::*;
    use crate::events::Topic;

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl PhaseHook for Journal {
        fn name(&self) -> &'static str {
            "journal"
        }

        fn on_exit(&self, phase: GamePhase, next: GamePhase) {
            self.entries
                .lock()
                .unwrap()
                .push(format!("exit {phase} -> {next}"));
        }

        fn on_enter(&self, phase: GamePhase, previous: GamePhase) {
            self.entries
                .lock()
                .unwrap()
                .push(format!("enter {phase} <- {previous}"));
        }
    }

    fn machine_with_journal() -> (PhaseMachine, Arc<Journal>, EventBus) {
        let journal = Arc::new(Journal::default());
        let bus = EventBus::new();
        let hooks = PhaseHookRegistry::new(vec![journal.clone() as Arc<dyn PhaseHook>]);
        (PhaseMachine::new(hooks, bus.clone()), journal, bus)
    }

    #[test]
    fn displays_snake_case() {
        assert_eq!(GamePhase::RoundComplete.to_string(), "round_complete");
        assert_eq!(GamePhase::GameOver.to_string(), "game_over");
    }

    #[test]
    fn transition_table_matches_game_flow() {
        use GamePhase::*;

        let allowed: Vec<_> = GamePhase::iter()
            .flat_map(|from| GamePhase::iter().map(move |to| (from, to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(allowed.len(), 14);
        assert!(Idle.can_transition_to(Initializing));
        assert!(Paused.can_transition_to(Playing));
        assert!(!Idle.can_transition_to(Playing));
        assert!(!Paused.can_transition_to(Idle));
        assert!(!GameOver.can_transition_to(Playing));
        assert!(!War.can_transition_to(War));
    }

    #[test]
    fn exit_runs_before_enter_and_event_follows() {
        let (mut machine, journal, bus) = machine_with_journal();
        let mut rx = bus.subscribe(Topic::Phase);

        let transition = machine.transition_to(GamePhase::Initializing).unwrap();

        assert_eq!(
            transition,
            Transition::Changed {
                from: GamePhase::Idle,
                to: GamePhase::Initializing
            }
        );
        assert_eq!(
            *journal.entries.lock().unwrap(),
            vec![
                "exit idle -> initializing".to_string(),
                "enter initializing <- idle".to_string()
            ]
        );
        match rx.try_recv().unwrap() {
            Event::Phase(PhaseEvent::Changed { new, previous }) => {
                assert_eq!(new, GamePhase::Initializing);
                assert_eq!(previous, GamePhase::Idle);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn reentering_a_phase_is_silent() {
        let (mut machine, journal, bus) = machine_with_journal();
        let mut rx = bus.subscribe(Topic::Phase);

        let transition = machine.transition_to(GamePhase::Idle).unwrap();

        assert_eq!(transition, Transition::Unchanged(GamePhase::Idle));
        assert!(journal.entries.lock().unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn rejected_transition_keeps_phase() {
        let (mut machine, journal, _bus) = machine_with_journal();
        let watch = machine.watch();

        let error = machine.transition_to(GamePhase::War).unwrap_err();

        assert!(matches!(
            error,
            RuntimeError::InvalidTransition {
                from: GamePhase::Idle,
                to: GamePhase::War
            }
        ));
        assert_eq!(machine.current(), GamePhase::Idle);
        assert_eq!(*watch.borrow(), GamePhase::Idle);
        assert!(journal.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn watch_tracks_current_phase() {
        let (mut machine, _journal, _bus) = machine_with_journal();
        let watch = machine.watch();

        machine.transition_to(GamePhase::Initializing).unwrap();
        machine.transition_to(GamePhase::Playing).unwrap();

        assert_eq!(*watch.borrow(), GamePhase::Playing);
    }
}
