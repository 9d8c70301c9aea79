//! Data-ready trigger state machine
//!
//! Tracks whether the data-ready interrupt is armed and owns the handler
//! dispatch path. Three strategies exist: invoke the handler directly in
//! the signalling context, wake a dedicated worker task, or enqueue
//! deferred work onto a queue shared with other consumers. The strategy is
//! chosen at construction and never changes for the instance's lifetime.
//!
//! Phase state sits behind a blocking mutex so the signalling context can
//! consult it without suspending.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;

use crate::compensation::Measurement;

/// Depth of the wake signal and shared work queues
///
/// Events raised while a queue is full coalesce into the pending ones.
pub const EVENT_QUEUE_DEPTH: usize = 4;

/// Wake signal consumed by a dedicated worker task
pub type WakeSignal = Channel<CriticalSectionRawMutex, (), EVENT_QUEUE_DEPTH>;

/// Work queue shared with other deferred consumers
pub type WorkQueue = Channel<CriticalSectionRawMutex, DeferredWork, EVENT_QUEUE_DEPTH>;

/// Deferred work item produced by the shared-queue strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeferredWork {
    /// A conversion finished; read it out and dispatch the handler
    DataReady,
}

/// Handler invoked on each dispatched data-ready event
///
/// Direct dispatch passes `None` because no bus I/O may run in the
/// signalling context; the deferred strategies pass the fresh measurement.
pub type DataReadyHandler = fn(Option<Measurement>);

/// Dispatch strategy for data-ready events
#[derive(Clone, Copy)]
pub enum DispatchMode {
    /// No trigger path configured; polling only
    Disabled,
    /// Invoke the handler synchronously in the signalling context
    Direct,
    /// Wake a dedicated worker driving
    /// [`run_worker`](crate::driver::Bmp3xx::run_worker)
    OwnWorker(&'static WakeSignal),
    /// Enqueue deferred work for an external consumer pool
    SharedQueue(&'static WorkQueue),
}

/// Trigger phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerPhase {
    /// No handler registered, interrupt disabled
    Disabled,
    /// Handler registered, interrupt enabled
    Armed,
    /// Handler invocation in progress
    Dispatching,
}

/// Snapshot of phase and handler, used to roll back failed transitions
#[derive(Clone, Copy)]
pub(crate) struct TriggerState {
    phase: TriggerPhase,
    handler: Option<DataReadyHandler>,
}

/// Serialized trigger state plus the fixed dispatch strategy
pub(crate) struct TriggerControl {
    mode: DispatchMode,
    state: Mutex<CriticalSectionRawMutex, Cell<TriggerState>>,
}

impl TriggerControl {
    pub(crate) const fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            state: Mutex::new(Cell::new(TriggerState {
                phase: TriggerPhase::Disabled,
                handler: None,
            })),
        }
    }

    pub(crate) fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub(crate) fn phase(&self) -> TriggerPhase {
        self.state.lock(|state| state.get().phase)
    }

    /// Register a handler and enter `Armed`
    ///
    /// Returns the replaced state for rollback, or `None` while a dispatch
    /// is in progress.
    pub(crate) fn try_arm(&self, handler: DataReadyHandler) -> Option<TriggerState> {
        self.state.lock(|state| {
            let prev = state.get();
            if prev.phase == TriggerPhase::Dispatching {
                return None;
            }
            state.set(TriggerState {
                phase: TriggerPhase::Armed,
                handler: Some(handler),
            });
            Some(prev)
        })
    }

    /// Clear the handler and enter `Disabled`, returning the replaced state
    pub(crate) fn disarm(&self) -> TriggerState {
        self.state.lock(|state| {
            state.replace(TriggerState {
                phase: TriggerPhase::Disabled,
                handler: None,
            })
        })
    }

    /// Roll back to a state captured before a failed register write
    ///
    /// `Dispatching` is only ever entered through [`Self::begin_dispatch`];
    /// a snapshot taken while a dispatch was in flight is restored as
    /// `Armed`.
    pub(crate) fn restore(&self, prev: TriggerState) {
        let phase = match prev.phase {
            TriggerPhase::Dispatching => TriggerPhase::Armed,
            phase => phase,
        };
        self.state.lock(|state| state.set(TriggerState { phase, ..prev }));
    }

    /// Enter `Dispatching`, handing back the handler to invoke
    ///
    /// Returns `None` unless the trigger is armed, so events that raced a
    /// disarm are dropped instead of running a stale handler.
    pub(crate) fn begin_dispatch(&self) -> Option<DataReadyHandler> {
        self.state.lock(|state| {
            let current = state.get();
            if current.phase != TriggerPhase::Armed {
                return None;
            }
            let handler = current.handler?;
            state.set(TriggerState {
                phase: TriggerPhase::Dispatching,
                handler: Some(handler),
            });
            Some(handler)
        })
    }

    /// Return from `Dispatching` to `Armed` after the handler finished
    pub(crate) fn finish_dispatch(&self) {
        self.state.lock(|state| {
            let current = state.get();
            if current.phase == TriggerPhase::Dispatching {
                state.set(TriggerState {
                    phase: TriggerPhase::Armed,
                    ..current
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_measurement: Option<Measurement>) {}

    #[test]
    fn test_arm_transitions_to_armed() {
        let control = TriggerControl::new(DispatchMode::Direct);
        assert_eq!(control.phase(), TriggerPhase::Disabled);

        assert!(control.try_arm(noop).is_some());
        assert_eq!(control.phase(), TriggerPhase::Armed);

        // re-arming while armed replaces the handler
        assert!(control.try_arm(noop).is_some());
        assert_eq!(control.phase(), TriggerPhase::Armed);
    }

    #[test]
    fn test_dispatch_cycle_returns_to_armed() {
        let control = TriggerControl::new(DispatchMode::Direct);
        control.try_arm(noop);

        let handler = control.begin_dispatch();
        assert!(handler.is_some());
        assert_eq!(control.phase(), TriggerPhase::Dispatching);

        // only one dispatch may be in flight
        assert!(control.begin_dispatch().is_none());

        control.finish_dispatch();
        assert_eq!(control.phase(), TriggerPhase::Armed);
    }

    #[test]
    fn test_arm_rejected_while_dispatching() {
        let control = TriggerControl::new(DispatchMode::Direct);
        control.try_arm(noop);
        control.begin_dispatch();

        assert!(control.try_arm(noop).is_none());
        assert_eq!(control.phase(), TriggerPhase::Dispatching);
    }

    #[test]
    fn test_begin_dispatch_requires_armed() {
        let control = TriggerControl::new(DispatchMode::Direct);
        assert!(control.begin_dispatch().is_none());

        control.try_arm(noop);
        control.disarm();
        assert!(control.begin_dispatch().is_none());
    }

    #[test]
    fn test_disarm_clears_handler_from_any_phase() {
        let control = TriggerControl::new(DispatchMode::Direct);
        control.try_arm(noop);
        control.begin_dispatch();

        control.disarm();
        assert_eq!(control.phase(), TriggerPhase::Disabled);
        assert!(control.begin_dispatch().is_none());
    }

    #[test]
    fn test_restore_rolls_back_failed_arm() {
        let control = TriggerControl::new(DispatchMode::Direct);
        let prev = control.try_arm(noop).unwrap();

        control.restore(prev);
        assert_eq!(control.phase(), TriggerPhase::Disabled);
        assert!(control.begin_dispatch().is_none());
    }

    #[test]
    fn test_restore_after_disarm_mid_dispatch_rearms() {
        let control = TriggerControl::new(DispatchMode::Direct);
        control.try_arm(noop);
        control.begin_dispatch();

        // a disarm raced the running dispatch and its register write failed
        let prev = control.disarm();
        control.finish_dispatch();
        control.restore(prev);

        assert_eq!(control.phase(), TriggerPhase::Armed);
        assert!(control.begin_dispatch().is_some());
    }
}
