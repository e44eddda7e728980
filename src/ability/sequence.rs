//! Tick-driven, cancellable multi-phase procedures.
//!
//! A [`TemporalSequence`] is an ordered list of phases, each with a duration.
//! It is advanced once per tick and calls back into a [`PhaseHandler`] on
//! phase entry, every tick, and phase exit.  Zero-length phases (teleport
//! warp) enter and exit within the same tick.
//!
//! Whatever the handler suppresses in `on_begin` (collision, visibility,
//! scale) it must restore in `on_finish`, which runs on normal completion
//! *and* on cancellation.

use super::effect::EffectBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec<P> {
    pub phase: P,
    pub duration: f32,
}

impl<P> PhaseSpec<P> {
    pub fn new(phase: P, duration: f32) -> Self {
        Self {
            phase,
            duration: duration.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Cancelled,
}

/// Callbacks for one running sequence.
pub trait PhaseHandler<P: Copy> {
    /// Sequence-wide entry, before the first phase is entered.
    fn on_begin(&mut self, _effects: &mut EffectBuffer) {}
    fn on_enter(&mut self, _phase: P, _effects: &mut EffectBuffer) {}
    /// `progress` runs from 0 to 1 across the phase.
    fn on_tick(&mut self, _phase: P, _progress: f32, _effects: &mut EffectBuffer) {}
    fn on_exit(&mut self, _phase: P, _effects: &mut EffectBuffer) {}
    /// Sequence-wide exit.  Restore every suppressed invariant here.
    fn on_finish(&mut self, _outcome: SequenceOutcome, _effects: &mut EffectBuffer) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus<P> {
    Running(P),
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSequence<P> {
    phases: Vec<PhaseSpec<P>>,
    index: usize,
    phase_started_at: f64,
    started_at: f64,
    finished: bool,
}

impl<P: Copy + std::fmt::Debug> TemporalSequence<P> {
    /// Begin the sequence at `now`: `on_begin`, then `on_enter` for the first phase.
    pub fn start<H: PhaseHandler<P>>(
        phases: Vec<PhaseSpec<P>>,
        now: f64,
        handler: &mut H,
        effects: &mut EffectBuffer,
    ) -> Self {
        handler.on_begin(effects);
        if let Some(first) = phases.first() {
            handler.on_enter(first.phase, effects);
        }
        Self {
            phases,
            index: 0,
            phase_started_at: now,
            started_at: now,
            finished: false,
        }
    }

    #[inline]
    pub fn current(&self) -> Option<P> {
        if self.finished {
            return None;
        }
        self.phases.get(self.index).map(|spec| spec.phase)
    }

    #[inline]
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Step to `now`, crossing as many phase boundaries as have elapsed.
    pub fn advance<H: PhaseHandler<P>>(
        &mut self,
        now: f64,
        handler: &mut H,
        effects: &mut EffectBuffer,
    ) -> SequenceStatus<P> {
        if self.finished {
            return SequenceStatus::Finished;
        }
        loop {
            let Some(spec) = self.phases.get(self.index).copied() else {
                self.finished = true;
                handler.on_finish(SequenceOutcome::Completed, effects);
                return SequenceStatus::Finished;
            };
            let phase_end = self.phase_started_at + spec.duration as f64;
            if now < phase_end {
                let progress = if spec.duration > 0.0 {
                    (((now - self.phase_started_at) / spec.duration as f64) as f32).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                handler.on_tick(spec.phase, progress, effects);
                return SequenceStatus::Running(spec.phase);
            }
            handler.on_tick(spec.phase, 1.0, effects);
            handler.on_exit(spec.phase, effects);
            self.index += 1;
            self.phase_started_at = phase_end;
            if let Some(next) = self.phases.get(self.index) {
                handler.on_enter(next.phase, effects);
            }
        }
    }

    /// Abort mid-flight.  The current phase is exited and `on_finish` runs
    /// with [`SequenceOutcome::Cancelled`].
    pub fn cancel<H: PhaseHandler<P>>(&mut self, handler: &mut H, effects: &mut EffectBuffer) {
        if self.finished {
            return;
        }
        if let Some(spec) = self.phases.get(self.index) {
            handler.on_exit(spec.phase, effects);
        }
        self.finished = true;
        handler.on_finish(SequenceOutcome::Cancelled, effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::effect::AbilityEffect;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        Wait,
        Blink,
        Settle,
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
        collision_enabled: bool,
    }

    impl PhaseHandler<Step> for Recorder {
        fn on_begin(&mut self, effects: &mut EffectBuffer) {
            self.collision_enabled = false;
            effects.push(AbilityEffect::SetCollision(false));
            self.log.push("begin".into());
        }
        fn on_enter(&mut self, phase: Step, _: &mut EffectBuffer) {
            self.log.push(format!("enter {phase:?}"));
        }
        fn on_exit(&mut self, phase: Step, _: &mut EffectBuffer) {
            self.log.push(format!("exit {phase:?}"));
        }
        fn on_finish(&mut self, outcome: SequenceOutcome, effects: &mut EffectBuffer) {
            self.collision_enabled = true;
            effects.push(AbilityEffect::SetCollision(true));
            self.log.push(format!("finish {outcome:?}"));
        }
    }

    fn phases() -> Vec<PhaseSpec<Step>> {
        vec![
            PhaseSpec::new(Step::Wait, 0.5),
            PhaseSpec::new(Step::Blink, 0.0),
            PhaseSpec::new(Step::Settle, 0.25),
        ]
    }

    #[test]
    fn zero_length_phase_passes_in_one_tick() {
        let mut handler = Recorder::default();
        let mut fx = EffectBuffer::default();
        let mut seq = TemporalSequence::start(phases(), 0.0, &mut handler, &mut fx);

        assert_eq!(seq.advance(0.25, &mut handler, &mut fx), SequenceStatus::Running(Step::Wait));
        assert_eq!(seq.advance(0.5, &mut handler, &mut fx), SequenceStatus::Running(Step::Settle));
        assert!(handler.log.contains(&"enter Blink".to_string()));
        assert!(handler.log.contains(&"exit Blink".to_string()));
        assert_eq!(seq.advance(0.75, &mut handler, &mut fx), SequenceStatus::Finished);
        assert!(handler.collision_enabled);
        assert_eq!(handler.log.last().map(String::as_str), Some("finish Completed"));
    }

    #[test]
    fn cancel_restores_invariants() {
        let mut handler = Recorder::default();
        let mut fx = EffectBuffer::default();
        let mut seq = TemporalSequence::start(phases(), 0.0, &mut handler, &mut fx);
        seq.advance(0.1, &mut handler, &mut fx);
        assert!(!handler.collision_enabled);

        seq.cancel(&mut handler, &mut fx);
        assert!(handler.collision_enabled);
        assert!(seq.is_finished());
        assert_eq!(seq.current(), None);
        assert_eq!(handler.log.last().map(String::as_str), Some("finish Cancelled"));

        // A second cancel is a no-op.
        let before = handler.log.len();
        seq.cancel(&mut handler, &mut fx);
        assert_eq!(handler.log.len(), before);
    }

    #[test]
    fn large_step_crosses_every_phase() {
        let mut handler = Recorder::default();
        let mut fx = EffectBuffer::default();
        let mut seq = TemporalSequence::start(phases(), 0.0, &mut handler, &mut fx);
        assert_eq!(seq.advance(10.0, &mut handler, &mut fx), SequenceStatus::Finished);
        assert_eq!(
            handler.log,
            vec![
                "begin",
                "enter Wait",
                "exit Wait",
                "enter Blink",
                "exit Blink",
                "enter Settle",
                "exit Settle",
                "finish Completed"
            ]
        );
    }
}
