//! Value channels: per-name current value plus at most one in-flight
//! animation. Starting a new animation supersedes the previous one; that
//! is the cancellation mechanism, there is no separate token.

use crate::interp;
use crate::transition::TransitionKind;
use motiva_api_core::Value;

/// One in-flight animation toward a target.
#[derive(Clone, Debug)]
pub struct ActiveAnimation {
    /// Resolution generation that issued this animation. Completions are
    /// honored only while it matches the node's current generation.
    pub generation: u64,
    from: Value,
    to: Value,
    kind: TransitionKind,
    delay_left: f32,
    elapsed: f32,
}

/// Result of advancing a channel by one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// No animation, or still inside the start delay.
    Idle,
    /// The animation advanced (the value may or may not have moved).
    Moved,
    /// The animation finished this tick; carries its generation.
    Completed(u64),
}

/// A named value holder driven by the engine.
#[derive(Clone, Debug)]
pub struct ValueChannel {
    current: Value,
    active: Option<ActiveAnimation>,
}

impl ValueChannel {
    pub fn new(initial: Value) -> Self {
        Self {
            current: initial,
            active: None,
        }
    }

    #[inline]
    pub fn get(&self) -> &Value {
        &self.current
    }

    /// Write the value directly, cancelling any in-flight animation.
    pub fn set(&mut self, value: Value) {
        self.active = None;
        self.current = value;
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Stop the in-flight animation, holding the current value.
    pub fn stop(&mut self) {
        self.active = None;
    }

    /// Start an animation toward `to`, superseding any in-flight one.
    pub fn animate_to(&mut self, to: Value, kind: TransitionKind, delay: f32, generation: u64) {
        self.active = Some(ActiveAnimation {
            generation,
            from: self.current.clone(),
            to,
            kind,
            delay_left: delay.max(0.0),
            elapsed: 0.0,
        });
    }

    /// Advance by dt seconds. Delay counts down first; the remainder of the
    /// tick that crosses the delay boundary feeds progress in the same call.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        let Some(anim) = self.active.as_mut() else {
            return StepOutcome::Idle;
        };

        let mut budget = dt;
        if anim.delay_left > 0.0 {
            if budget < anim.delay_left {
                anim.delay_left -= budget;
                return StepOutcome::Idle;
            }
            budget -= anim.delay_left;
            anim.delay_left = 0.0;
        }

        match anim.kind {
            TransitionKind::Instant => {
                let generation = anim.generation;
                self.current = anim.to.clone();
                self.active = None;
                StepOutcome::Completed(generation)
            }
            TransitionKind::Tween { duration, ease } => {
                anim.elapsed += budget;
                if duration <= 0.0 || anim.elapsed >= duration {
                    let generation = anim.generation;
                    self.current = anim.to.clone();
                    self.active = None;
                    StepOutcome::Completed(generation)
                } else {
                    let t = anim.elapsed / duration;
                    self.current = interp::sample(&anim.from, &anim.to, interp::ease(ease, t));
                    StepOutcome::Moved
                }
            }
        }
    }
}
