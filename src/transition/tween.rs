//! Eased, time-based leaf transition and easing curves.

use serde::{Deserialize, Serialize};

use super::{OnTransitionFrame, Transition, TransitionStatus};
use crate::graph::SceneGraph;

/// Curve a [`Tween`] maps its linear progress through.
///
/// Panels pick one per direction, so an entrance can decelerate into place
/// while the exit speeds away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// Progress passes through unchanged.
    #[default]
    Linear,
    /// Quadratic; the panel leaves its start slowly.
    EaseIn,
    /// Quadratic; the panel settles gently into its end.
    EaseOut,
    /// Quadratic on both ends, fastest at the halfway mark.
    EaseInOut,
}

impl Easing {
    /// Eased progress for `t`, clamped to `0.0..=1.0` first.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => {
                let rest = 1.0 - t;
                1.0 - rest * rest
            }
            Easing::EaseInOut if t < 0.5 => 2.0 * t * t,
            Easing::EaseInOut => {
                let rest = 2.0 - 2.0 * t;
                1.0 - rest * rest / 2.0
            }
        }
    }
}

type Apply = Box<dyn FnMut(&mut SceneGraph, f32) + Send + Sync>;

/// Animates an eased progress value from 0.0 to 1.0 over `duration` seconds.
///
/// Each tick hands the eased progress to the update callback (see
/// [`Tween::on_update`]) and reports `(elapsed, dt)` to the frame callback.
/// Completing early jumps straight to progress 1.0 without a frame callback.
///
/// # Example
///
/// ```
/// use panelkit::{Easing, SceneGraph, Transition, Tween};
///
/// let mut graph = SceneGraph::new();
/// let mut tween = Tween::new(1.0).easing(Easing::Linear);
///
/// tween.start(&mut graph);
/// tween.tick(&mut graph, 0.5);
/// assert_eq!(tween.progress(), 0.5);
/// ```
pub struct Tween {
    duration: f32,
    easing: Easing,
    elapsed: f32,
    progress: f32,
    apply: Option<Apply>,
    on_frame: Option<OnTransitionFrame>,
    status: TransitionStatus,
}

impl Tween {
    /// Create a tween lasting `duration` seconds. Negative durations count as zero.
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            easing: Easing::Linear,
            elapsed: 0.0,
            progress: 0.0,
            apply: None,
            on_frame: None,
            status: TransitionStatus::Pending,
        }
    }

    /// Set the easing curve.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the callback that receives the eased progress every update.
    pub fn on_update<F>(mut self, apply: F) -> Self
    where
        F: FnMut(&mut SceneGraph, f32) + Send + Sync + 'static,
    {
        self.apply = Some(Box::new(apply));
        self
    }

    /// Set the per-frame callback.
    pub fn on_frame(mut self, on_frame: Option<OnTransitionFrame>) -> Self {
        self.on_frame = on_frame;
        self
    }

    /// Eased progress, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Seconds elapsed since start.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn apply(&mut self, graph: &mut SceneGraph, raw: f32) {
        self.progress = self.easing.apply(raw);
        if let Some(apply) = self.apply.as_mut() {
            apply(graph, self.progress);
        }
    }
}

impl Transition for Tween {
    fn start(&mut self, graph: &mut SceneGraph) {
        if self.status != TransitionStatus::Pending {
            return;
        }
        self.elapsed = 0.0;
        if self.duration <= 0.0 {
            self.apply(graph, 1.0);
            self.status = TransitionStatus::Completed;
        } else {
            self.apply(graph, 0.0);
            self.status = TransitionStatus::Running;
        }
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if self.status != TransitionStatus::Running {
            return;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;

        let raw = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.apply(graph, raw);
        if let Some(on_frame) = &self.on_frame {
            on_frame(self.elapsed, dt);
        }

        if raw >= 1.0 {
            self.status = TransitionStatus::Completed;
        }
    }

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        if self.status == TransitionStatus::Completed {
            return;
        }
        self.apply(graph, 1.0);
        self.status = TransitionStatus::Completed;
    }

    fn status(&self) -> TransitionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
    }

    #[test]
    fn easing_midpoints() {
        assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInOut.apply(0.25), 0.125);
    }

    #[test]
    fn completes_after_duration() {
        let mut graph = SceneGraph::new();
        let mut tween = Tween::new(0.3);
        tween.start(&mut graph);

        tween.tick(&mut graph, 0.1);
        tween.tick(&mut graph, 0.1);
        assert!(!tween.is_complete());

        tween.tick(&mut graph, 0.15);
        assert!(tween.is_complete());
        assert_eq!(tween.progress(), 1.0);
    }

    #[test]
    fn zero_duration_completes_on_start() {
        let mut graph = SceneGraph::new();
        let mut tween = Tween::new(0.0);
        tween.start(&mut graph);
        assert!(tween.is_complete());
        assert_eq!(tween.progress(), 1.0);
    }

    #[test]
    fn negative_dt_is_clamped() {
        let mut graph = SceneGraph::new();
        let mut tween = Tween::new(1.0);
        tween.start(&mut graph);
        tween.tick(&mut graph, -5.0);
        assert_eq!(tween.elapsed(), 0.0);
        assert_eq!(tween.status(), TransitionStatus::Running);
    }

    #[test]
    fn tick_before_start_is_ignored() {
        let mut graph = SceneGraph::new();
        let mut tween = Tween::new(1.0);
        tween.tick(&mut graph, 10.0);
        assert_eq!(tween.status(), TransitionStatus::Pending);
    }

    #[test]
    fn complete_early_skips_frame_callback_but_applies_final_value() {
        let mut graph = SceneGraph::new();
        let frames = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(0.0f32));

        let counter = Arc::clone(&frames);
        let sink = Arc::clone(&last);
        let mut tween = Tween::new(1.0)
            .on_frame(Some(Arc::new(move |_: f32, _: f32| {
                counter.fetch_add(1, Ordering::SeqCst);
            })))
            .on_update(move |_, p| *sink.lock().unwrap() = p);

        tween.start(&mut graph);
        tween.tick(&mut graph, 0.25);
        tween.complete_early(&mut graph);
        tween.complete_early(&mut graph);

        assert_eq!(frames.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), 1.0);
    }
}
