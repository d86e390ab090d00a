//! Composable, cancellable transitions.
//!
//! A [`Transition`] is a unit of work that may span several frames. It is
//! started once, advanced by [`Transition::tick`] from the frame loop, and
//! finishes either on its own or through [`Transition::complete_early`], which
//! applies every remaining side effect synchronously without waiting for more
//! frames.
//!
//! Larger transitions are composed from a small closed set of pieces:
//!
//! | Type | Behavior |
//! |------|----------|
//! | [`InstantAction`] | Runs one side effect and completes immediately |
//! | [`Tween`] | Eased progress over a duration (the animated leaf) |
//! | [`Chain`] | Steps run strictly in sequence, including just-in-time steps |
//! | [`Join`] | Children run concurrently; done when all are done |
//! | [`Conditional`] | Runs its transition only if a predicate holds when reached |
//! | [`Guarded`] | No-op once its owner node is destroyed or a predicate fails |
//!
//! Parents own their children outright, so cancelling or completing a tree is
//! just a walk over owned values.
//!
//! # Example
//!
//! ```
//! use panelkit::{Chain, Easing, SceneGraph, Transition, Tween};
//!
//! let mut graph = SceneGraph::new();
//! let mut fade = Chain::new()
//!     .action(|_| println!("starting"))
//!     .then(Tween::new(0.5).easing(Easing::EaseOut))
//!     .action(|_| println!("done"));
//!
//! fade.start(&mut graph);
//! fade.tick(&mut graph, 0.25);
//! assert!(!fade.is_complete());
//!
//! fade.complete_early(&mut graph);
//! assert!(fade.is_complete());
//! ```

mod action;
mod chain;
mod conditional;
mod guard;
mod join;
mod tween;

pub use action::InstantAction;
pub use chain::Chain;
pub use conditional::Conditional;
pub use guard::Guarded;
pub use join::Join;
pub use tween::{Easing, Tween};

use std::sync::Arc;

use crate::graph::SceneGraph;

/// Lifecycle of a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionStatus {
    /// Built but not started.
    #[default]
    Pending,
    /// Started and waiting on frame ticks.
    Running,
    /// Terminal, reached naturally or through `complete_early`.
    Completed,
}

/// A cancellable, frame-driven unit of work.
///
/// Implementations must guarantee that once started they reach
/// [`TransitionStatus::Completed`] either through ticks or through
/// [`complete_early`](Transition::complete_early).
pub trait Transition: Send + Sync {
    /// Begin the transition. Zero-length work completes right here.
    fn start(&mut self, graph: &mut SceneGraph);

    /// Advance by `dt` seconds. Ignored unless running.
    fn tick(&mut self, graph: &mut SceneGraph, dt: f32);

    /// Apply all remaining side effects now and finish.
    ///
    /// Starts a pending transition first. Calling it on a completed
    /// transition does nothing.
    fn complete_early(&mut self, graph: &mut SceneGraph);

    /// Current lifecycle status.
    fn status(&self) -> TransitionStatus;

    fn is_complete(&self) -> bool {
        self.status() == TransitionStatus::Completed
    }
}

/// Owned, type-erased transition.
pub type BoxedTransition = Box<dyn Transition>;

impl Transition for BoxedTransition {
    fn start(&mut self, graph: &mut SceneGraph) {
        (**self).start(graph);
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        (**self).tick(graph, dt);
    }

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        (**self).complete_early(graph);
    }

    fn status(&self) -> TransitionStatus {
        (**self).status()
    }
}

/// Condition evaluated against the graph when a step is reached.
pub type Predicate = Box<dyn Fn(&SceneGraph) -> bool + Send + Sync>;

/// Per-frame callback receiving `(elapsed, dt)` in seconds.
pub type OnTransitionFrame = Arc<dyn Fn(f32, f32) + Send + Sync>;

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the transition tests.

    use hecs::Entity;

    use crate::graph::SceneGraph;

    /// Ordered record of side effects, stored on a dedicated entity.
    pub struct Log(pub Vec<String>);

    pub fn log_entity(graph: &mut SceneGraph) -> Entity {
        let e = graph.spawn("log");
        graph.insert(e, Log(Vec::new())).unwrap();
        e
    }

    pub fn push(graph: &mut SceneGraph, log: Entity, entry: &str) {
        if let Ok(log) = graph.world_mut().query_one_mut::<&mut Log>(log) {
            log.0.push(entry.to_string());
        }
    }

    pub fn entries(graph: &SceneGraph, log: Entity) -> Vec<String> {
        graph
            .world()
            .get::<&Log>(log)
            .map(|log| log.0.clone())
            .unwrap_or_default()
    }
}
