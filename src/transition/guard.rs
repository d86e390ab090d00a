use hecs::Entity;

use super::{BoxedTransition, Predicate, Transition, TransitionStatus};
use crate::graph::SceneGraph;

/// Wraps a transition so it becomes a no-op once its owner is gone.
///
/// The owner entity is the liveness token: before every `start`, `tick` and
/// `complete_early` the guard checks that the owner still exists and, if
/// given, that the extra predicate holds. On failure the guard completes
/// without touching the wrapped transition again.
pub struct Guarded {
    owner: Entity,
    predicate: Option<Predicate>,
    inner: BoxedTransition,
    status: TransitionStatus,
}

impl Guarded {
    /// Guard `inner` on the liveness of `owner`.
    pub fn new<T: Transition + 'static>(owner: Entity, inner: T) -> Self {
        Self {
            owner,
            predicate: None,
            inner: Box::new(inner),
            status: TransitionStatus::Pending,
        }
    }

    /// Additionally require `predicate` to hold before each operation.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&SceneGraph) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// The liveness token this guard checks.
    pub fn owner(&self) -> Entity {
        self.owner
    }

    fn passes(&self, graph: &SceneGraph) -> bool {
        graph.contains(self.owner) && self.predicate.as_ref().is_none_or(|p| p(graph))
    }

    /// Returns `false` (and completes) when the guard no longer passes.
    fn check(&mut self, graph: &SceneGraph) -> bool {
        if self.status == TransitionStatus::Completed {
            return false;
        }
        if !self.passes(graph) {
            self.status = TransitionStatus::Completed;
            return false;
        }
        true
    }

    fn mirror(&mut self) {
        self.status = match self.inner.status() {
            TransitionStatus::Completed => TransitionStatus::Completed,
            _ => TransitionStatus::Running,
        };
    }
}

impl Transition for Guarded {
    fn start(&mut self, graph: &mut SceneGraph) {
        if self.status != TransitionStatus::Pending || !self.check(graph) {
            return;
        }
        self.inner.start(graph);
        self.mirror();
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if self.status != TransitionStatus::Running || !self.check(graph) {
            return;
        }
        self.inner.tick(graph, dt);
        self.mirror();
    }

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        if !self.check(graph) {
            return;
        }
        self.inner.complete_early(graph);
        self.status = TransitionStatus::Completed;
    }

    fn status(&self) -> TransitionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::testing::{entries, log_entity, push};
    use crate::transition::{Chain, Tween};

    #[test]
    fn destroyed_owner_skips_remaining_steps() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let owner = graph.spawn("owner");

        let mut guarded = Guarded::new(
            owner,
            Chain::new()
                .action(move |g| push(g, log, "before"))
                .then(Tween::new(1.0))
                .action(move |g| push(g, log, "after")),
        );

        guarded.start(&mut graph);
        guarded.tick(&mut graph, 0.5);
        graph.destroy(owner);
        guarded.tick(&mut graph, 0.5);
        guarded.complete_early(&mut graph);

        assert!(guarded.is_complete());
        assert_eq!(entries(&graph, log), vec!["before"]);
    }

    #[test]
    fn never_starts_for_dead_owner() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let owner = graph.spawn("owner");
        graph.destroy(owner);

        let mut guarded = Guarded::new(owner, Chain::new().action(move |g| push(g, log, "x")));
        guarded.start(&mut graph);

        assert!(guarded.is_complete());
        assert!(entries(&graph, log).is_empty());
    }

    #[test]
    fn predicate_failure_acts_like_destruction() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let owner = graph.spawn("owner");

        let mut guarded = Guarded::new(
            owner,
            Chain::new()
                .then(Tween::new(1.0))
                .action(move |g| push(g, log, "end")),
        )
        .when(move |g| g.is_active_self(owner));

        guarded.start(&mut graph);
        graph.set_active(owner, false);
        guarded.complete_early(&mut graph);

        assert!(guarded.is_complete());
        assert!(entries(&graph, log).is_empty());
        assert_eq!(guarded.owner(), owner);
    }

    #[test]
    fn live_owner_delegates() {
        let mut graph = SceneGraph::new();
        let owner = graph.spawn("owner");
        let mut guarded = Guarded::new(owner, Tween::new(0.5));

        guarded.start(&mut graph);
        assert_eq!(guarded.status(), TransitionStatus::Running);
        guarded.tick(&mut graph, 0.5);
        assert!(guarded.is_complete());
    }
}
