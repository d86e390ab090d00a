use std::collections::VecDeque;

use super::{BoxedTransition, Transition, TransitionStatus};
use crate::graph::SceneGraph;

type Action = Box<dyn FnOnce(&mut SceneGraph) + Send + Sync>;
type Deferred = Box<dyn FnOnce(&mut SceneGraph) -> BoxedTransition + Send + Sync>;

enum Step {
    Action(Action),
    Run(BoxedTransition),
    Deferred(Deferred),
}

/// Runs steps strictly in sequence.
///
/// Step N's side effects are fully applied before step N+1 begins. A step can
/// be a plain action, a prepared transition, or a *deferred* transition that
/// is only built when the chain reaches it, so it can see state decided by
/// earlier steps.
///
/// # Example
///
/// ```
/// use panelkit::{Chain, SceneGraph, Transition, Tween};
///
/// let mut graph = SceneGraph::new();
/// let node = graph.spawn("panel");
///
/// let mut chain = Chain::new()
///     .action(move |g| g.set_active(node, true))
///     .then_deferred(|_| Box::new(Tween::new(0.2)))
///     .action(move |g| g.set_active(node, false));
///
/// chain.start(&mut graph);
/// assert!(graph.is_active_self(node));
///
/// chain.tick(&mut graph, 0.2);
/// assert!(chain.is_complete());
/// assert!(!graph.is_active_self(node));
/// ```
pub struct Chain {
    label: Option<String>,
    steps: VecDeque<Step>,
    current: Option<BoxedTransition>,
    status: TransitionStatus,
}

impl Chain {
    pub fn new() -> Self {
        Self {
            label: None,
            steps: VecDeque::new(),
            current: None,
            status: TransitionStatus::Pending,
        }
    }

    /// A chain that logs its start and completion at debug level.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    /// Append a side effect that completes immediately.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut SceneGraph) + Send + Sync + 'static,
    {
        self.steps.push_back(Step::Action(Box::new(action)));
        self
    }

    /// Append an already prepared transition.
    pub fn then<T: Transition + 'static>(mut self, transition: T) -> Self {
        self.steps.push_back(Step::Run(Box::new(transition)));
        self
    }

    /// Append a transition built at the moment the chain reaches it.
    pub fn then_deferred<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut SceneGraph) -> BoxedTransition + Send + Sync + 'static,
    {
        self.steps.push_back(Step::Deferred(Box::new(build)));
        self
    }

    /// Number of steps not yet reached.
    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    /// Run steps until one needs more frames or the chain is exhausted.
    fn advance(&mut self, graph: &mut SceneGraph) {
        loop {
            if let Some(current) = &self.current {
                if !current.is_complete() {
                    return;
                }
                self.current = None;
            }

            match self.steps.pop_front() {
                None => {
                    self.finish();
                    return;
                }
                Some(Step::Action(action)) => action(graph),
                Some(Step::Run(mut transition)) => {
                    transition.start(graph);
                    self.current = Some(transition);
                }
                Some(Step::Deferred(build)) => {
                    let mut transition = build(graph);
                    transition.start(graph);
                    self.current = Some(transition);
                }
            }
        }
    }

    fn finish(&mut self) {
        self.status = TransitionStatus::Completed;
        if let Some(label) = &self.label {
            tracing::debug!(chain = %label, "chain complete");
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition for Chain {
    fn start(&mut self, graph: &mut SceneGraph) {
        if self.status != TransitionStatus::Pending {
            return;
        }
        if let Some(label) = &self.label {
            tracing::debug!(chain = %label, steps = self.steps.len(), "chain start");
        }
        self.status = TransitionStatus::Running;
        self.advance(graph);
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if self.status != TransitionStatus::Running {
            return;
        }
        if let Some(current) = self.current.as_mut() {
            current.tick(graph, dt);
        }
        self.advance(graph);
    }

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        if self.status == TransitionStatus::Completed {
            return;
        }
        self.status = TransitionStatus::Running;

        if let Some(mut current) = self.current.take() {
            current.complete_early(graph);
        }
        while let Some(step) = self.steps.pop_front() {
            match step {
                Step::Action(action) => action(graph),
                Step::Run(mut transition) => transition.complete_early(graph),
                Step::Deferred(build) => build(graph).complete_early(graph),
            }
        }
        self.finish();
    }

    fn status(&self) -> TransitionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::testing::{entries, log_entity, push};
    use crate::transition::{InstantAction, Tween};

    #[test]
    fn steps_run_in_order_across_frames() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);

        let mut chain = Chain::new()
            .action(move |g| push(g, log, "a"))
            .then(Tween::new(0.5))
            .action(move |g| push(g, log, "b"))
            .then(InstantAction::new(move |g| push(g, log, "c")));

        chain.start(&mut graph);
        assert_eq!(entries(&graph, log), vec!["a"]);

        chain.tick(&mut graph, 0.25);
        assert_eq!(entries(&graph, log), vec!["a"]);

        chain.tick(&mut graph, 0.25);
        assert!(chain.is_complete());
        assert_eq!(entries(&graph, log), vec!["a", "b", "c"]);
    }

    #[test]
    fn deferred_step_sees_earlier_effects() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);

        let mut chain = Chain::new()
            .action(move |g| push(g, log, "first"))
            .then_deferred(move |g| {
                let seen = entries(g, log).len();
                Box::new(InstantAction::new(move |g| {
                    push(g, log, &format!("saw {seen}"))
                }))
            });

        chain.start(&mut graph);
        assert_eq!(entries(&graph, log), vec!["first", "saw 1"]);
    }

    #[test]
    fn complete_early_applies_remaining_steps_once() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);

        let mut chain = Chain::new()
            .then(Tween::new(1.0))
            .action(move |g| push(g, log, "after"))
            .then_deferred(move |_| Box::new(Tween::new(5.0)))
            .action(move |g| push(g, log, "end"));

        chain.start(&mut graph);
        chain.tick(&mut graph, 0.1);
        chain.complete_early(&mut graph);
        let once = entries(&graph, log);
        chain.complete_early(&mut graph);

        assert!(chain.is_complete());
        assert_eq!(once, vec!["after", "end"]);
        assert_eq!(entries(&graph, log), once);
        assert_eq!(chain.remaining_steps(), 0);
    }

    #[test]
    fn complete_early_on_pending_chain_runs_everything() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);

        let mut chain = Chain::new()
            .action(move |g| push(g, log, "a"))
            .then(Tween::new(2.0))
            .action(move |g| push(g, log, "b"));

        chain.complete_early(&mut graph);
        assert!(chain.is_complete());
        assert_eq!(entries(&graph, log), vec!["a", "b"]);
    }

    #[test]
    fn empty_chain_completes_on_start() {
        let mut graph = SceneGraph::new();
        let mut chain = Chain::new();
        chain.start(&mut graph);
        assert!(chain.is_complete());
    }
}
