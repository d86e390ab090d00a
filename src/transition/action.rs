use super::{Transition, TransitionStatus};
use crate::graph::SceneGraph;

type Action = Box<dyn FnOnce(&mut SceneGraph) + Send + Sync>;

/// Zero-duration transition that runs a single side effect.
///
/// The action runs when the transition starts (or is completed early) and the
/// transition completes in the same call. Used for state changes and checks
/// embedded in a [`Chain`](super::Chain).
pub struct InstantAction {
    action: Option<Action>,
    status: TransitionStatus,
}

impl InstantAction {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce(&mut SceneGraph) + Send + Sync + 'static,
    {
        Self {
            action: Some(Box::new(action)),
            status: TransitionStatus::Pending,
        }
    }

    /// A transition with nothing to do.
    pub fn done() -> Self {
        Self {
            action: None,
            status: TransitionStatus::Pending,
        }
    }

    fn run(&mut self, graph: &mut SceneGraph) {
        if self.status == TransitionStatus::Completed {
            return;
        }
        self.status = TransitionStatus::Completed;
        if let Some(action) = self.action.take() {
            action(graph);
        }
    }
}

impl Transition for InstantAction {
    fn start(&mut self, graph: &mut SceneGraph) {
        self.run(graph);
    }

    fn tick(&mut self, _graph: &mut SceneGraph, _dt: f32) {}

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        self.run(graph);
    }

    fn status(&self) -> TransitionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::testing::{entries, log_entity, push};

    #[test]
    fn runs_once_on_start() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);

        let mut action = InstantAction::new(move |g| push(g, log, "ran"));
        assert_eq!(action.status(), TransitionStatus::Pending);

        action.start(&mut graph);
        action.complete_early(&mut graph);
        action.start(&mut graph);

        assert!(action.is_complete());
        assert_eq!(entries(&graph, log), vec!["ran"]);
    }

    #[test]
    fn done_completes_without_effects() {
        let mut graph = SceneGraph::new();
        let mut done = InstantAction::done();
        done.start(&mut graph);
        assert!(done.is_complete());
    }
}
