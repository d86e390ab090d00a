use super::{BoxedTransition, Predicate, Transition, TransitionStatus};
use crate::graph::SceneGraph;

/// Runs a transition only if a predicate holds when the step is reached.
///
/// The predicate is evaluated at start (or at `complete_early` on a pending
/// conditional), not at construction. When it fails, the optional
/// [`otherwise`](Conditional::otherwise) branch runs instead; without one the
/// conditional completes instantly.
pub struct Conditional {
    predicate: Predicate,
    then: Option<BoxedTransition>,
    otherwise: Option<BoxedTransition>,
    chosen: Option<BoxedTransition>,
    status: TransitionStatus,
}

impl Conditional {
    pub fn new<F, T>(predicate: F, then: T) -> Self
    where
        F: Fn(&SceneGraph) -> bool + Send + Sync + 'static,
        T: Transition + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            then: Some(Box::new(then)),
            otherwise: None,
            chosen: None,
            status: TransitionStatus::Pending,
        }
    }

    /// Transition to run when the predicate is false.
    pub fn otherwise<T: Transition + 'static>(mut self, transition: T) -> Self {
        self.otherwise = Some(Box::new(transition));
        self
    }

    fn choose(&mut self, graph: &SceneGraph) {
        self.chosen = if (self.predicate)(graph) {
            self.then.take()
        } else {
            self.otherwise.take()
        };
        self.then = None;
        self.otherwise = None;
    }

    fn settle(&mut self) {
        let done = self.chosen.as_ref().is_none_or(|chosen| chosen.is_complete());
        if done {
            self.status = TransitionStatus::Completed;
        }
    }
}

impl Transition for Conditional {
    fn start(&mut self, graph: &mut SceneGraph) {
        if self.status != TransitionStatus::Pending {
            return;
        }
        self.status = TransitionStatus::Running;
        self.choose(graph);
        if let Some(chosen) = self.chosen.as_mut() {
            chosen.start(graph);
        }
        self.settle();
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if self.status != TransitionStatus::Running {
            return;
        }
        if let Some(chosen) = self.chosen.as_mut() {
            chosen.tick(graph, dt);
        }
        self.settle();
    }

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        match self.status {
            TransitionStatus::Completed => return,
            TransitionStatus::Pending => self.choose(graph),
            TransitionStatus::Running => {}
        }
        if let Some(chosen) = self.chosen.as_mut() {
            chosen.complete_early(graph);
        }
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
    use crate::transition::{Chain, InstantAction, Tween};

    #[test]
    fn predicate_is_read_when_reached() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let flag = graph.spawn("flag");
        graph.set_active(flag, false);

        let mut chain = Chain::new()
            .action(move |g| g.set_active(flag, true))
            .then(Conditional::new(
                move |g| g.is_active_self(flag),
                InstantAction::new(move |g| push(g, log, "ran")),
            ));

        chain.start(&mut graph);
        assert_eq!(entries(&graph, log), vec!["ran"]);
    }

    #[test]
    fn false_predicate_completes_instantly() {
        let mut graph = SceneGraph::new();
        let mut cond = Conditional::new(|_| false, Tween::new(10.0));
        cond.start(&mut graph);
        assert!(cond.is_complete());
    }

    #[test]
    fn otherwise_branch_runs_on_false() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);

        let mut cond = Conditional::new(
            |_| false,
            InstantAction::new(move |g| push(g, log, "then")),
        )
        .otherwise(InstantAction::new(move |g| push(g, log, "otherwise")));

        cond.complete_early(&mut graph);
        assert_eq!(entries(&graph, log), vec!["otherwise"]);
    }

    #[test]
    fn true_predicate_waits_for_inner() {
        let mut graph = SceneGraph::new();
        let mut cond = Conditional::new(|_| true, Tween::new(0.5));
        cond.start(&mut graph);
        assert!(!cond.is_complete());
        cond.tick(&mut graph, 0.5);
        assert!(cond.is_complete());
    }
}
