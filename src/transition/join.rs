use super::{BoxedTransition, Transition, TransitionStatus};
use crate::graph::SceneGraph;

/// Runs transitions concurrently; completes once every child has completed.
///
/// No ordering is guaranteed between children. An empty join completes as
/// soon as it starts.
pub struct Join {
    children: Vec<BoxedTransition>,
    status: TransitionStatus,
}

impl Join {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            status: TransitionStatus::Pending,
        }
    }

    /// Add a child transition.
    pub fn with<T: Transition + 'static>(mut self, transition: T) -> Self {
        self.push(Box::new(transition));
        self
    }

    /// Add an already boxed child transition.
    pub fn push(&mut self, transition: BoxedTransition) {
        self.children.push(transition);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn settle(&mut self) {
        if self.children.iter().all(|child| child.is_complete()) {
            self.status = TransitionStatus::Completed;
        }
    }
}

impl Default for Join {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition for Join {
    fn start(&mut self, graph: &mut SceneGraph) {
        if self.status != TransitionStatus::Pending {
            return;
        }
        self.status = TransitionStatus::Running;
        for child in &mut self.children {
            child.start(graph);
        }
        self.settle();
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if self.status != TransitionStatus::Running {
            return;
        }
        for child in &mut self.children {
            if !child.is_complete() {
                child.tick(graph, dt);
            }
        }
        self.settle();
    }

    fn complete_early(&mut self, graph: &mut SceneGraph) {
        if self.status == TransitionStatus::Completed {
            return;
        }
        for child in &mut self.children {
            child.complete_early(graph);
        }
        self.status = TransitionStatus::Completed;
    }

    fn status(&self) -> TransitionStatus {
        self.status
    }
}
