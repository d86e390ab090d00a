//! The single active-transition slot.
//!
//! Each controller owns at most one active transition. The transition is
//! taken out of its slot whenever it runs (start, tick, early completion), so
//! its steps can freely call back into the controller. A request that arrives
//! while the active transition is on the call stack supersedes it: the
//! running transition is completed early as soon as it returns. Immediate
//! requests never occupy the slot, so they leave a running transition alone.

use hecs::Entity;

use crate::graph::SceneGraph;
use crate::transition::{BoxedTransition, Guarded, Transition};

#[derive(Default)]
pub(crate) struct ActiveSlot {
    /// Installed transition waiting for ticks.
    current: Option<(u64, BoxedTransition)>,
    /// Id of the transition currently executing, if it is still the active one.
    running: Option<u64>,
}

impl ActiveSlot {
    pub(crate) fn is_occupied(&self) -> bool {
        self.current.is_some() || self.running.is_some()
    }
}

/// Complete the active transition early, repeating until the slot stays empty.
///
/// A transition currently executing on the call stack is marked superseded.
pub(crate) fn force_complete(graph: &mut SceneGraph, node: Entity) {
    complete_installed(graph, node, true);
}

fn complete_installed(graph: &mut SceneGraph, node: Entity, supersede_running: bool) {
    loop {
        let Ok(slot) = graph.world_mut().query_one_mut::<&mut ActiveSlot>(node) else {
            return;
        };
        if supersede_running {
            slot.running = None;
        }
        let Some((_, mut transition)) = slot.current.take() else {
            return;
        };
        transition.complete_early(graph);
    }
}

/// Install `transition` as the node's only active transition and start it.
///
/// Any previous active transition is completed first. With `immediate` the
/// new transition is also completed before this returns and never enters the
/// slot, so a transition executing further up the call stack keeps running.
pub(crate) fn run_as_active(
    graph: &mut SceneGraph,
    node: Entity,
    transition: BoxedTransition,
    immediate: bool,
) {
    if !graph.has::<ActiveSlot>(node) {
        return;
    }
    let mut guarded: BoxedTransition = Box::new(Guarded::new(node, transition));

    if immediate {
        complete_installed(graph, node, false);
        guarded.start(graph);
        guarded.complete_early(graph);
        return;
    }

    force_complete(graph, node);
    let id = graph.next_transition_id();
    if let Ok(slot) = graph.world_mut().query_one_mut::<&mut ActiveSlot>(node) {
        slot.running = Some(id);
    }
    guarded.start(graph);
    settle(graph, node, id, guarded);
}

/// Return a transition to its slot after it ran.
fn settle(graph: &mut SceneGraph, node: Entity, id: u64, mut transition: BoxedTransition) {
    match graph.world_mut().query_one_mut::<&mut ActiveSlot>(node) {
        Ok(slot) if slot.running == Some(id) => {
            slot.running = None;
            if !transition.is_complete() {
                slot.current = Some((id, transition));
            }
        }
        Ok(_) => {
            tracing::trace!(id, "completing superseded transition");
            transition.complete_early(graph);
        }
        // Node destroyed while the transition ran.
        Err(_) => {}
    }
}

/// Advance every installed active transition. Called from [`SceneGraph::tick`].
pub(crate) fn tick_active_transitions(graph: &mut SceneGraph, dt: f32) {
    let nodes: Vec<Entity> = graph
        .world_mut()
        .query_mut::<&ActiveSlot>()
        .into_iter()
        .filter(|(_, slot)| slot.current.is_some())
        .map(|(node, _)| node)
        .collect();

    for node in nodes {
        let Ok(slot) = graph.world_mut().query_one_mut::<&mut ActiveSlot>(node) else {
            continue;
        };
        let Some((id, mut transition)) = slot.current.take() else {
            continue;
        };
        slot.running = Some(id);

        transition.tick(graph, dt);
        settle(graph, node, id, transition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::testing::{entries, log_entity, push};
    use crate::transition::{Chain, Tween};

    fn slot_node(graph: &mut SceneGraph) -> Entity {
        let node = graph.spawn("panel");
        graph.insert(node, ActiveSlot::default()).unwrap();
        node
    }

    fn occupied(graph: &SceneGraph, node: Entity) -> bool {
        graph
            .world()
            .get::<&ActiveSlot>(node)
            .map(|slot| slot.is_occupied())
            .unwrap_or(false)
    }

    #[test]
    fn new_transition_completes_previous_first() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let node = slot_node(&mut graph);

        let a = Chain::new()
            .then(Tween::new(1.0))
            .action(move |g| push(g, log, "a done"));
        let b = Chain::new()
            .action(move |g| push(g, log, "b start"))
            .then(Tween::new(1.0));

        run_as_active(&mut graph, node, Box::new(a), false);
        graph.tick(0.1);
        run_as_active(&mut graph, node, Box::new(b), false);

        assert_eq!(entries(&graph, log), vec!["a done", "b start"]);
        assert!(occupied(&graph, node));
    }

    #[test]
    fn slot_clears_when_transition_finishes() {
        let mut graph = SceneGraph::new();
        let node = slot_node(&mut graph);

        run_as_active(&mut graph, node, Box::new(Tween::new(0.5)), false);
        assert!(occupied(&graph, node));

        graph.tick(0.25);
        graph.tick(0.25);
        assert!(!occupied(&graph, node));
    }

    #[test]
    fn immediate_leaves_slot_empty() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let node = slot_node(&mut graph);

        let t = Chain::new()
            .then(Tween::new(3.0))
            .action(move |g| push(g, log, "end"));
        run_as_active(&mut graph, node, Box::new(t), true);

        assert!(!occupied(&graph, node));
        assert_eq!(entries(&graph, log), vec!["end"]);
    }

    #[test]
    fn nested_request_supersedes_running_transition() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let node = slot_node(&mut graph);

        // The outer transition starts a new active transition from inside
        // one of its own steps, then waits on a long tween.
        let outer = Chain::new()
            .action(move |g| {
                let inner = Chain::new()
                    .then(Tween::new(1.0))
                    .action(move |g| push(g, log, "inner done"));
                run_as_active(g, node, Box::new(inner), false);
            })
            .then(Tween::new(10.0))
            .action(move |g| push(g, log, "outer done"));

        run_as_active(&mut graph, node, Box::new(outer), false);

        // Outer was superseded and finished on return; inner is the active one.
        assert_eq!(entries(&graph, log), vec!["outer done"]);
        assert!(occupied(&graph, node));

        graph.tick(1.0);
        assert_eq!(entries(&graph, log), vec!["outer done", "inner done"]);
        assert!(!occupied(&graph, node));
    }

    #[test]
    fn nested_immediate_request_keeps_running_transition() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let node = slot_node(&mut graph);

        let outer = Chain::new()
            .action(move |g| {
                let snap = Chain::new()
                    .then(Tween::new(5.0))
                    .action(move |g| push(g, log, "snap done"));
                run_as_active(g, node, Box::new(snap), true);
            })
            .then(Tween::new(1.0))
            .action(move |g| push(g, log, "outer done"));

        run_as_active(&mut graph, node, Box::new(outer), false);

        assert_eq!(entries(&graph, log), vec!["snap done"]);
        assert!(occupied(&graph, node));

        graph.tick(1.0);
        assert_eq!(entries(&graph, log), vec!["snap done", "outer done"]);
        assert!(!occupied(&graph, node));
    }

    #[test]
    fn force_complete_runs_remaining_steps() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let node = slot_node(&mut graph);

        let t = Chain::new()
            .then(Tween::new(1.0))
            .action(move |g| push(g, log, "end"));
        run_as_active(&mut graph, node, Box::new(t), false);
        force_complete(&mut graph, node);
        force_complete(&mut graph, node);

        assert_eq!(entries(&graph, log), vec!["end"]);
        assert!(!occupied(&graph, node));
    }

    #[test]
    fn destroyed_node_drops_its_transition() {
        let mut graph = SceneGraph::new();
        let log = log_entity(&mut graph);
        let node = slot_node(&mut graph);

        let t = Chain::new()
            .then(Tween::new(1.0))
            .action(move |g| push(g, log, "end"));
        run_as_active(&mut graph, node, Box::new(t), false);

        graph.destroy(node);
        graph.tick(2.0);

        assert!(entries(&graph, log).is_empty());
    }
}
