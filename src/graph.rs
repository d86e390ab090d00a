//! Scene graph built on `hecs`.
//!
//! Every node is a `hecs` entity carrying a [`Node`] component. Panels,
//! controllers and running animations are ordinary components attached to the
//! same entities, so destroying a node despawns everything that hangs off it.
//!
//! An [`Entity`] handle stays valid as a *token*: once the node is destroyed,
//! [`SceneGraph::contains`] returns `false` for it forever (hecs bumps the
//! generation on despawn). Transitions use exactly this check to turn into
//! no-ops when their owner disappears mid-flight.
//!
//! # Example
//!
//! ```
//! use panelkit::SceneGraph;
//!
//! let mut graph = SceneGraph::new();
//! let hud = graph.spawn("hud");
//! let menu = graph.spawn_child(hud, "menu").unwrap();
//!
//! assert_eq!(graph.path(menu), "hud/menu");
//!
//! graph.destroy(hud);
//! assert!(!graph.contains(menu));
//! ```

use hecs::{Entity, World};

use crate::controller;
use crate::error::PanelError;
use crate::panel;

/// Hierarchy data for a scene-graph node.
#[derive(Clone, Debug)]
pub struct Node {
    /// Display name, used to build node paths in logs.
    pub name: String,
    parent: Option<Entity>,
    children: Vec<Entity>,
    active: bool,
}

impl Node {
    fn new(name: impl Into<String>, parent: Option<Entity>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            active: true,
        }
    }

    /// Parent node, if any.
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// The node's own active flag (ignores ancestors).
    pub fn is_active_self(&self) -> bool {
        self.active
    }
}

/// The world that panels and their controllers live in.
///
/// Owns the `hecs` world plus a frame counter. Call [`SceneGraph::tick`] once
/// per frame to advance every running panel animation and active transition.
pub struct SceneGraph {
    world: World,
    frame: u64,
    next_transition_id: u64,
}

impl SceneGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            frame: 0,
            next_transition_id: 0,
        }
    }

    /// Number of ticks processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Escape hatch: the underlying `hecs` world.
    ///
    /// ```
    /// use panelkit::{Node, SceneGraph, World};
    ///
    /// let mut graph = SceneGraph::new();
    /// let hud = graph.spawn("hud");
    ///
    /// let world: &World = graph.world();
    /// let node = world.get::<&Node>(hud).unwrap();
    /// assert_eq!(node.name, "hud");
    /// assert!(node.is_active_self());
    /// ```
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Escape hatch: the underlying `hecs` world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Spawn a root node.
    pub fn spawn(&mut self, name: impl Into<String>) -> Entity {
        let node = Node::new(name, None);
        tracing::trace!(name = %node.name, "spawn root node");
        self.world.spawn((node,))
    }

    /// Spawn a node under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: Entity,
        name: impl Into<String>,
    ) -> Result<Entity, PanelError> {
        if self.world.get::<&Node>(parent).is_err() {
            return Err(PanelError::NoSuchNode(parent));
        }

        let child = self.world.spawn((Node::new(name, Some(parent)),));
        if let Ok(node) = self.world.query_one_mut::<&mut Node>(parent) {
            node.children.push(child);
        }
        tracing::trace!(path = %self.path(child), "spawn child node");
        Ok(child)
    }

    /// `true` while the node (or any entity) has not been destroyed.
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Parent of a node, if it has one and is alive.
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world
            .get::<&Node>(entity)
            .ok()
            .and_then(|node| node.parent())
            .filter(|parent| self.world.contains(*parent))
    }

    /// Direct children of a node.
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<&Node>(entity)
            .map(|node| node.children().to_vec())
            .unwrap_or_default()
    }

    /// Slash-separated names from the root down to `entity`.
    pub fn path(&self, entity: Entity) -> String {
        let mut names = Vec::new();
        let mut current = Some(entity);
        while let Some(e) = current {
            match self.world.get::<&Node>(e) {
                Ok(node) => {
                    names.push(node.name.clone());
                    current = node.parent();
                }
                Err(_) => break,
            }
        }

        if names.is_empty() {
            return format!("<destroyed {entity:?}>");
        }
        names.reverse();
        names.join("/")
    }

    /// Toggle a node's own active flag. No-op for destroyed nodes.
    pub fn set_active(&mut self, entity: Entity, active: bool) {
        if let Ok(node) = self.world.query_one_mut::<&mut Node>(entity) {
            node.active = active;
        }
    }

    /// The node's own active flag; `false` once destroyed.
    pub fn is_active_self(&self, entity: Entity) -> bool {
        self.world
            .get::<&Node>(entity)
            .map(|node| node.is_active_self())
            .unwrap_or(false)
    }

    /// `true` when the node and all of its ancestors are active.
    pub fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(e) = current {
            match self.world.get::<&Node>(e) {
                Ok(node) if node.is_active_self() => current = node.parent(),
                _ => return false,
            }
        }
        true
    }

    /// Destroy a node and its whole subtree.
    ///
    /// Every component on those entities goes with them, including panel
    /// controllers and their active transitions.
    pub fn destroy(&mut self, entity: Entity) {
        let Some(parent) = self.world.get::<&Node>(entity).ok().map(|n| n.parent()) else {
            return;
        };
        tracing::trace!(path = %self.path(entity), "destroy node");

        if let Some(parent) = parent {
            if let Ok(node) = self.world.query_one_mut::<&mut Node>(parent) {
                node.children.retain(|child| *child != entity);
            }
        }

        let mut doomed = vec![entity];
        let mut i = 0;
        while i < doomed.len() {
            doomed.extend(self.children(doomed[i]));
            i += 1;
        }
        for e in doomed {
            let _ = self.world.despawn(e);
        }
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Attach a component to a node, replacing one of the same type.
    pub fn insert<T: hecs::Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), PanelError> {
        self.world
            .insert_one(entity, component)
            .map_err(|_| PanelError::NoSuchNode(entity))
    }

    /// `true` if the entity is alive and carries a `T`.
    pub fn has<T: hecs::Component>(&self, entity: Entity) -> bool {
        self.world.get::<&T>(entity).is_ok()
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advance one frame by `dt` seconds.
    ///
    /// Order: frame counter, panels' own animations, controllers' active
    /// transitions.
    pub fn tick(&mut self, dt: f32) {
        self.frame += 1;
        panel::tick_animations(self, dt);
        controller::tick_active_transitions(self, dt);
    }

    pub(crate) fn next_transition_id(&mut self) -> u64 {
        self.next_transition_id += 1;
        self.next_transition_id
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_walks_up_to_root() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn("root");
        let a = graph.spawn_child(root, "a").unwrap();
        let b = graph.spawn_child(a, "b").unwrap();

        assert_eq!(graph.path(b), "root/a/b");
        assert_eq!(graph.parent(b), Some(a));
        assert_eq!(graph.children(root), vec![a]);
    }

    #[test]
    fn destroy_removes_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn("root");
        let a = graph.spawn_child(root, "a").unwrap();
        let b = graph.spawn_child(a, "b").unwrap();
        let sibling = graph.spawn_child(root, "sibling").unwrap();

        graph.destroy(a);

        assert!(!graph.contains(a));
        assert!(!graph.contains(b));
        assert!(graph.contains(sibling));
        assert_eq!(graph.children(root), vec![sibling]);
        assert!(graph.path(a).starts_with("<destroyed"));
    }

    #[test]
    fn spawn_child_of_destroyed_parent_fails() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn("root");
        graph.destroy(root);

        assert!(matches!(
            graph.spawn_child(root, "orphan"),
            Err(PanelError::NoSuchNode(e)) if e == root
        ));
    }

    #[test]
    fn active_in_hierarchy_respects_ancestors() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn("root");
        let child = graph.spawn_child(root, "child").unwrap();

        assert!(graph.is_active_in_hierarchy(child));
        graph.set_active(root, false);
        assert!(graph.is_active_self(child));
        assert!(!graph.is_active_in_hierarchy(child));
    }

    #[test]
    fn node_component_tracks_hierarchy() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn("root");
        let child = graph.spawn_child(root, "child").unwrap();
        graph.set_active(child, false);

        let node = graph.world().get::<&Node>(root).unwrap();
        assert_eq!(node.parent(), None);
        assert_eq!(node.children(), &[child]);
        drop(node);

        let node = graph.world().get::<&Node>(child).unwrap();
        assert_eq!(node.parent(), Some(root));
        assert!(!node.is_active_self());
    }

    #[test]
    fn tick_advances_frame_counter() {
        let mut graph = SceneGraph::new();
        graph.tick(0.016);
        graph.tick(0.016);
        assert_eq!(graph.frame(), 2);
    }
}
