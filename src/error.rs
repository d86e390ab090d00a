use hecs::Entity;
use thiserror::Error;

/// Errors from setting up nodes and controllers.
///
/// Transitions themselves never fail; they degrade to no-ops instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    /// The node was never spawned or has been destroyed.
    #[error("node {0:?} does not exist")]
    NoSuchNode(Entity),
    /// A node can carry at most one panel controller.
    #[error("node {0:?} already has a panel controller")]
    AlreadyAttached(Entity),
}
