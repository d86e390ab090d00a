use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::graph::SceneGraph;

/// Panel for nodes that intentionally have nothing to animate.
///
/// Every operation is a no-op and every prepared transition completes
/// instantly. With `warn_on_use` set, each call logs one warning naming the
/// frame and node path, which helps find panels that were expected to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubPanel {
    pub warn_on_use: bool,
}

impl Default for StubPanel {
    fn default() -> Self {
        Self { warn_on_use: true }
    }
}

impl StubPanel {
    pub fn new(warn_on_use: bool) -> Self {
        Self { warn_on_use }
    }

    pub(crate) fn note_use(&self, graph: &SceneGraph, host: Entity, operation: &str) {
        if self.warn_on_use {
            tracing::warn!(
                frame = graph.frame(),
                path = %graph.path(host),
                operation,
                "called on stub panel"
            );
        }
    }
}
