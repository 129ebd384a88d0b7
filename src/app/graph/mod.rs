mod build;
mod depth;
mod interaction;
mod scene;
mod view;

#[cfg(test)]
pub(in crate::app) use build::node_radius;
pub(in crate::app) use scene::GraphScene;

/// Notifications from the canvas back to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum GraphEvent {
    /// A node was clicked.
    NodeActivated(String),
    /// The empty background was clicked.
    FilterReset,
}
