mod controls;
mod details;
mod editor;
mod panels;

pub(in crate::app) use details::{edge_tooltip, node_tooltip};
pub(in crate::app) use editor::EditorState;
