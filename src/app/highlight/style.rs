use eframe::egui::Color32;

use super::{EdgeRole, NodeRole};

const DEFAULT_FILL: Color32 = Color32::from_rgb(0x42, 0x85, 0xf4);
const DEFAULT_STROKE: Color32 = Color32::from_rgb(0x33, 0x67, 0xd6);
const SELECTED_FILL: Color32 = Color32::from_rgb(0xea, 0x43, 0x35);
const SELECTED_STROKE: Color32 = Color32::from_rgb(0xc5, 0x0f, 0x0f);
const DEPENDENCY_FILL: Color32 = Color32::from_rgb(0x34, 0xa8, 0x53);
const DEPENDENCY_STROKE: Color32 = Color32::from_rgb(0x0f, 0x78, 0x3e);
const USER_FILL: Color32 = Color32::from_rgb(0xfb, 0xbc, 0x05);
const USER_STROKE: Color32 = Color32::from_rgb(0xd0, 0x97, 0x00);
const EDGE_GRAY: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
const MATCH_LABEL: Color32 = Color32::from_rgb(0xff, 0xff, 0x00);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NodeStyle {
    pub(crate) fill: Color32,
    pub(crate) stroke: Color32,
    pub(crate) stroke_width: f32,
    pub(crate) opacity: f32,
    pub(crate) label: Color32,
    pub(crate) label_strong: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgeStyle {
    pub(crate) stroke: Color32,
    pub(crate) width: f32,
    pub(crate) opacity: f32,
    pub(crate) arrow: Color32,
}

/// Role to appearance lookup, built once and consulted per draw.
#[derive(Clone, Debug)]
pub(crate) struct StyleTable {
    nodes: [NodeStyle; NodeRole::COUNT],
    edges: [EdgeStyle; EdgeRole::COUNT],
}

impl StyleTable {
    pub(crate) fn standard() -> Self {
        let node = |fill, stroke, stroke_width| NodeStyle {
            fill,
            stroke,
            stroke_width,
            opacity: 1.0,
            label: Color32::WHITE,
            label_strong: false,
        };
        let base = node(DEFAULT_FILL, DEFAULT_STROKE, 2.0);

        let edge = |stroke, width, opacity, arrow| EdgeStyle {
            stroke,
            width,
            opacity,
            arrow,
        };

        let mut nodes = [base; NodeRole::COUNT];
        nodes[NodeRole::Selected as usize] = node(SELECTED_FILL, SELECTED_STROKE, 3.0);
        nodes[NodeRole::DirectDependency as usize] = node(DEPENDENCY_FILL, DEPENDENCY_STROKE, 3.0);
        nodes[NodeRole::DirectUser as usize] = node(USER_FILL, USER_STROKE, 3.0);
        nodes[NodeRole::SearchMatch as usize] = NodeStyle {
            fill: SELECTED_FILL,
            label: MATCH_LABEL,
            label_strong: true,
            ..base
        };
        nodes[NodeRole::Unrelated as usize] = NodeStyle {
            opacity: 0.2,
            ..base
        };

        let mut edges = [edge(EDGE_GRAY, 2.5, 1.0, DEFAULT_STROKE); EdgeRole::COUNT];
        edges[EdgeRole::Outgoing as usize] = edge(USER_FILL, 3.0, 1.0, USER_FILL);
        edges[EdgeRole::Incoming as usize] = edge(DEPENDENCY_FILL, 3.0, 1.0, DEPENDENCY_FILL);
        edges[EdgeRole::InClosure as usize] = edge(EDGE_GRAY, 2.5, 0.7, DEFAULT_STROKE);
        edges[EdgeRole::SearchBothMatch as usize] = edge(EDGE_GRAY, 2.5, 1.0, DEPENDENCY_FILL);
        edges[EdgeRole::SearchOneMatch as usize] = edge(EDGE_GRAY, 2.5, 1.0, USER_FILL);
        edges[EdgeRole::Outside as usize] = edge(EDGE_GRAY, 2.5, 0.1, DEFAULT_STROKE);

        Self { nodes, edges }
    }

    pub(crate) fn node(&self, role: NodeRole) -> NodeStyle {
        self.nodes[role as usize]
    }

    pub(crate) fn edge(&self, role: EdgeRole) -> EdgeStyle {
        self.edges[role as usize]
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighted_roles_stand_out() {
        let table = StyleTable::standard();
        assert_eq!(table.node(NodeRole::Default).fill, DEFAULT_FILL);
        assert_eq!(table.node(NodeRole::Indirect), table.node(NodeRole::Default));
        assert_eq!(table.node(NodeRole::Selected).stroke_width, 3.0);
        assert_eq!(table.node(NodeRole::Unrelated).opacity, 0.2);
        assert!(table.node(NodeRole::SearchMatch).label_strong);

        assert_eq!(table.edge(EdgeRole::Outgoing).arrow, USER_FILL);
        assert_eq!(table.edge(EdgeRole::Incoming).arrow, DEPENDENCY_FILL);
        assert_eq!(table.edge(EdgeRole::Outside).opacity, 0.1);
        assert_eq!(table.edge(EdgeRole::SearchConnected).opacity, 1.0);
        assert_eq!(table.edge(EdgeRole::SearchConnected).arrow, DEFAULT_STROKE);
    }
}
