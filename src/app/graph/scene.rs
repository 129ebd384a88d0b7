use std::collections::{HashMap, HashSet};
use std::time::Instant;

use eframe::egui::{Vec2, vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::Entity;
use crate::config::LayoutConfig;

use super::super::geometry::{EdgePath, arrow_glyph, compute_path};
use super::super::physics::{Simulation, seed_positions};
use super::super::RenderGraph;

const EDGE_HIT_TOLERANCE: f32 = 6.0;

/// One render pass: the graph, its simulation and the per-tick edge routes.
/// Rebuilt wholesale whenever the catalog or the viewport changes.
pub(in crate::app) struct GraphScene {
    graph: RenderGraph,
    simulation: Simulation,
    config: LayoutConfig,
    viewport: Vec2,
    revision: u64,
    paths: Vec<EdgePath>,
    /// Edges whose arrowhead has already been reported as unplaceable.
    unplaceable_arrows: HashSet<usize>,
    drag: Option<usize>,
}

impl GraphScene {
    pub(in crate::app) fn build(
        entities: &[Entity],
        viewport: Vec2,
        config: &LayoutConfig,
        revision: u64,
        previous: Option<&GraphScene>,
    ) -> Self {
        let started = Instant::now();
        let mut graph = RenderGraph::from_entities(entities);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        seed_positions(&mut graph, viewport, &mut rng);

        if config.preserve_positions
            && let Some(previous) = previous
        {
            let prior = previous
                .graph
                .nodes
                .iter()
                .map(|node| (node.id.as_str(), node.pos))
                .collect::<HashMap<_, _>>();
            for node in &mut graph.nodes {
                if let Some(&pos) = prior.get(node.id.as_str()) {
                    node.pos = pos;
                }
            }
        }

        let mut simulation = Simulation::new(&graph, viewport, config);
        simulation.run(&mut graph, config.warmup_ticks);

        let mut scene = Self {
            graph,
            simulation,
            config: config.clone(),
            viewport,
            revision,
            paths: Vec::new(),
            unplaceable_arrows: HashSet::new(),
            drag: None,
        };
        scene.settle();

        tracing::info!(
            nodes = scene.graph.nodes.len(),
            edges = scene.graph.edges.len(),
            max_depth = scene.graph.max_depth,
            alpha = scene.simulation.alpha(),
            warmup_ms = started.elapsed().as_millis() as u64,
            "layout pass built"
        );
        scene
    }

    /// One explicit synchronisation step after warm-up.
    pub(in crate::app) fn settle(&mut self) {
        self.simulation.tick(&mut self.graph);
        self.clamp_to_viewport();
        self.refresh_paths();
    }

    /// Advances the simulation by one tick if it is still warm. Returns
    /// whether anything moved.
    pub(in crate::app) fn step_frame(&mut self) -> bool {
        if !self.simulation.is_active() {
            return false;
        }
        self.settle();
        true
    }

    /// Re-energizes the current layout without reseeding it.
    pub(in crate::app) fn reheat(&mut self) {
        self.simulation.restart();
    }

    pub(in crate::app) fn is_current(&self, revision: u64, viewport: Vec2) -> bool {
        self.revision == revision
            && (self.viewport.x - viewport.x).abs() <= 0.5
            && (self.viewport.y - viewport.y).abs() <= 0.5
    }

    pub(in crate::app) fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    pub(in crate::app) fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub(in crate::app) fn edge_paths(&self) -> &[EdgePath] {
        &self.paths
    }

    pub(in crate::app) fn dragged(&self) -> Option<usize> {
        self.drag
    }

    fn clamp_to_viewport(&mut self) {
        let (width, height) = (self.viewport.x, self.viewport.y);
        for node in &mut self.graph.nodes {
            let r = node.radius;
            node.pos = vec2(
                r.max((width - r).min(node.pos.x)),
                r.max((height - r).min(node.pos.y)),
            );
        }
    }

    fn refresh_paths(&mut self) {
        let nodes = &self.graph.nodes;
        self.paths.clear();
        self.paths.extend(
            self.graph
                .edges
                .iter()
                .map(|edge| compute_path(&nodes[edge.source], &nodes[edge.target])),
        );
        self.note_unplaceable_arrows();
    }

    /// Warns once per pass for each edge whose arrowhead cannot be placed.
    fn note_unplaceable_arrows(&mut self) {
        for (index, path) in self.paths.iter().enumerate() {
            if arrow_glyph(path.arrow).is_none() && self.unplaceable_arrows.insert(index) {
                tracing::warn!(edge = index, "arrowhead skipped, geometry is not finite");
            }
        }
    }

    /// Topmost node under `point` (scene coordinates).
    pub(in crate::app) fn node_at(&self, point: Vec2) -> Option<usize> {
        self.graph
            .nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| (node.pos - point).length() <= node.radius)
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn edge_at(&self, point: Vec2) -> Option<usize> {
        self.paths
            .iter()
            .enumerate()
            .filter(|(_, path)| path.start != path.end)
            .map(|(index, path)| (index, path.distance_to(point)))
            .filter(|(_, distance)| *distance <= EDGE_HIT_TOLERANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn begin_drag(&mut self, index: usize) {
        let Some(node) = self.graph.nodes.get_mut(index) else {
            tracing::warn!(index, "drag started on a node that no longer exists");
            return;
        };

        node.pinned = Some(node.pos);
        self.drag = Some(index);
        self.simulation.set_alpha_target(self.config.drag_alpha_target);
        tracing::debug!(node = %node.id, "drag started");
    }

    pub(in crate::app) fn drag_to(&mut self, point: Vec2) {
        let Some(index) = self.drag else {
            return;
        };
        let Some(node) = self.graph.nodes.get_mut(index) else {
            tracing::warn!(index, "stale drag index ignored");
            self.drag = None;
            return;
        };

        node.pinned = Some(point);
        self.simulation.set_alpha(self.config.drag_alpha);
        self.simulation
            .run(&mut self.graph, self.config.drag_ticks_per_move);
        self.clamp_to_viewport();
        self.refresh_paths();
    }

    pub(in crate::app) fn end_drag(&mut self) {
        let Some(index) = self.drag.take() else {
            return;
        };
        match self.graph.nodes.get_mut(index) {
            Some(node) => node.pinned = None,
            None => tracing::warn!(index, "stale drag index ignored"),
        }

        self.simulation.set_alpha_target(0.0);
        self.simulation.set_alpha(self.config.release_alpha);
        self.simulation.run(&mut self.graph, self.config.release_ticks);
        self.clamp_to_viewport();
        self.refresh_paths();
    }
}
