use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{Color32, Vec2};

use crate::catalog::Entity;
use crate::config::LayoutConfig;
use crate::util::escape_xml;

use super::geometry::arrow_glyph;
use super::graph::GraphScene;
use super::highlight::{Highlight, InteractionMode, StyleTable};
use super::ui::{edge_tooltip, node_tooltip};

const BACKGROUND: &str = "#1b1d22";

fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Serializes one pass as a standalone SVG document.
fn render_svg(scene: &GraphScene, highlight: &Highlight, styles: &StyleTable) -> Result<String> {
    let size = scene.viewport();
    let graph = scene.graph();

    let mut svg = String::new();
    write!(
        svg,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="Inter, system-ui, sans-serif">
  <rect width="100%" height="100%" fill="{BACKGROUND}" />
"##,
        size.x, size.y, size.x, size.y,
    )?;

    for (index, path) in scene.edge_paths().iter().enumerate() {
        if path.start == path.end {
            continue;
        }
        let style = styles.edge(highlight.edges[index]);

        writeln!(svg, "  <g opacity=\"{:.2}\">", style.opacity)?;
        writeln!(
            svg,
            "    <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.1}\"><title>{}</title></path>",
            path.svg_d(),
            hex(style.stroke),
            style.width,
            escape_xml(&edge_tooltip(graph, index)),
        )?;
        match arrow_glyph(path.arrow) {
            Some(glyph) => {
                let points = glyph
                    .points()
                    .iter()
                    .map(|point| format!("{:.2},{:.2}", point.x, point.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(svg, "    <polygon points=\"{points}\" fill=\"{}\" />", hex(style.arrow))?;
            }
            None => tracing::warn!(edge = index, "arrowhead skipped, geometry is not finite"),
        }
        svg.push_str("  </g>\n");
    }

    for (index, node) in graph.nodes.iter().enumerate() {
        let style = styles.node(highlight.nodes[index]);
        writeln!(svg, "  <g opacity=\"{:.2}\">", style.opacity)?;
        writeln!(
            svg,
            "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.1}\"><title>{}</title></circle>",
            node.pos.x,
            node.pos.y,
            node.radius,
            hex(style.fill),
            hex(style.stroke),
            style.stroke_width,
            escape_xml(&node_tooltip(graph, index)),
        )?;
        writeln!(
            svg,
            "    <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"12\"{} text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>",
            node.pos.x,
            node.pos.y,
            hex(style.label),
            if style.label_strong { " font-weight=\"bold\"" } else { "" },
            escape_xml(&node.name),
        )?;
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

pub(in crate::app) fn write_scene_svg(
    scene: &GraphScene,
    highlight: &Highlight,
    styles: &StyleTable,
    path: &Path,
) -> Result<()> {
    let svg = render_svg(scene, highlight, styles)?;
    fs::write(path, svg).with_context(|| format!("failed to write svg {}", path.display()))?;
    tracing::info!(path = %path.display(), "svg exported");
    Ok(())
}

/// Lays out `entities` once at `size` and writes the neutral view to `path`.
pub fn export_svg(entities: &[Entity], size: Vec2, layout: &LayoutConfig, path: &Path) -> Result<()> {
    if !(size.x >= 1.0 && size.y >= 1.0) {
        anyhow::bail!("export size must be at least 1x1, got {}x{}", size.x, size.y);
    }

    let scene = GraphScene::build(entities, size, layout, 0, None);
    let highlight = Highlight::compute(scene.graph(), &InteractionMode::Neutral);
    write_scene_svg(&scene, &highlight, &StyleTable::standard(), path)
}
