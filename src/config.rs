use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Force and interaction tunables for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub link_distance: f32,
    pub charge_strength: f32,
    pub barnes_hut_theta: f32,
    pub collide_padding: f32,
    pub collide_strength: f32,
    pub depth_x_strength: f32,
    pub center_y_strength: f32,
    pub avoidance_padding: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub warmup_ticks: usize,
    pub drag_alpha_target: f32,
    pub drag_alpha: f32,
    pub drag_ticks_per_move: usize,
    pub release_alpha: f32,
    pub release_ticks: usize,
    pub preserve_positions: bool,
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 200.0,
            charge_strength: -800.0,
            barnes_hut_theta: 0.9,
            collide_padding: 35.0,
            collide_strength: 1.0,
            depth_x_strength: 0.35,
            center_y_strength: 0.1,
            avoidance_padding: 15.0,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            warmup_ticks: 150,
            drag_alpha_target: 0.3,
            drag_alpha: 0.7,
            drag_ticks_per_move: 4,
            release_alpha: 0.1,
            release_ticks: 5,
            preserve_positions: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub window_size: [f32; 2],
    pub show_labels: bool,
    pub edge_tooltips: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            window_size: [1440.0, 920.0],
            show_labels: true,
            edge_tooltips: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    pub view: ViewConfig,
}

pub fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "asset-lineage")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default(explicit: Option<&Path>) -> ViewerConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Some(path) => path,
            None => return ViewerConfig::default(),
        },
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        tracing::debug!(path = %path.display(), "no viewer config, using defaults");
        return ViewerConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|error| {
        tracing::warn!(path = %path.display(), %error, "invalid viewer config, using defaults");
        ViewerConfig::default()
    })
}

pub fn save(cfg: &ViewerConfig, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_file_path().ok_or_else(|| anyhow::anyhow!("no config directory available"))?,
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write viewer config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn viewer_config_roundtrip_save_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("viewer.toml");
        let mut cfg = ViewerConfig::default();
        cfg.layout.seed = Some(7);
        cfg.layout.preserve_positions = true;

        save_to_path(&cfg, &path).expect("save config");
        let loaded = load_or_default_from_path(&path);

        assert_eq!(cfg, loaded);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.toml");
        fs::write(&path, "[layout]\nlink_distance = 120.0\n").expect("write");

        let loaded = load_or_default_from_path(&path);
        assert_eq!(loaded.layout.link_distance, 120.0);
        assert_eq!(loaded.layout.warmup_ticks, 150);
        assert_eq!(loaded.view, ViewConfig::default());
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.toml");
        fs::write(&path, "layout = 3").expect("write");

        assert_eq!(load_or_default_from_path(&path), ViewerConfig::default());
    }

    #[test]
    fn default_decay_matches_three_hundred_tick_schedule() {
        let cfg = LayoutConfig::default();
        let mut alpha = 1.0_f32;
        for _ in 0..300 {
            alpha += (0.0 - alpha) * cfg.alpha_decay;
        }
        assert!((alpha - cfg.alpha_min).abs() < 1e-4);
    }
}
