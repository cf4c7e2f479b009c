//! Editor configuration: layout constants and the decision engine endpoint.
//!
//! Every section has defaults, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! [layout]
//! vertical_spacing = 300.0
//!
//! [engine]
//! base_url = "https://routing.example.com/v3"
//! ```

use crate::error::ConfigError;
use crate::graph::Position;
use crate::layout::{Clearance, LaneGrid};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Where the start node sits on a fresh or cleared canvas.
    pub start_position: Position,
    pub loader: LoaderLayout,
    pub layout: AutoLayoutConfig,
    pub placer: PlacerConfig,
    pub engine: EngineConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            start_position: Position::new(150.0, 100.0),
            loader: LoaderLayout::default(),
            layout: AutoLayoutConfig::default(),
            placer: PlacerConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Loads a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Positions assigned while rebuilding a graph from a flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderLayout {
    pub origin: Position,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    /// Horizontal shift per node already sharing a level/line/direction slot.
    pub slot_offset: f64,
    /// Vertical shift per provider already sharing a slot.
    pub provider_stack_offset: f64,
}

impl Default for LoaderLayout {
    fn default() -> Self {
        Self {
            origin: Position::new(150.0, 300.0),
            horizontal_spacing: 350.0,
            vertical_spacing: 200.0,
            slot_offset: 80.0,
            provider_stack_offset: 90.0,
        }
    }
}

impl LoaderLayout {
    pub fn grid(&self) -> LaneGrid {
        LaneGrid {
            origin: self.origin,
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
            slot_offset: self.slot_offset,
        }
    }
}

/// Constants of the on-demand global re-flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoLayoutConfig {
    pub origin: Position,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub slot_offset: f64,
    /// Vertical nudge applied to a node colliding within its own lane.
    pub node_spacing: f64,
    /// Node width plus margin.
    pub min_distance_x: f64,
    /// Node height plus margin.
    pub min_distance_y: f64,
    pub max_attempts: usize,
    pub horizontal_nudge: f64,
    pub final_horizontal_nudge: f64,
    pub fallback_columns: usize,
    pub fallback_row_height: f64,
}

impl Default for AutoLayoutConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(150.0, 300.0),
            horizontal_spacing: 350.0,
            vertical_spacing: 250.0,
            slot_offset: 50.0,
            node_spacing: 80.0,
            min_distance_x: 220.0,
            min_distance_y: 140.0,
            max_attempts: 10,
            horizontal_nudge: 50.0,
            final_horizontal_nudge: 30.0,
            fallback_columns: 5,
            fallback_row_height: 100.0,
        }
    }
}

impl AutoLayoutConfig {
    pub fn grid(&self) -> LaneGrid {
        LaneGrid {
            origin: self.origin,
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
            slot_offset: self.slot_offset,
        }
    }

    pub fn clearance(&self) -> Clearance {
        Clearance {
            x: self.min_distance_x,
            y: self.min_distance_y,
        }
    }
}

/// Constants of single-node placement during interactive editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub min_distance: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    /// Vertical shift of the search base for True (up) and False (down).
    pub branch_offset: f64,
    pub spiral_steps: usize,
    pub random_spread_x: f64,
    pub random_spread_y: f64,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 120.0,
            min_distance: 50.0,
            horizontal_spacing: 350.0,
            vertical_spacing: 150.0,
            branch_offset: 100.0,
            spiral_steps: 16,
            random_spread_x: 100.0,
            random_spread_y: 200.0,
        }
    }
}

impl PlacerConfig {
    pub fn clearance(&self) -> Clearance {
        Clearance {
            x: self.node_width + self.min_distance,
            y: self.node_height + self.min_distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v3".to_string(),
            timeout_secs: Some(30),
        }
    }
}
