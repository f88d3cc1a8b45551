use crate::geometry::Point;
use crate::layout::{CardGeometry, LayoutParams, HORIZONTAL_SPACING, LEAF_SLOT_HEIGHT, PALETTE};
use crate::routing::ConnectorStyle;
use crate::viewport::{ViewportLimits, DEFAULT_PAN, MAX_SCALE, MIN_SCALE, ZOOM_SENSITIVITY};
use clap::Parser;
use config::{Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_CARD_WIDTH: f64 = 280.0;
const DEFAULT_CARD_HEIGHT: f64 = 110.0;
const DEFAULT_PORT_OFFSET: f64 = 50.0;
// Screen pixels covered by one terminal cell
const DEFAULT_CELL_WIDTH: f64 = 8.0;
const DEFAULT_CELL_HEIGHT: f64 = 16.0;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Layered config: defaults -> file -> env -> args.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    leaf_slot_height: Option<f64>,
    horizontal_spacing: Option<f64>,
    card_width: Option<f64>,
    card_height: Option<f64>,
    port_offset: Option<f64>,
    min_scale: Option<f64>,
    max_scale: Option<f64>,
    zoom_sensitivity: Option<f64>,
    default_pan_x: Option<f64>,
    default_pan_y: Option<f64>,
    connector_style: Option<String>,
    cell_width: Option<f64>,
    cell_height: Option<f64>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub filename: Option<PathBuf>,
    pub leaf_slot_height: f64,
    pub horizontal_spacing: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub port_offset: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_sensitivity: f64,
    pub default_pan_x: f64,
    pub default_pan_y: f64,
    pub connector_style: ConnectorStyle,
    pub cell_width: f64,
    pub cell_height: f64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            filename: None,
            leaf_slot_height: LEAF_SLOT_HEIGHT,
            horizontal_spacing: HORIZONTAL_SPACING,
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
            port_offset: DEFAULT_PORT_OFFSET,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            default_pan_x: DEFAULT_PAN.x,
            default_pan_y: DEFAULT_PAN.y,
            connector_style: ConnectorStyle::default(),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            leaf_slot_height: self.leaf_slot_height,
            horizontal_spacing: self.horizontal_spacing,
            palette_size: PALETTE.len(),
        }
    }

    pub fn card(&self) -> CardGeometry {
        CardGeometry {
            width: self.card_width,
            height: self.card_height,
            port_offset: self.port_offset,
        }
    }

    pub fn viewport_limits(&self) -> ViewportLimits {
        ViewportLimits {
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            sensitivity: self.zoom_sensitivity,
            default_pan: Point::new(self.default_pan_x, self.default_pan_y),
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Pannable, zoomable concept-tree diagrams", long_about = None)]
pub struct CliArgs {
    /// Path to the concept forest (JSON)
    pub filename: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the diagram as SVG and exit
    #[arg(long, value_name = "PATH")]
    pub export_svg: Option<PathBuf>,

    /// Write the layout and viewport snapshot as JSON and exit
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    #[arg(long)]
    pub leaf_slot_height: Option<f64>,
    #[arg(long)]
    pub horizontal_spacing: Option<f64>,
    #[arg(long)]
    pub card_width: Option<f64>,
    #[arg(long)]
    pub card_height: Option<f64>,
    #[arg(long)]
    pub port_offset: Option<f64>,
    #[arg(long)]
    pub min_scale: Option<f64>,
    #[arg(long)]
    pub max_scale: Option<f64>,
    #[arg(long)]
    pub zoom_sensitivity: Option<f64>,
    /// Connector style: straight, curved or step
    #[arg(long)]
    pub style: Option<String>,
    #[arg(long)]
    pub cell_width: Option<f64>,
    #[arg(long)]
    pub cell_height: Option<f64>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix("CANVAS").separator("__");
    // Missing env vars are fine; a failed collect just means no overrides.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config_from_args(args.clone(), Some(env_map))
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "concept-canvas").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn build_config_from_args(
    args: CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args.config.clone().or_else(default_config_path);

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;
    let defaults = AppConfig::default();

    let style_tag = args.style.or(loaded.connector_style);
    let connector_style = match style_tag {
        Some(tag) => tag
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("{e}")))?,
        None => defaults.connector_style,
    };

    let config = AppConfig {
        filename: args.filename,
        leaf_slot_height: args
            .leaf_slot_height
            .or(loaded.leaf_slot_height)
            .unwrap_or(defaults.leaf_slot_height),
        horizontal_spacing: args
            .horizontal_spacing
            .or(loaded.horizontal_spacing)
            .unwrap_or(defaults.horizontal_spacing),
        card_width: args
            .card_width
            .or(loaded.card_width)
            .unwrap_or(defaults.card_width),
        card_height: args
            .card_height
            .or(loaded.card_height)
            .unwrap_or(defaults.card_height),
        port_offset: args
            .port_offset
            .or(loaded.port_offset)
            .unwrap_or(defaults.port_offset),
        min_scale: args
            .min_scale
            .or(loaded.min_scale)
            .unwrap_or(defaults.min_scale),
        max_scale: args
            .max_scale
            .or(loaded.max_scale)
            .unwrap_or(defaults.max_scale),
        zoom_sensitivity: args
            .zoom_sensitivity
            .or(loaded.zoom_sensitivity)
            .unwrap_or(defaults.zoom_sensitivity),
        default_pan_x: loaded.default_pan_x.unwrap_or(defaults.default_pan_x),
        default_pan_y: loaded.default_pan_y.unwrap_or(defaults.default_pan_y),
        connector_style,
        cell_width: args
            .cell_width
            .or(loaded.cell_width)
            .unwrap_or(defaults.cell_width),
        cell_height: args
            .cell_height
            .or(loaded.cell_height)
            .unwrap_or(defaults.cell_height),
        log_level: args
            .log_level
            .or(loaded.log_level)
            .unwrap_or(defaults.log_level),
        log_file: args.log_file.or(loaded.log_file),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let positive = [
        ("leaf_slot_height", config.leaf_slot_height),
        ("horizontal_spacing", config.horizontal_spacing),
        ("card_width", config.card_width),
        ("card_height", config.card_height),
        ("min_scale", config.min_scale),
        ("max_scale", config.max_scale),
        ("zoom_sensitivity", config.zoom_sensitivity),
        ("cell_width", config.cell_width),
        ("cell_height", config.cell_height),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be a positive number, got {value}"
            )));
        }
    }

    if config.min_scale > config.max_scale {
        return Err(ConfigError::ValidationError(format!(
            "min_scale ({}) must not exceed max_scale ({})",
            config.min_scale, config.max_scale
        )));
    }

    if config.port_offset < 0.0 || config.port_offset > config.card_height {
        return Err(ConfigError::ValidationError(
            "port_offset must lie within the card height".to_string(),
        ));
    }

    Ok(())
}
