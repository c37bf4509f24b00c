use crate::error::{Error, Result};
use crate::theme::Theme;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid color regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of hops explored from the source.
    pub max_depth: usize,
    /// Paths kept per query, in discovery order.
    pub max_paths: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_paths: 12,
        }
    }
}

/// How a node that appears in several paths gets its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LevelPolicy {
    /// Average the stored level with each new occurrence, rounding every
    /// step. Depends on path order.
    #[default]
    RunningAverage,
    /// Round the mean over all occurrences.
    BatchMean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub side_padding: f32,
    pub top_padding: f32,
    /// Level of the target anchor; the source anchor sits at level 0.
    pub max_level: usize,
    pub level_policy: LevelPolicy,
    pub node_radius: f32,
    pub hover_radius: f32,
    /// Connectors between nodes closer than this vertically are drawn flat.
    pub same_level_tolerance: f32,
    pub label_offset: f32,
    pub hit_tolerance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            side_padding: 100.0,
            top_padding: 100.0,
            max_level: 4,
            level_policy: LevelPolicy::RunningAverage,
            node_radius: 30.0,
            hover_radius: 35.0,
            same_level_tolerance: 10.0,
            label_offset: 15.0,
            hit_tolerance: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_step: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 2.0,
            zoom_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 700.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub search: SearchConfig,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            search: SearchConfig::default(),
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    source_fill: Option<String>,
    target_fill: Option<String>,
    intermediate_fill: Option<String>,
    node_stroke: Option<String>,
    label_background: Option<String>,
    text_color: Option<String>,
    info_text_color: Option<String>,
    path_colors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchFile {
    max_depth: Option<usize>,
    max_paths: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    side_padding: Option<f32>,
    top_padding: Option<f32>,
    max_level: Option<usize>,
    level_policy: Option<LevelPolicy>,
    node_radius: Option<f32>,
    hover_radius: Option<f32>,
    same_level_tolerance: Option<f32>,
    label_offset: Option<f32>,
    hit_tolerance: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportFile {
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    zoom_step: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<ThemeFile>,
    search: Option<SearchFile>,
    layout: Option<LayoutFile>,
    viewport: Option<ViewportFile>,
    render: Option<RenderFile>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    if is_json5 {
        parse_config_json5(&contents)
    } else {
        parse_config(&contents)
    }
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(Config::default(), parsed)
}

pub fn parse_config_json5(contents: &str) -> Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    apply_config_file(Config::default(), parsed)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Result<Config> {
    if let Some(theme) = parsed.theme {
        if let Some(v) = theme.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = theme.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = theme.background {
            config.theme.background = v;
        }
        if let Some(v) = theme.source_fill {
            config.theme.source_fill = v;
        }
        if let Some(v) = theme.target_fill {
            config.theme.target_fill = v;
        }
        if let Some(v) = theme.intermediate_fill {
            config.theme.intermediate_fill = v;
        }
        if let Some(v) = theme.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = theme.label_background {
            config.theme.label_background = v;
        }
        if let Some(v) = theme.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = theme.info_text_color {
            config.theme.info_text_color = v;
        }
        if let Some(colors) = theme.path_colors {
            validate_palette(&colors)?;
            config.theme.path_colors = colors;
        }
    }

    if let Some(search) = parsed.search {
        if let Some(v) = search.max_depth {
            config.search.max_depth = v;
        }
        if let Some(v) = search.max_paths {
            config.search.max_paths = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.side_padding {
            config.layout.side_padding = v;
        }
        if let Some(v) = layout.top_padding {
            config.layout.top_padding = v;
        }
        if let Some(v) = layout.max_level {
            config.layout.max_level = v.max(1);
        }
        if let Some(v) = layout.level_policy {
            config.layout.level_policy = v;
        }
        if let Some(v) = layout.node_radius {
            config.layout.node_radius = v;
        }
        if let Some(v) = layout.hover_radius {
            config.layout.hover_radius = v;
        }
        if let Some(v) = layout.same_level_tolerance {
            config.layout.same_level_tolerance = v;
        }
        if let Some(v) = layout.label_offset {
            config.layout.label_offset = v;
        }
        if let Some(v) = layout.hit_tolerance {
            config.layout.hit_tolerance = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.viewport.max_scale = v;
        }
        if let Some(v) = viewport.zoom_step {
            config.viewport.zoom_step = v;
        }
        validate_zoom_range(&config.viewport)?;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    Ok(config)
}

fn validate_zoom_range(viewport: &ViewportConfig) -> Result<()> {
    let (min, max) = (viewport.min_scale, viewport.max_scale);
    if !(min > 0.0 && min <= max) {
        return Err(Error::InvalidZoomRange { min, max });
    }
    Ok(())
}

pub(crate) fn is_hex_color(color: &str) -> bool {
    HEX_COLOR_RE.is_match(color.trim())
}

fn validate_palette(colors: &[String]) -> Result<()> {
    if colors.is_empty() {
        return Err(Error::EmptyPalette);
    }
    for color in colors {
        if !is_hex_color(color) {
            return Err(Error::InvalidColor(color.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_constants() {
        let config = Config::default();
        assert_eq!(config.search.max_depth, 4);
        assert_eq!(config.search.max_paths, 12);
        assert_eq!(config.layout.max_level, 4);
        assert_eq!(config.layout.side_padding, 100.0);
        assert_eq!(config.theme.path_colors.len(), 12);
        assert_eq!(config.render, RenderConfig { width: 1200.0, height: 700.0 });
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn overlays_partial_file() {
        let config = parse_config(
            r##"{
                "search": {"maxDepth": 3},
                "layout": {"levelPolicy": "batchMean", "topPadding": 40},
                "theme": {"pathColors": ["#112233", "#abc"], "background": "#fafafa"}
            }"##,
        )
        .unwrap();
        assert_eq!(config.search.max_depth, 3);
        assert_eq!(config.search.max_paths, 12);
        assert_eq!(config.layout.level_policy, LevelPolicy::BatchMean);
        assert_eq!(config.layout.top_padding, 40.0);
        assert_eq!(config.theme.path_colors, vec!["#112233", "#abc"]);
        assert_eq!(config.theme.background, "#fafafa");
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn accepts_json5() {
        let config = parse_config_json5("{ render: { width: 800, }, }").unwrap();
        assert_eq!(config.render.width, 800.0);
    }

    #[test]
    fn rejects_bad_palette() {
        let err = parse_config(r#"{"theme": {"pathColors": ["red"]}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidColor(color) if color == "red"));
        let err = parse_config(r#"{"theme": {"pathColors": []}}"#).unwrap_err();
        assert!(matches!(err, Error::EmptyPalette));
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let err = parse_config(r#"{"viewport": {"minScale": 3.0, "maxScale": 2.0}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidZoomRange { min, max } if min == 3.0 && max == 2.0));
        let err = parse_config(r#"{"viewport": {"minScale": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidZoomRange { .. }));

        let config = parse_config(r#"{"viewport": {"minScale": 0.25, "maxScale": 4}}"#).unwrap();
        assert_eq!(config.viewport.min_scale, 0.25);
        assert_eq!(config.viewport.max_scale, 4.0);
    }

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.node_radius, 30.0);
    }
}
