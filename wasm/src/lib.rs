use kinpath::config::Config;
use kinpath::layout_dump::QueryDump;
use kinpath::render::{RenderState, render_svg};
use kinpath::view::ConnectionView;
use kinpath::viewport::{self, Viewport};
use kinpath::Dataset;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionOptions {
    width: Option<f32>,
    height: Option<f32>,
    max_depth: Option<usize>,
    font_family: Option<String>,
    highlight: Option<String>,
    hovered: Option<String>,
    scale: Option<f32>,
    offset_x: Option<f32>,
    offset_y: Option<f32>,
}

fn parse_options(options_json: Option<String>) -> Result<ConnectionOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(to_js_error),
        None => Ok(ConnectionOptions::default()),
    }
}

fn build_config(options: &ConnectionOptions) -> Config {
    let mut config = Config::default();
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(depth) = options.max_depth {
        config.search.max_depth = depth;
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    config
}

fn build_viewport(options: &ConnectionOptions, config: &Config) -> Viewport {
    let mut viewport = Viewport::new(config.render.width, config.render.height, config.viewport.clone());
    if let Some(scale) = options.scale {
        viewport.zoom_to(scale);
    }
    viewport.pan_to(options.offset_x.unwrap_or(0.0), options.offset_y.unwrap_or(0.0));
    viewport
}

fn to_js_error(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn load(dataset_json: &str) -> Result<Dataset, JsValue> {
    Dataset::from_json_str(dataset_json).map_err(to_js_error)
}

/// Paths, positions and routes for a query, as JSON.
#[wasm_bindgen]
pub fn find_connections(
    dataset_json: &str,
    source: &str,
    target: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let dataset = load(dataset_json)?;
    let config = build_config(&parse_options(options_json)?);
    let view = ConnectionView::resolve(&dataset, source, target, &config);
    let layout = view.layout(&dataset, &config);
    QueryDump::from_view(&view, &layout)
        .to_json()
        .map_err(to_js_error)
}

#[wasm_bindgen]
pub fn render_connections_svg(
    dataset_json: &str,
    source: &str,
    target: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let dataset = load(dataset_json)?;
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let view = ConnectionView::resolve(&dataset, source, target, &config);
    let layout = view.layout(&dataset, &config);
    let state = RenderState {
        highlighted_path: options.highlight,
        hovered_node: options.hovered,
        viewport: Some(build_viewport(&options, &config)),
    };
    Ok(render_svg(&layout, &config.theme, &config.layout, &state))
}

/// What sits under the pointer at screen `(x, y)` for the view the options
/// describe, as `{"kind":"node","id":..}`, `{"kind":"path","id":..}` or
/// `{"kind":"nothing"}`.
#[wasm_bindgen]
pub fn hover_at(
    dataset_json: &str,
    source: &str,
    target: &str,
    options_json: Option<String>,
    x: f32,
    y: f32,
) -> Result<String, JsValue> {
    let dataset = load(dataset_json)?;
    let options = parse_options(options_json)?;
    let config = build_config(&options);
    let view = ConnectionView::resolve(&dataset, source, target, &config);
    let layout = view.layout(&dataset, &config);
    let hover = viewport::hover_at(&layout, &build_viewport(&options, &config), (x, y), &config.layout);
    serde_json::to_string(&hover).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILY: &str = r#"{
        "people": [
            {"id": "1", "name": "Bobur", "gender": "male", "info": "Talaba"},
            {"id": "2", "name": "Zaxro", "gender": "female"},
            {"id": "3", "name": "Kamron", "gender": "male"}
        ],
        "connections": [
            {"source": "1", "target": "2", "relationship": "Singlisi"},
            {"source": "2", "target": "3", "relationship": "Akasi"}
        ]
    }"#;

    #[test]
    fn options_override_defaults() {
        let options = parse_options(Some(r#"{"width": 800, "maxDepth": 2}"#.to_string())).unwrap();
        let config = build_config(&options);
        assert_eq!(config.render.width, 800.0);
        assert_eq!(config.search.max_depth, 2);
        assert_eq!(config.render.height, 700.0);
    }

    #[test]
    fn renders_found_paths() {
        let svg = render_connections_svg(FAMILY, "Bobur", "Kamron", Some(r#"{"highlight": "path1"}"#.to_string()))
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Kamron"));
        assert!(svg.contains(">Akasi<"));
    }

    #[test]
    fn dumps_query_as_json() {
        let json = find_connections(FAMILY, "Bobur", "Kamron", None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["paths"][0]["description"], "Bobur ning singlisi Zaxro ning akasi Kamron");
        assert!(value["fallback"].is_null());
    }

    #[test]
    fn viewport_options_reach_the_svg() {
        let options = r#"{"scale": 1.5, "offsetX": 30, "offsetY": -10}"#.to_string();
        let svg = render_connections_svg(FAMILY, "Bobur", "Kamron", Some(options)).unwrap();
        assert!(svg.contains("translate(630.00 340.00) scale(1.500) translate(-600.00 -350.00)"));

        let options = parse_options(Some(r#"{"scale": 40}"#.to_string())).unwrap();
        let config = build_config(&options);
        assert_eq!(build_viewport(&options, &config).scale, config.viewport.max_scale);
    }

    #[test]
    fn hover_follows_pan() {
        let json = find_connections(FAMILY, "Bobur", "Kamron", None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let kamron = value["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|node| node["name"] == "Kamron")
            .unwrap();
        let (x, y) = (kamron["x"].as_f64().unwrap() as f32, kamron["y"].as_f64().unwrap() as f32);

        let hit = hover_at(FAMILY, "Bobur", "Kamron", None, x, y).unwrap();
        assert_eq!(hit, r#"{"kind":"node","id":"3"}"#);

        let panned = Some(r#"{"offsetX": 50}"#.to_string());
        let hit = hover_at(FAMILY, "Bobur", "Kamron", panned.clone(), x + 50.0, y).unwrap();
        assert_eq!(hit, r#"{"kind":"node","id":"3"}"#);
        let miss = hover_at(FAMILY, "Bobur", "Kamron", panned, 1.0, 1.0).unwrap();
        assert_eq!(miss, r#"{"kind":"nothing"}"#);
    }
}
