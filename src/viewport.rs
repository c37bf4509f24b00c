//! Pan/zoom state and pointer hit-testing for an interactive view.
//!
//! The scene is drawn with `translate(w/2 + ox, h/2 + oy) · scale(s) ·
//! translate(-w/2, -h/2)`, zooming about the canvas center.

use crate::config::{LayoutConfig, ViewportConfig};
use crate::layout::{Layout, NodeLayout};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: (f32, f32),
    pub canvas: (f32, f32),
    drag_start: Option<(f32, f32)>,
    limits: ViewportConfig,
}

impl Viewport {
    pub fn new(width: f32, height: f32, limits: ViewportConfig) -> Self {
        Self {
            scale: 1.0,
            offset: (0.0, 0.0),
            canvas: (width, height),
            drag_start: None,
            limits,
        }
    }

    /// Jumps to `scale`, clamped to the configured range.
    pub fn zoom_to(&mut self, scale: f32) {
        self.scale = scale.clamp(self.limits.min_scale, self.limits.max_scale);
    }

    pub fn pan_to(&mut self, x: f32, y: f32) {
        self.offset = (x, y);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to(self.scale + self.limits.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to(self.scale - self.limits.zoom_step);
    }

    /// Wheel scrolled down (positive delta) zooms out, up zooms in.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.zoom_out();
        } else {
            self.zoom_in();
        }
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = (0.0, 0.0);
        self.drag_start = None;
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.drag_start = Some((x, y));
    }

    /// Pans by the pointer delta since the last drag event, in scene units.
    pub fn drag_to(&mut self, x: f32, y: f32) {
        let Some((sx, sy)) = self.drag_start else {
            return;
        };
        self.offset.0 += (x - sx) / self.scale;
        self.offset.1 += (y - sy) / self.scale;
        self.drag_start = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.drag_start = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        let (cx, cy) = (self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        (
            (x - cx) * self.scale + cx + self.offset.0,
            (y - cy) * self.scale + cy + self.offset.1,
        )
    }

    pub fn to_world(&self, x: f32, y: f32) -> (f32, f32) {
        let (cx, cy) = (self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        (
            (x - cx - self.offset.0) / self.scale + cx,
            (y - cy - self.offset.1) / self.scale + cy,
        )
    }

    /// SVG `transform` attribute value for the scene group.
    pub fn svg_transform(&self) -> String {
        let (cx, cy) = (self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        format!(
            "translate({:.2} {:.2}) scale({:.3}) translate({:.2} {:.2})",
            cx + self.offset.0,
            cy + self.offset.1,
            self.scale,
            -cx,
            -cy
        )
    }
}

/// First node (in level order) whose center lies within the node radius.
pub fn hit_node<'a>(
    layout: &'a Layout,
    point: (f32, f32),
    config: &LayoutConfig,
) -> Option<&'a NodeLayout> {
    layout.ordered_nodes().find(|node| {
        let dx = point.0 - node.x;
        let dy = point.1 - node.y;
        (dx * dx + dy * dy).sqrt() <= config.node_radius
    })
}

/// Id of the first path with a connector segment near `point`.
pub fn hit_path<'a>(layout: &'a Layout, point: (f32, f32), config: &LayoutConfig) -> Option<&'a str> {
    layout
        .edges
        .iter()
        .find(|edge| {
            edge.points
                .windows(2)
                .any(|seg| distance_to_segment(point, seg[0], seg[1]) < config.hit_tolerance)
        })
        .map(|edge| edge.path_id.as_str())
}

/// What the pointer is over: a node wins over a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Hover {
    Node(String),
    Path(String),
    Nothing,
}

pub fn hover_at(layout: &Layout, viewport: &Viewport, screen: (f32, f32), config: &LayoutConfig) -> Hover {
    let point = viewport.to_world(screen.0, screen.1);
    if let Some(node) = hit_node(layout, point, config) {
        return Hover::Node(node.id.clone());
    }
    match hit_path(layout, point, config) {
        Some(path_id) => Hover::Path(path_id.to_string()),
        None => Hover::Nothing,
    }
}

pub(crate) fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (cx, cy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = cx * cx + cy * cy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * cx + (p.1 - a.1) * cy) / len_sq).clamp(0.0, 1.0)
    };
    let (x, y) = (a.0 + t * cx, a.1 + t * cy);
    ((p.0 - x).powi(2) + (p.1 - y).powi(2)).sqrt()
}
