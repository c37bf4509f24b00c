use serde::{Deserialize, Serialize};

/// Path colors, assigned to paths in discovery order.
pub const PATH_COLORS: [&str; 12] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#06b6d4", "#3b82f6", "#8b5cf6", "#d946ef",
    "#ec4899", "#f43f5e", "#84cc16", "#14b8a6",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub hover_font_size: f32,
    pub info_font_size: f32,
    pub background: String,
    pub source_fill: String,
    pub target_fill: String,
    pub intermediate_fill: String,
    pub node_stroke: String,
    pub node_shadow: String,
    pub label_background: String,
    pub edge_label_background: String,
    pub text_color: String,
    pub info_text_color: String,
    pub path_colors: Vec<String>,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12.0,
            hover_font_size: 14.0,
            info_font_size: 11.0,
            background: "#f9fafb".to_string(),
            source_fill: "#3b82f6".to_string(),
            target_fill: "#8b5cf6".to_string(),
            intermediate_fill: "#10b981".to_string(),
            node_stroke: "#ffffff".to_string(),
            node_shadow: "rgba(0, 0, 0, 0.2)".to_string(),
            label_background: "rgba(255, 255, 255, 0.8)".to_string(),
            edge_label_background: "rgba(255, 255, 255, 0.9)".to_string(),
            text_color: "#000000".to_string(),
            info_text_color: "#4b5563".to_string(),
            path_colors: PATH_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Color of the path at `index`; the palette repeats cyclically.
    pub fn path_color(&self, index: usize) -> &str {
        if self.path_colors.is_empty() {
            return PATH_COLORS[index % PATH_COLORS.len()];
        }
        &self.path_colors[index % self.path_colors.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_colors_cycle_through_palette() {
        let theme = Theme::classic();
        for idx in 0..30 {
            assert_eq!(theme.path_color(idx), PATH_COLORS[idx % 12]);
        }
    }

    #[test]
    fn short_palette_still_cycles() {
        let mut theme = Theme::classic();
        theme.path_colors = vec!["#000".to_string(), "#fff".to_string()];
        assert_eq!(theme.path_color(0), "#000");
        assert_eq!(theme.path_color(3), "#fff");
    }
}
