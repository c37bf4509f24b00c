use crate::config::LayoutConfig;
use crate::dataset::Dataset;
use crate::pathfinder::ConnectionPath;

use super::{EdgeLayout, NodeLayout};
use std::collections::BTreeMap;

/// Routes one connector per hop of every path whose ends were placed.
pub(super) fn route_edges(
    paths: &[ConnectionPath],
    dataset: &Dataset,
    nodes: &BTreeMap<String, NodeLayout>,
    config: &LayoutConfig,
) -> Vec<EdgeLayout> {
    let mut edges = Vec::new();
    for (path_index, path) in paths.iter().enumerate() {
        let ids: Vec<Option<&str>> = path
            .path
            .iter()
            .map(|name| dataset.person_by_name(name).map(|p| p.id.as_str()))
            .collect();
        for (hop, pair) in ids.windows(2).enumerate() {
            let (Some(from_id), Some(to_id)) = (pair[0], pair[1]) else {
                continue;
            };
            let (Some(from), Some(to)) = (nodes.get(from_id), nodes.get(to_id)) else {
                continue;
            };
            let (points, label_anchor) = connector(from, to, config);
            edges.push(EdgeLayout {
                path_id: path.id.clone(),
                path_index,
                from: from_id.to_string(),
                to: to_id.to_string(),
                relationship: path.relationships.get(hop).cloned().unwrap_or_default(),
                color: path.color.clone(),
                points,
                label_anchor,
            });
        }
    }
    edges
}

/// Flat segment between the facing sides for nodes on one row, otherwise an
/// orthogonal run through the vertical midpoint.
pub(super) fn connector(
    from: &NodeLayout,
    to: &NodeLayout,
    config: &LayoutConfig,
) -> (Vec<(f32, f32)>, (f32, f32)) {
    let r = config.node_radius;
    let mid_x = (from.x + to.x) / 2.0;
    if (from.y - to.y).abs() < config.same_level_tolerance {
        let dir = if to.x >= from.x { 1.0 } else { -1.0 };
        let points = vec![(from.x + r * dir, from.y), (to.x - r * dir, to.y)];
        return (points, (mid_x, from.y - config.label_offset));
    }

    let dir = if to.y >= from.y { 1.0 } else { -1.0 };
    let mid_y = (from.y + to.y) / 2.0;
    let points = vec![
        (from.x, from.y + r * dir),
        (from.x, mid_y),
        (to.x, mid_y),
        (to.x, to.y - r * dir),
    ];
    (points, (mid_x, mid_y))
}
