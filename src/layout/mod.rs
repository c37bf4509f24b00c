mod ranking;
mod routing;
pub(crate) mod types;
pub use types::*;
use ranking::*;
use routing::*;

use crate::config::LayoutConfig;
use crate::dataset::Dataset;
use crate::pathfinder::ConnectionPath;
use std::collections::BTreeMap;

/// Places every person named in `paths` on a level grid.
///
/// Levels come from each name's relative position along its paths, with the
/// anchors pinned to the first and last level. Each level is spread evenly
/// across the padded width; rows are `height / (levels present)` apart.
/// Names that do not resolve to a person are left out. The result depends
/// only on the inputs.
pub fn compute_layout(
    dataset: &Dataset,
    paths: &[ConnectionPath],
    anchors: &LayoutAnchors,
    width: f32,
    height: f32,
    config: &LayoutConfig,
) -> Layout {
    if paths.is_empty() {
        return Layout::empty(width, height);
    }

    let assignment = assign_levels(paths, anchors, config.max_level, config.level_policy);
    let mut buckets = group_levels(&assignment, |name| dataset.person_by_name(name).is_some());
    order_level_nodes(&mut buckets, &assignment, paths, config.max_level);

    let level_count = buckets.len().max(1);
    let level_spacing = height / level_count as f32;
    let usable_width = (width - config.side_padding * 2.0).max(0.0);

    let mut nodes = BTreeMap::new();
    let mut levels = Vec::with_capacity(buckets.len());
    for (level, bucket) in buckets.iter().enumerate() {
        let y = level_spacing * level as f32 + config.top_padding;
        let spacing = usable_width / (bucket.len() + 1) as f32;
        let mut ids = Vec::with_capacity(bucket.len());
        for (slot, name) in bucket.iter().enumerate() {
            let Some(person) = dataset.person_by_name(name) else {
                continue;
            };
            let role = if *name == anchors.source {
                NodeRole::Source
            } else if *name == anchors.target {
                NodeRole::Target
            } else {
                NodeRole::Intermediate
            };
            nodes.insert(
                person.id.clone(),
                NodeLayout {
                    id: person.id.clone(),
                    name: person.name.clone(),
                    info: person.info.clone(),
                    gender: person.gender,
                    level,
                    slot,
                    x: config.side_padding + spacing * (slot + 1) as f32,
                    y,
                    role,
                },
            );
            ids.push(person.id.clone());
        }
        levels.push(ids);
    }

    let edges = route_edges(paths, dataset, &nodes, config);
    log::debug!(
        "layout: {} node(s) on {} level(s), {} connector(s)",
        nodes.len(),
        levels.len(),
        edges.len()
    );

    Layout {
        nodes,
        levels,
        edges,
        width,
        height,
    }
}
