use std::collections::HashMap;

use crate::config::LevelPolicy;
use crate::pathfinder::ConnectionPath;

use super::LayoutAnchors;

/// Levels per person name, plus the order in which names were first seen.
#[derive(Debug, Clone, Default)]
pub(super) struct LevelAssignment {
    pub(super) order: Vec<String>,
    pub(super) levels: HashMap<String, usize>,
}

impl LevelAssignment {
    pub(super) fn level(&self, name: &str) -> Option<usize> {
        self.levels.get(name).copied()
    }
}

pub(super) fn relative_level(index: usize, path_len: usize, max_level: usize) -> usize {
    if path_len <= 1 {
        return 0;
    }
    ((index as f32 / (path_len - 1) as f32) * max_level as f32).round() as usize
}

pub(super) fn assign_levels(
    paths: &[ConnectionPath],
    anchors: &LayoutAnchors,
    max_level: usize,
    policy: LevelPolicy,
) -> LevelAssignment {
    let mut assignment = LevelAssignment::default();
    let mut samples: HashMap<String, (usize, usize)> = HashMap::new();

    for path in paths {
        for (index, name) in path.path.iter().enumerate() {
            if !assignment.levels.contains_key(name) {
                assignment.order.push(name.clone());
            }
            let level = if *name == anchors.source {
                0
            } else if *name == anchors.target {
                max_level
            } else {
                let relative = relative_level(index, path.path.len(), max_level);
                match policy {
                    LevelPolicy::RunningAverage => match assignment.levels.get(name) {
                        Some(existing) => ((existing + relative) as f32 / 2.0).round() as usize,
                        None => relative,
                    },
                    LevelPolicy::BatchMean => {
                        let entry = samples.entry(name.clone()).or_insert((0, 0));
                        entry.0 += relative;
                        entry.1 += 1;
                        (entry.0 as f32 / entry.1 as f32).round() as usize
                    }
                }
            };
            assignment.levels.insert(name.clone(), level);
        }
    }

    assignment
}

/// Buckets placeable names by level, keeping first-seen order inside each.
pub(super) fn group_levels(
    assignment: &LevelAssignment,
    is_placeable: impl Fn(&str) -> bool,
) -> Vec<Vec<String>> {
    let Some(max_present) = assignment.levels.values().copied().max() else {
        return Vec::new();
    };
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); max_present + 1];
    for name in &assignment.order {
        if !is_placeable(name) {
            log::warn!("layout: skipping '{name}', not a known person");
            continue;
        }
        if let Some(level) = assignment.level(name) {
            buckets[level].push(name.clone());
        }
    }
    buckets
}

/// One top-down pass of neighbor-index scoring over the intermediate levels.
///
/// A node scores the slot of its predecessor on each path when that
/// predecessor sits on a lower level, plus the slot of its successor when
/// that one sits on a higher level. Nodes are stably sorted by score.
pub(super) fn order_level_nodes(
    buckets: &mut [Vec<String>],
    assignment: &LevelAssignment,
    paths: &[ConnectionPath],
    max_level: usize,
) {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let update_positions = |buckets: &[Vec<String>], positions: &mut HashMap<String, usize>| {
        positions.clear();
        for bucket in buckets {
            for (idx, name) in bucket.iter().enumerate() {
                positions.insert(name.clone(), idx);
            }
        }
    };
    update_positions(buckets, &mut positions);

    for level in 0..buckets.len() {
        if level == 0 || level == max_level || buckets[level].len() <= 1 {
            continue;
        }
        let scores: HashMap<String, usize> = buckets[level]
            .iter()
            .map(|name| {
                let score = neighbor_score(name, level, paths, assignment, &positions);
                (name.clone(), score)
            })
            .collect();
        buckets[level].sort_by_key(|name| scores.get(name).copied().unwrap_or(0));
        update_positions(buckets, &mut positions);
    }
}

fn neighbor_score(
    name: &str,
    level: usize,
    paths: &[ConnectionPath],
    assignment: &LevelAssignment,
    positions: &HashMap<String, usize>,
) -> usize {
    let mut score = 0;
    for path in paths {
        let Some(idx) = path.path.iter().position(|n| n == name) else {
            continue;
        };
        if idx > 0 {
            let prev = &path.path[idx - 1];
            if assignment.level(prev).is_some_and(|l| l < level) {
                score += positions.get(prev).copied().unwrap_or(0);
            }
        }
        if let Some(next) = path.path.get(idx + 1)
            && assignment.level(next).is_some_and(|l| l > level)
        {
            score += positions.get(next).copied().unwrap_or(0);
        }
    }
    score
}
