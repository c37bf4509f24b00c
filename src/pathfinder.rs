//! Bounded depth-first search for simple paths between two people.
//!
//! The connection graph is walked in both directions: outgoing connections
//! keep their label, incoming ones are reversed against the gender of the
//! person being stepped to. Paths are kept in discovery order, outgoing
//! neighbors before incoming ones, each group in dataset order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SearchConfig;
use crate::dataset::{Connection, Dataset, Gender};
use crate::relationship::{describe_path, reverse_relationship};
use crate::theme::Theme;

/// A simple path as found by the search, in person ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPath {
    pub node_ids: Vec<String>,
    /// `relationships[i]` reads "node i's label is node i+1".
    pub relationships: Vec<String>,
}

/// A path ready for display: names, labels, description and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPath {
    pub id: String,
    pub path: Vec<String>,
    pub relationships: Vec<String>,
    pub description: String,
    pub color: String,
}

/// Why a query produced no paths. The caller shows an overview instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoResult {
    #[error("unknown source person '{0}'")]
    UnknownSource(String),
    #[error("unknown target person '{0}'")]
    UnknownTarget(String),
    #[error("no connecting path found")]
    NoPaths,
}

struct Search<'a> {
    dataset: &'a Dataset,
    target: &'a str,
    max_depth: usize,
    max_paths: usize,
    visited: HashSet<&'a str>,
    nodes: Vec<&'a str>,
    relationships: Vec<String>,
    found: Vec<FoundPath>,
}

impl<'a> Search<'a> {
    fn is_full(&self) -> bool {
        self.found.len() >= self.max_paths
    }

    fn visit(&mut self, current: &'a str, depth: usize) {
        if depth > self.max_depth || self.is_full() {
            return;
        }
        if current == self.target {
            let mut node_ids: Vec<String> = self.nodes.iter().map(|id| id.to_string()).collect();
            node_ids.push(current.to_string());
            self.found.push(FoundPath {
                node_ids,
                relationships: self.relationships.clone(),
            });
            return;
        }

        self.visited.insert(current);
        self.nodes.push(current);

        let dataset = self.dataset;
        for conn in dataset.outgoing(current) {
            if self.visited.contains(conn.target.as_str()) {
                continue;
            }
            self.step(conn.target.as_str(), conn.relationship.clone(), depth);
        }
        for conn in dataset.incoming(current) {
            if self.visited.contains(conn.source.as_str()) {
                continue;
            }
            let reversed = reverse_relationship(&conn.relationship, self.gender_of(conn));
            self.step(conn.source.as_str(), reversed, depth);
        }

        self.nodes.pop();
        self.visited.remove(current);
    }

    fn step(&mut self, next: &'a str, relationship: String, depth: usize) {
        if self.is_full() {
            return;
        }
        self.relationships.push(relationship);
        self.visit(next, depth + 1);
        self.relationships.pop();
    }

    fn gender_of(&self, conn: &Connection) -> Gender {
        self.dataset
            .person_by_id(&conn.source)
            .map(|person| person.gender)
            .unwrap_or(Gender::Male)
    }
}

/// Finds up to `config.max_paths` simple paths of at most `config.max_depth`
/// hops from `source_id` to `target_id`.
///
/// A query from a person to themselves yields the single path `[id]`.
pub fn find_paths(
    dataset: &Dataset,
    source_id: &str,
    target_id: &str,
    config: &SearchConfig,
) -> Vec<FoundPath> {
    let (Some(source), Some(target)) = (
        dataset.person_by_id(source_id),
        dataset.person_by_id(target_id),
    ) else {
        return Vec::new();
    };

    let mut search = Search {
        dataset,
        target: target.id.as_str(),
        max_depth: config.max_depth,
        max_paths: config.max_paths,
        visited: HashSet::new(),
        nodes: Vec::new(),
        relationships: Vec::new(),
        found: Vec::new(),
    };
    search.visit(source.id.as_str(), 0);
    log::debug!(
        "search {} -> {}: {} path(s) within {} hop(s)",
        source.name,
        target.name,
        search.found.len(),
        config.max_depth
    );
    search.found
}

impl ConnectionPath {
    /// Turns the `index`-th found path into its display form. `None` when
    /// any id does not resolve to a person.
    pub fn from_found(index: usize, found: &FoundPath, dataset: &Dataset, theme: &Theme) -> Option<Self> {
        let path = found
            .node_ids
            .iter()
            .map(|id| dataset.person_by_id(id).map(|person| person.name.clone()))
            .collect::<Option<Vec<String>>>()?;
        let description = describe_path(&path, &found.relationships);
        Some(Self {
            id: format!("path{}", index + 1),
            path,
            relationships: found.relationships.clone(),
            description,
            color: theme.path_color(index).to_string(),
        })
    }
}

/// Resolves both names and searches between them.
pub fn query(
    dataset: &Dataset,
    source_name: &str,
    target_name: &str,
    config: &SearchConfig,
    theme: &Theme,
) -> Result<Vec<ConnectionPath>, NoResult> {
    let source = dataset
        .person_by_name(source_name)
        .ok_or_else(|| NoResult::UnknownSource(source_name.to_string()))?;
    let target = dataset
        .person_by_name(target_name)
        .ok_or_else(|| NoResult::UnknownTarget(target_name.to_string()))?;

    let found = find_paths(dataset, &source.id, &target.id, config);
    if found.is_empty() {
        return Err(NoResult::NoPaths);
    }
    let mut paths = Vec::with_capacity(found.len());
    for path in &found {
        if let Some(path) = ConnectionPath::from_found(paths.len(), path, dataset, theme) {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(NoResult::NoPaths);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{conn, person};
    use crate::theme::PATH_COLORS;

    fn small_family() -> Dataset {
        Dataset::new(
            vec![
                person("a", "A", Gender::Male),
                person("b", "B", Gender::Male),
                person("c", "C", Gender::Female),
                person("d", "D", Gender::Male),
            ],
            vec![
                conn("a", "b", "Otasi"),
                conn("b", "c", "Singlisi"),
                conn("d", "c", "Onasi"),
                conn("a", "d", "Do'sti"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn single_edge_scenario() {
        let dataset = Dataset::new(
            vec![person("a", "A", Gender::Male), person("b", "B", Gender::Male)],
            vec![conn("a", "b", "Otasi")],
        )
        .unwrap();
        let paths = query(&dataset, "A", "B", &SearchConfig::default(), &Theme::classic()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].path, vec!["A", "B"]);
        assert_eq!(paths[0].relationships, vec!["Otasi"]);
        assert_eq!(paths[0].description, "A ning otasi B");
        assert_eq!(paths[0].id, "path1");
        assert_eq!(paths[0].color, PATH_COLORS[0]);
    }

    #[test]
    fn incoming_edges_are_walked_with_reversed_labels() {
        let dataset = small_family();
        let found = find_paths(&dataset, "b", "a", &SearchConfig::default());
        assert_eq!(found.len(), 2);
        // The outgoing b -> c branch is exhausted first and loops back via d.
        assert_eq!(found[0].node_ids, vec!["b", "c", "d", "a"]);
        assert_eq!(found[0].relationships, vec!["Singlisi", "O'g'li", "Do'sti"]);
        // a's Otasi is b, so b's label for a depends on a's gender.
        assert_eq!(found[1].node_ids, vec!["b", "a"]);
        assert_eq!(found[1].relationships, vec!["O'g'li"]);
    }

    #[test]
    fn explores_outgoing_before_incoming() {
        let dataset = small_family();
        let found = find_paths(&dataset, "a", "c", &SearchConfig::default());
        let ids: Vec<Vec<&str>> = found
            .iter()
            .map(|p| p.node_ids.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(ids, vec![vec!["a", "b", "c"], vec!["a", "d", "c"]]);
        assert_eq!(found[1].relationships, vec!["Do'sti", "Onasi"]);
    }

    #[test]
    fn paths_are_simple_and_bounded() {
        let dataset = small_family();
        for path in find_paths(&dataset, "b", "d", &SearchConfig::default()) {
            let unique: HashSet<&String> = path.node_ids.iter().collect();
            assert_eq!(unique.len(), path.node_ids.len());
            assert!(path.node_ids.len() <= 5);
            assert_eq!(path.relationships.len(), path.node_ids.len() - 1);
            assert_eq!(path.node_ids.first().map(String::as_str), Some("b"));
            assert_eq!(path.node_ids.last().map(String::as_str), Some("d"));
        }
    }

    #[test]
    fn same_person_yields_trivial_path() {
        let dataset = small_family();
        let found = find_paths(&dataset, "a", "a", &SearchConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node_ids, vec!["a"]);
        assert!(found[0].relationships.is_empty());
    }

    #[test]
    fn respects_depth_bound() {
        let people: Vec<_> = (0..7)
            .map(|i| person(&format!("p{i}"), &format!("P{i}"), Gender::Male))
            .collect();
        let connections: Vec<_> = (0..6)
            .map(|i| conn(&format!("p{i}"), &format!("p{}", i + 1), "Do'sti"))
            .collect();
        let dataset = Dataset::new(people, connections).unwrap();
        let config = SearchConfig::default();
        assert_eq!(find_paths(&dataset, "p0", "p4", &config).len(), 1);
        assert!(find_paths(&dataset, "p0", "p5", &config).is_empty());
        assert_eq!(
            query(&dataset, "P0", "P5", &config, &Theme::classic()),
            Err(NoResult::NoPaths)
        );
    }

    #[test]
    fn caps_paths_at_limit_in_discovery_order() {
        // Source s and target t joined through 15 parallel middle people.
        let mut people = vec![
            person("s", "S", Gender::Male),
            person("t", "T", Gender::Female),
        ];
        let mut connections = Vec::new();
        for i in 0..15 {
            let id = format!("m{i}");
            people.push(person(&id, &format!("M{i}"), Gender::Male));
            connections.push(conn("s", &id, "Do'sti"));
            connections.push(conn(&id, "t", "Hamkasbi"));
        }
        let dataset = Dataset::new(people, connections).unwrap();
        let paths = query(&dataset, "S", "T", &SearchConfig::default(), &Theme::classic()).unwrap();
        assert_eq!(paths.len(), 12);
        for (idx, path) in paths.iter().enumerate() {
            assert_eq!(path.path[1], format!("M{idx}"));
            assert_eq!(path.color, PATH_COLORS[idx % 12]);
            assert_eq!(path.id, format!("path{}", idx + 1));
        }
    }

    #[test]
    fn unknown_names_signal_no_result() {
        let dataset = small_family();
        let config = SearchConfig::default();
        let theme = Theme::classic();
        assert_eq!(
            query(&dataset, "Nobody", "A", &config, &theme),
            Err(NoResult::UnknownSource("Nobody".to_string()))
        );
        assert_eq!(
            query(&dataset, "A", "Nobody", &config, &theme),
            Err(NoResult::UnknownTarget("Nobody".to_string()))
        );
        assert!(find_paths(&dataset, "zz", "a", &config).is_empty());
    }

    #[test]
    fn never_passes_through_the_target() {
        let dataset = small_family();
        for path in find_paths(&dataset, "a", "b", &SearchConfig::default()) {
            let inner = &path.node_ids[..path.node_ids.len() - 1];
            assert!(!inner.iter().any(|id| id == "b"));
        }
    }

    #[test]
    fn unresolved_ids_drop_the_whole_path() {
        let dataset = small_family();
        let theme = Theme::classic();
        let found = FoundPath {
            node_ids: vec!["a".to_string(), "ghost".to_string(), "c".to_string()],
            relationships: vec!["Do'sti".to_string(), "Do'sti".to_string()],
        };
        assert!(ConnectionPath::from_found(0, &found, &dataset, &theme).is_none());

        let found = FoundPath {
            node_ids: vec!["a".to_string(), "b".to_string()],
            relationships: vec!["Otasi".to_string()],
        };
        let path = ConnectionPath::from_found(1, &found, &dataset, &theme).unwrap();
        assert_eq!(path.id, "path2");
        assert_eq!(path.path, vec!["A", "B"]);
        assert_eq!(path.relationships.len() + 1, path.path.len());
    }
}
