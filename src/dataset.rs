use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::is_hex_color;
use crate::error::{Error, Result};
use crate::pathfinder::ConnectionPath;
use crate::relationship::{is_known_relationship, reverse_relationship};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Descriptive attributes shown in the person panel. Opaque to search and layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hobbies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub info: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PersonDetails>,
}

/// A directed labeled edge: `source`'s `relationship` is `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

/// One row of the person panel: a neighbor and how they relate to the
/// selected person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonConnection<'a> {
    pub other: &'a Person,
    pub relationship: String,
    /// `true` when the stored connection starts at the selected person.
    pub outgoing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetFile {
    people: Vec<Person>,
    #[serde(default)]
    connections: Vec<Connection>,
    #[serde(default)]
    connection_paths: Vec<ConnectionPath>,
}

/// The immutable people/connection graph, indexed for lookups.
#[derive(Debug, Clone)]
pub struct Dataset {
    people: Vec<Person>,
    connections: Vec<Connection>,
    connection_paths: Vec<ConnectionPath>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl Dataset {
    pub fn new(people: Vec<Person>, connections: Vec<Connection>) -> Result<Self> {
        Self::with_paths(people, connections, Vec::new())
    }

    /// Builds a dataset that also carries precomputed paths, used as the
    /// overview when a query has no result.
    pub fn with_paths(
        people: Vec<Person>,
        connections: Vec<Connection>,
        connection_paths: Vec<ConnectionPath>,
    ) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(people.len());
        let mut by_name = HashMap::with_capacity(people.len());
        for (idx, person) in people.iter().enumerate() {
            if by_id.insert(person.id.clone(), idx).is_some() {
                return Err(Error::DuplicatePersonId(person.id.clone()));
            }
            if by_name.insert(person.name.clone(), idx).is_some() {
                return Err(Error::DuplicatePersonName(person.name.clone()));
            }
        }

        let mut outgoing = vec![Vec::new(); people.len()];
        let mut incoming = vec![Vec::new(); people.len()];
        for (index, conn) in connections.iter().enumerate() {
            let source = *by_id.get(&conn.source).ok_or_else(|| Error::DanglingConnection {
                index,
                id: conn.source.clone(),
            })?;
            let target = *by_id.get(&conn.target).ok_or_else(|| Error::DanglingConnection {
                index,
                id: conn.target.clone(),
            })?;
            outgoing[source].push(index);
            incoming[target].push(index);
        }
        for path in &connection_paths {
            if !is_hex_color(&path.color) {
                return Err(Error::InvalidColor(path.color.clone()));
            }
        }

        Ok(Self {
            people,
            connections,
            connection_paths,
            by_id,
            by_name,
            outgoing,
            incoming,
        })
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let file: DatasetFile = serde_json::from_str(input)?;
        Self::from_file(file)
    }

    pub fn from_json5_str(input: &str) -> Result<Self> {
        let file: DatasetFile = json5::from_str(input)?;
        Self::from_file(file)
    }

    /// Loads a dataset file; `.json5` files are parsed leniently.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json5 = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json5"))
            .unwrap_or(false);
        let dataset = if is_json5 {
            Self::from_json5_str(&contents)?
        } else {
            Self::from_json_str(&contents)?
        };
        log::info!(
            "loaded {} people and {} connections from {}",
            dataset.people.len(),
            dataset.connections.len(),
            path.display()
        );
        Ok(dataset)
    }

    fn from_file(file: DatasetFile) -> Result<Self> {
        Self::with_paths(file.people, file.connections, file.connection_paths)
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection_paths(&self) -> &[ConnectionPath] {
        &self.connection_paths
    }

    pub fn person_by_id(&self, id: &str) -> Option<&Person> {
        self.by_id.get(id).map(|idx| &self.people[*idx])
    }

    /// Case-sensitive exact match on the person's name.
    pub fn person_by_name(&self, name: &str) -> Option<&Person> {
        self.by_name.get(name).map(|idx| &self.people[*idx])
    }

    /// Connections starting at `id`, in dataset order.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Connection> + '_ {
        self.edges_for(id, &self.outgoing)
    }

    /// Connections ending at `id`, in dataset order.
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &Connection> + '_ {
        self.edges_for(id, &self.incoming)
    }

    fn edges_for<'a>(
        &'a self,
        id: &str,
        index: &'a [Vec<usize>],
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        let list: &[usize] = match self.by_id.get(id) {
            Some(idx) => &index[*idx],
            None => &[],
        };
        list.iter().map(move |conn_idx| &self.connections[*conn_idx])
    }

    /// Every connection touching `id`, phrased from that person's side.
    pub fn connections_of(&self, id: &str) -> Vec<PersonConnection<'_>> {
        let mut rows = Vec::new();
        for conn in &self.connections {
            let outgoing = conn.source == id;
            if !outgoing && conn.target != id {
                continue;
            }
            let other_id = if outgoing { &conn.target } else { &conn.source };
            let Some(other) = self.person_by_id(other_id) else {
                continue;
            };
            let relationship = if outgoing {
                conn.relationship.clone()
            } else {
                reverse_relationship(&conn.relationship, other.gender)
            };
            rows.push(PersonConnection {
                other,
                relationship,
                outgoing,
            });
        }
        rows
    }

    /// Relationship labels the reversal table does not cover, sorted.
    pub fn unknown_relationships(&self) -> Vec<String> {
        self.connections
            .iter()
            .filter(|conn| !is_known_relationship(&conn.relationship))
            .map(|conn| conn.relationship.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn person(id: &str, name: &str, gender: Gender) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            info: String::new(),
            gender,
            details: None,
        }
    }

    pub(crate) fn conn(source: &str, target: &str, relationship: &str) -> Connection {
        Connection {
            source: source.to_string(),
            target: target.to_string(),
            relationship: relationship.to_string(),
        }
    }

    #[test]
    fn parses_dataset_file_shape() {
        let input = r#"{
            "people": [
                {"id": "1", "name": "Bobur", "info": "Talaba", "gender": "male",
                 "details": {"birthDate": "2001-03-04", "hobbies": ["futbol"]}},
                {"id": "2", "name": "Zaxro", "info": "", "gender": "female"}
            ],
            "connections": [
                {"source": "1", "target": "2", "relationship": "Singlisi"}
            ]
        }"#;
        let dataset = Dataset::from_json_str(input).unwrap();
        let bobur = dataset.person_by_name("Bobur").unwrap();
        assert_eq!(bobur.gender, Gender::Male);
        let details = bobur.details.as_ref().unwrap();
        assert_eq!(details.birth_date.as_deref(), Some("2001-03-04"));
        assert_eq!(details.hobbies, vec!["futbol".to_string()]);
        assert!(dataset.connection_paths().is_empty());
        assert_eq!(dataset.outgoing("1").count(), 1);
        assert_eq!(dataset.incoming("2").count(), 1);
        assert_eq!(dataset.incoming("1").count(), 0);
    }

    #[test]
    fn parses_json5() {
        let input = r#"{
            people: [{id: "a", name: "A", gender: "male"},],
            // no connections yet
        }"#;
        let dataset = Dataset::from_json5_str(input).unwrap();
        assert_eq!(dataset.people().len(), 1);
    }

    #[test]
    fn name_lookup_is_case_sensitive() {
        let dataset = Dataset::new(vec![person("a", "Ali", Gender::Male)], Vec::new()).unwrap();
        assert!(dataset.person_by_name("Ali").is_some());
        assert!(dataset.person_by_name("ali").is_none());
    }

    #[test]
    fn rejects_duplicate_ids_and_names() {
        let dup_id = Dataset::new(
            vec![person("a", "A", Gender::Male), person("a", "B", Gender::Male)],
            Vec::new(),
        );
        assert!(matches!(dup_id, Err(Error::DuplicatePersonId(id)) if id == "a"));

        let dup_name = Dataset::new(
            vec![person("a", "A", Gender::Male), person("b", "A", Gender::Male)],
            Vec::new(),
        );
        assert!(matches!(dup_name, Err(Error::DuplicatePersonName(name)) if name == "A"));
    }

    #[test]
    fn rejects_dangling_connections() {
        let result = Dataset::new(
            vec![person("a", "A", Gender::Male)],
            vec![conn("a", "zz", "Do'sti")],
        );
        assert!(matches!(
            result,
            Err(Error::DanglingConnection { index: 0, id }) if id == "zz"
        ));
    }

    #[test]
    fn person_connections_reverse_incoming_labels() {
        let dataset = Dataset::new(
            vec![
                person("a", "A", Gender::Male),
                person("b", "B", Gender::Female),
                person("c", "C", Gender::Male),
            ],
            vec![conn("a", "b", "Onasi"), conn("c", "a", "Otasi")],
        )
        .unwrap();
        let rows = dataset.connections_of("a");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].other.name, "B");
        assert_eq!(rows[0].relationship, "Onasi");
        assert!(rows[0].outgoing);
        assert_eq!(rows[1].other.name, "C");
        assert_eq!(rows[1].relationship, "O'g'li");
        assert!(!rows[1].outgoing);
    }

    #[test]
    fn lists_unknown_relationships_once() {
        let dataset = Dataset::new(
            vec![person("a", "A", Gender::Male), person("b", "B", Gender::Male)],
            vec![
                conn("a", "b", "Bobosi"),
                conn("b", "a", "Bobosi"),
                conn("a", "b", "Do'sti"),
            ],
        )
        .unwrap();
        assert_eq!(dataset.unknown_relationships(), vec!["Bobosi".to_string()]);
    }

    #[test]
    fn rejects_overview_paths_with_non_hex_colors() {
        let input = r#"{
            "people": [{"id": "1", "name": "Bobur", "gender": "male"}],
            "connectionPaths": [{
                "id": "path1", "path": ["Bobur"], "relationships": [],
                "description": "Bobur", "color": "red\" onload=\"alert(1)"
            }]
        }"#;
        let err = Dataset::from_json_str(input).unwrap_err();
        assert!(matches!(err, Error::InvalidColor(color) if color.starts_with("red")));
    }
}
