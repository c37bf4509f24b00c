use crate::layout::{Layout, NodeRole};
use crate::pathfinder::ConnectionPath;
use crate::view::ConnectionView;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDump {
    pub source: String,
    pub target: String,
    /// Why the overview is shown instead of found paths.
    pub fallback: Option<String>,
    pub width: f32,
    pub height: f32,
    pub paths: Vec<ConnectionPath>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub level: usize,
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub role: NodeRole,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub path_id: String,
    pub from: String,
    pub to: String,
    pub relationship: String,
    pub points: Vec<[f32; 2]>,
    pub label: [f32; 2],
}

impl QueryDump {
    pub fn from_view(view: &ConnectionView, layout: &Layout) -> Self {
        let nodes = layout
            .ordered_nodes()
            .map(|node| NodeDump {
                id: node.id.clone(),
                name: node.name.clone(),
                level: node.level,
                slot: node.slot,
                x: node.x,
                y: node.y,
                role: node.role,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                path_id: edge.path_id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                relationship: edge.relationship.clone(),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
                label: [edge.label_anchor.0, edge.label_anchor.1],
            })
            .collect();

        QueryDump {
            source: view.source.clone(),
            target: view.target.clone(),
            fallback: view.fallback.as_ref().map(|reason| reason.to_string()),
            width: layout.width,
            height: layout.height,
            paths: view.paths.clone(),
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_query_dump(path: &Path, view: &ConnectionView, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = QueryDump::from_view(view, layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::tests::{conn, person};
    use crate::dataset::{Dataset, Gender};

    #[test]
    fn dump_lists_paths_nodes_and_routes() {
        let dataset = Dataset::new(
            vec![person("1", "Bobur", Gender::Male), person("2", "Zaxro", Gender::Female)],
            vec![conn("1", "2", "Singlisi")],
        )
        .unwrap();
        let config = Config::default();
        let view = ConnectionView::resolve(&dataset, "Bobur", "Zaxro", &config);
        let layout = view.layout(&dataset, &config);
        let dump = QueryDump::from_view(&view, &layout);

        assert!(dump.fallback.is_none());
        assert_eq!(dump.paths.len(), 1);
        assert_eq!(dump.nodes.len(), 2);
        assert_eq!(dump.nodes[0].name, "Bobur");
        assert_eq!(dump.edges[0].points.len(), 4);

        let json: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
        assert_eq!(json["paths"][0]["description"], "Bobur ning singlisi Zaxro");
        assert_eq!(json["nodes"][1]["role"], "target");
        assert_eq!(json["edges"][0]["pathId"], "path1");
    }

    #[test]
    fn dump_records_fallback_reason() {
        let dataset = Dataset::new(vec![person("1", "Bobur", Gender::Male)], Vec::new()).unwrap();
        let config = Config::default();
        let view = ConnectionView::resolve(&dataset, "Bobur", "Nobody", &config);
        let layout = view.layout(&dataset, &config);
        let dump = QueryDump::from_view(&view, &layout);
        assert!(dump.fallback.is_some());
        assert!(dump.nodes.is_empty());
    }
}
