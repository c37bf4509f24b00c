use crate::config::Config;
use crate::dataset::Dataset;
use crate::layout::{Layout, LayoutAnchors, compute_layout};
use crate::pathfinder::{ConnectionPath, NoResult, query};

/// Everything shown for one (source, target) query.
///
/// When the query has no result, `paths` holds the dataset's precomputed
/// overview paths and `fallback` says why.
#[derive(Debug, Clone)]
pub struct ConnectionView {
    pub source: String,
    pub target: String,
    pub paths: Vec<ConnectionPath>,
    pub anchors: Option<LayoutAnchors>,
    pub fallback: Option<NoResult>,
}

impl ConnectionView {
    pub fn resolve(dataset: &Dataset, source: &str, target: &str, config: &Config) -> Self {
        match query(dataset, source, target, &config.search, &config.theme) {
            Ok(paths) => Self {
                source: source.to_string(),
                target: target.to_string(),
                paths,
                anchors: Some(LayoutAnchors::new(source, target)),
                fallback: None,
            },
            Err(reason) => {
                log::info!("{source} -> {target}: {reason}; showing overview");
                let paths = dataset.connection_paths().to_vec();
                let anchors = LayoutAnchors::from_first_path(&paths);
                Self {
                    source: source.to_string(),
                    target: target.to_string(),
                    paths,
                    anchors,
                    fallback: Some(reason),
                }
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn layout(&self, dataset: &Dataset, config: &Config) -> Layout {
        let Some(anchors) = &self.anchors else {
            return Layout::empty(config.render.width, config.render.height);
        };
        compute_layout(
            dataset,
            &self.paths,
            anchors,
            config.render.width,
            config.render.height,
            &config.layout,
        )
    }

    /// Lines of the path list panel: "Yo'l N: description".
    pub fn path_lines(&self) -> Vec<String> {
        self.paths
            .iter()
            .enumerate()
            .map(|(idx, path)| format!("Yo'l {}: {}", idx + 1, path.description))
            .collect()
    }
}
