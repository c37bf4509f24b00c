#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod pathfinder;
pub mod relationship;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod view;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::Config;
pub use dataset::{Connection, Dataset, Gender, Person};
pub use error::{Error, Result};
pub use layout::{Layout, LayoutAnchors, compute_layout};
pub use pathfinder::{ConnectionPath, NoResult, find_paths, query};
pub use render::{RenderState, render_svg};
pub use view::ConnectionView;
