use thiserror::Error;

/// Errors raised while loading a dataset or a config file.
///
/// Query outcomes ("no such person", "no path") are not errors; see
/// [`crate::pathfinder::NoResult`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON5 error: {0}")]
    Json5(#[from] json5::Error),

    #[error("duplicate person id '{0}'")]
    DuplicatePersonId(String),

    #[error("duplicate person name '{0}'")]
    DuplicatePersonName(String),

    #[error("connection {index} references unknown person id '{id}'")]
    DanglingConnection { index: usize, id: String },

    #[error("invalid color '{0}' (expected #rgb or #rrggbb)")]
    InvalidColor(String),

    #[error("path color palette must not be empty")]
    EmptyPalette,

    #[error("invalid zoom range {min}..{max} (need 0 < minScale <= maxScale)")]
    InvalidZoomRange { min: f32, max: f32 },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_connection_names_the_id() {
        let err = Error::DanglingConnection {
            index: 3,
            id: "p9".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("connection 3"));
        assert!(text.contains("'p9'"));
    }

    #[test]
    fn io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
