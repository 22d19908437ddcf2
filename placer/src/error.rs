use std::path::PathBuf;

pub type PlacerResult<T> = Result<T, PlacerError>;

#[derive(thiserror::Error, Debug)]
pub enum PlacerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("corpus has no usable images")]
    EmptyCorpus,

    #[error("failed to decode '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to spawn worker thread")]
    Spawn(#[from] std::io::Error),
}

impl PlacerError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
