use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid bounding box for track {track_id}: {bbox:?}")]
    InvalidBBox { track_id: u32, bbox: [f32; 4] },

    #[error("Malformed frame at line {line}: {source}")]
    MalformedFrame {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}
