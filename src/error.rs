use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Song not found: {0}")]
    UnknownSong(String),

    #[error("Invalid input event #{index}: {message}")]
    InvalidEvent { index: usize, message: String },

    #[error("Invalid session timing: {0}")]
    InvalidTiming(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
