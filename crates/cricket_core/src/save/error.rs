use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

impl SaveError {
    /// Whether retrying the same write can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SaveError::Io(_) | SaveError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        let io = SaveError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk busy"));
        assert!(io.is_recoverable());
        assert!(SaveError::Unavailable("offline".to_string()).is_recoverable());
        assert!(!SaveError::ChecksumMismatch.is_recoverable());
        assert!(!SaveError::VersionMismatch { found: 9, expected: 1 }.is_recoverable());
        assert!(!SaveError::FileNotFound { path: "m.cmr".to_string() }.is_recoverable());
    }
}
