use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};

use super::error::SaveError;
use super::ARCHIVE_VERSION;
use crate::models::MatchSummary;

/// Archived match, as handed to the statistics collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Archive format version for migration
    pub version: u32,
    pub match_id: Uuid,
    /// Archive timestamp (unix milliseconds)
    pub archived_at: i64,
    pub summary: MatchSummary,
}

impl MatchRecord {
    pub fn new(summary: MatchSummary) -> Self {
        Self {
            version: ARCHIVE_VERSION,
            match_id: summary.match_id,
            archived_at: current_timestamp(),
            summary,
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.match_id != self.summary.match_id || self.summary.innings.len() > 2 {
            return Err(SaveError::Corrupted);
        }
        Ok(())
    }
}

/// Serialize and compress a match record
pub fn serialize_and_compress(record: &MatchRecord) -> Result<Vec<u8>, SaveError> {
    record.validate()?;

    // MessagePack with field names, LZ4 with the size prepended
    let msgpack = to_vec_named(record).map_err(SaveError::Serialization)?;
    let compressed = compress_prepend_size(&msgpack);

    // SHA256 checksum at the end
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize a match record
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<MatchRecord, SaveError> {
    // Size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(SaveError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let record: MatchRecord = from_slice(&msgpack).map_err(SaveError::Deserialization)?;

    if record.version > ARCHIVE_VERSION {
        return Err(SaveError::VersionMismatch { found: record.version, expected: ARCHIVE_VERSION });
    }
    record.validate()?;

    Ok(record)
}

pub fn current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::completed_match;

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let record = MatchRecord::new(completed_match().summary().cloned().unwrap());

        let serialized = serialize_and_compress(&record).unwrap();
        let deserialized = decompress_and_deserialize(&serialized).unwrap();

        assert_eq!(record, deserialized);
    }

    #[test]
    fn test_checksum_validation() {
        let record = MatchRecord::new(completed_match().summary().cloned().unwrap());
        let mut serialized = serialize_and_compress(&record).unwrap();

        if let Some(last) = serialized.last_mut() {
            *last = last.wrapping_add(1);
        }

        let result = decompress_and_deserialize(&serialized);
        assert!(matches!(result, Err(SaveError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_archive_is_corrupted() {
        assert!(matches!(decompress_and_deserialize(&[0u8; 10]), Err(SaveError::Corrupted)));
    }

    #[test]
    fn test_mismatched_id_rejected() {
        let mut record = MatchRecord::new(completed_match().summary().cloned().unwrap());
        record.match_id = Uuid::nil();
        assert!(matches!(serialize_and_compress(&record), Err(SaveError::Corrupted)));
    }
}
