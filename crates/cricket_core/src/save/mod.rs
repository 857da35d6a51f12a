// Match archive for the statistics collaborator
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod sink;
pub mod worker;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, MatchRecord};
pub use sink::{load_from_path, write_atomic, FileSummarySink, InMemorySink, SummarySink};
pub use worker::{PersistenceWorker, WorkerStats};

pub const ARCHIVE_VERSION: u32 = 1;
