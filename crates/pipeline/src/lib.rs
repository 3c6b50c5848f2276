pub mod extract;
pub mod orchestrator;
pub mod store;

pub use extract::{ExtractError, MockExtractor, PdftotextExtractor, TextExtractor};
pub use orchestrator::{
    BatchOutcome, FileKind, FileReport, IngestPipeline, PipelineError, UploadedFile,
    MAX_FILE_BYTES,
};
pub use store::{MemoryStore, StoreError, StoredTransaction, TransactionStore};
