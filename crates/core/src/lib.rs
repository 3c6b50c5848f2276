pub mod period;
pub mod result;
pub mod transaction;

pub use period::DateRange;
pub use result::{FileMetadata, ParsedFileResult};
pub use transaction::{CategorizedTransaction, CategorySource, RawTransaction, TxnKind};
