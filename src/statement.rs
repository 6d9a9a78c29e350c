pub mod doc;
pub mod summary;
pub mod tx_line;

pub use doc::{AccountInfo, StatementDocument, StatementPeriod};
pub use summary::SnapshotEntry;
