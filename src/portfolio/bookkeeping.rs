pub mod lot_matcher;
pub mod reconcile;

pub use lot_matcher::{LotMatcher, SecurityGains};
pub use reconcile::{check_snapshot_entry, ReconcileWarning};
