pub mod bookkeeping;
pub mod model;
pub mod render;

pub use bookkeeping::lot_matcher::{LotMatcher, SecurityGains};
pub use bookkeeping::reconcile::{check_snapshot_entry, ReconcileWarning};
pub use model::lot::{Lot, LotConsumption, SellMatch};
pub use model::tx::{Tx, TxAction, TxSignature};

pub type Symbol = String;
