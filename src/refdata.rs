pub mod fx;
pub mod ufe;

pub use fx::FxRateTable;
pub use ufe::UfeTable;
