pub mod lot;
pub mod tx;
