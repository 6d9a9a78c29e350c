pub mod approot;
pub mod outfmt;

pub const APP_VERSION: &str = "0.1.0";
