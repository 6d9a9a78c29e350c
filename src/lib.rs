pub mod app;
pub mod cmd;
pub mod log;
pub mod portfolio;
pub mod refdata;
pub mod statement;
pub mod tax;
pub mod tracing;
pub mod util;

#[cfg(test)]
mod testlib;
