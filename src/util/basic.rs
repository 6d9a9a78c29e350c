// The ubiquitous "stringly-typed" error. Nearly every failure in this crate
// terminates the current statement or calculation, and the only sensible
// handling is to show the message to the user.
pub type SError = String;
