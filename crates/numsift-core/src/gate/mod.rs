//! Access gate: combined membership check across required channels.

mod access;
mod channel;
mod oracle;

pub use access::{AccessGate, GateReport};
pub use channel::{RequiredChannel, default_channels};
pub use oracle::MembershipOracle;
