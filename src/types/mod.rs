//! Data types for transceiver state.

pub mod squelch;

pub use squelch::SquelchStatus;
