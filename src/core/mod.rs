//! Byte-level building blocks shared by the splitter and the key expansion.

pub mod gf256;
pub mod key_schedule;
pub mod xor;
