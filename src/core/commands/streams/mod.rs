// src/core/commands/streams/mod.rs

pub mod xadd;
pub mod xrange;
pub mod xread;

pub use xadd::XAdd;
pub use xrange::XRange;
pub use xread::XRead;
