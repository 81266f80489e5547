//! Error types

mod bind;
mod command;

pub use bind::*;
pub use command::*;
