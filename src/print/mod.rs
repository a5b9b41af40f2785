//! Message composition and emission
//!
//! A [`MessageSink`] collects appended values and writes them once, when it
//! goes out of scope, to the destinations chosen by its [`Destination`] mask.

mod color;
mod destination;
mod sink;

pub use color::{PrintColor, RESET};
pub use destination::Destination;
pub use sink::MessageSink;
