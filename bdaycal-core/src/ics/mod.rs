//! Item codec: decoding collection items and generating birthday events.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::parse_components;
