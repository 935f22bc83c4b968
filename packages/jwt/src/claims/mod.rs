//! Token claims: the registered set and merging it with caller claims

mod merge;
mod standard;

pub use merge::merge;
pub use standard::Claims;

pub(crate) use standard::asserted;
