//! Linear-algebra traits and the vector operations built on them.

pub mod traits;
pub mod wrappers;
