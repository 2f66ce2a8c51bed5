//! Command implementations

pub mod comply;
pub mod run;
pub mod version;
