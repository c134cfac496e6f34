pub mod config;
pub mod error;
pub mod graphs;
pub mod queue;
pub mod search;
pub mod utility;

pub use error::{Error, Result};
