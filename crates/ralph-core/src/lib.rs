pub mod config;
pub mod error;
pub mod io;
pub mod prd;
pub mod prompt;
pub mod ratelimit;
pub mod screen;
pub mod store;

pub use error::{RalphError, Result};
