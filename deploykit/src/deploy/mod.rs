//! Deployment argument resolution
//!
//! This module declares the constructor schema of each deployment target and
//! resolves it into an ordered, validated argument list for the external
//! deployment engine. It never deploys, signs or broadcasts anything.

mod types;
mod target;
mod resolver;
mod deployed;

pub use types::*;
pub use target::*;
pub use resolver::*;
pub use deployed::*;
