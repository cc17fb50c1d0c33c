#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod bigint;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod gcd;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod remainder;
pub mod store;
pub mod tree;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::model::*;
    pub use crate::pipeline::*;
    pub use crate::store::LevelStore;
}
