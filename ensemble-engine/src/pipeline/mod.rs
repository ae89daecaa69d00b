//! Generation pipeline stages
//!
//! Stages run in order: hard filter → soft scoring → ranking → assembly
//! → validation. Each stage is a pure function over immutable inputs;
//! the degradation controller (`crate::degrade`) composes them per tier.

pub mod assemble;
pub mod filter;
pub mod rank;
pub mod score;
pub mod validate;
