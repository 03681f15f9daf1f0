//! Table-driven LR(0)/LR(1) parser generator.
//!
//! Describe a grammar with [Grammar], compile it with [LrTable::build] (the
//! const parameter selects LR(0) or LR(1)), then run [LrParser] over any
//! token source implementing [traits::Lexer]. Ambiguities of the grammar
//! under the chosen mode surface as structured construction errors; syntax
//! errors at parse time carry the offending token, its position and the
//! terminals that would have been valid.

pub use tablr_core::*;
