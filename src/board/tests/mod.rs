//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Leaf counts for move generation
//! - `draw.rs` - Game end: half-move rule, full board, wipe-outs
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `edge_cases.rs` - FEN handling, passes, move parsing
//! - `eval.rs` - Evaluation terms
//! - `search.rs` - Fixed-depth search behaviour
//! - `proptest.rs` - Property-based tests

mod eval;
mod perft;
