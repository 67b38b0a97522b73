//! Helpers shared by several analysis passes
//!
//! Nothing here rewrites the tree; passes call these to decide what to rewrite.

pub mod overloads;
pub mod type_utilities;
