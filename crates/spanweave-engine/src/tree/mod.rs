//! # Span Tree
//!
//! Turns the flat storage format into a nested tree fit for rendering.
//!
//! Stored spans are plain ranges and may cross each other freely, while any
//! rendered markup has to nest. The builder resolves the ranges into a tree in
//! which every node's children partition its text exactly, splitting crossing
//! spans where needed. Consecutive list items are grouped under list nodes.
//!
//! ## Modules
//!
//! - **`types`**: `Tree`, `TreeNode`, `NodeData`, `TreeKey`
//! - **`builder`**: `as_tree()` and the span resolution worklist
//! - **`outline`**: indented text outline of a tree, for debugging and tests

pub mod builder;
pub mod outline;
pub mod types;

pub use builder::as_tree;
pub use types::{NodeData, Tree, TreeKey, TreeNode};
