//! DOT rendering for Kinfold.
//!
//! Projects a [`PersonRegistry`] into Graphviz `strict digraph` text. Every
//! name in the registry becomes a box node; a child with both parents known
//! hangs off a point-shaped union node shared by the couple.
//!
//! [`PersonRegistry`]: kin_registry::PersonRegistry

pub mod dot;

pub use dot::{to_dot, to_dot_with, GraphOptions};
