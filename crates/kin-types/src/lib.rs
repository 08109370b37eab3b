//! Foundation types for Kinfold.
//!
//! This crate provides the plain data model shared by every other Kinfold
//! crate. Nothing here enforces graph consistency; that is the job of
//! `kin-registry`.
//!
//! # Key Types
//!
//! - [`Person`] - A named record with optional mother/father name references
//! - [`PersonFields`] - The mergeable part of a person (mother, father, info)
//! - [`TreeData`] - The `{ persons: [...] }` payload of a single tree
//! - [`ForestData`] - All stored trees plus the selected tree name

pub mod error;
pub mod person;
pub mod sample;
pub mod tree;

pub use error::TypeError;
pub use person::{Person, PersonFields};
pub use sample::{sample_family, SAMPLE_TREE_NAME};
pub use tree::{ForestData, TreeData};
