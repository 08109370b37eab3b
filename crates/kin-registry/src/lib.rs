//! Person registry for Kinfold.
//!
//! A [`PersonRegistry`] owns the ordered list of persons for one tree and
//! keeps it referentially closed: after every constructing or adding
//! operation, each non-empty `mother`/`father` name has its own entry, even
//! if that entry is only a placeholder.
//!
//! The registry tolerates logically impossible graphs (mutual parentage,
//! self-parentage). Lineage queries guard against cycles with visited sets
//! instead of rejecting them.

pub mod registry;

pub use registry::PersonRegistry;
