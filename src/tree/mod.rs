//! Virtual Path Tree Module
//!
//! Reconstructs the nested directory view served by the tree endpoint from
//! the flat, path-ascending folder and file listings the metadata store
//! returns for one owner.
//!
//! - **Entry** (`entry.rs`): the folder/file node shape serialized to the API
//! - **Builder** (`builder.rs`): flat absolute paths to a nested tree

pub mod builder;
pub mod entry;

#[cfg(test)]
mod proptest;

pub use builder::{FilePlacement, TreeBuilder};
pub use entry::VirtualEntry;
