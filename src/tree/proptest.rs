//! Property-Based Tests for the Tree Builder
//!
//! Uses proptest to verify builder invariants across generated path sets.
//!
//! # Test Properties
//!
//! 1. **Determinism**: The same inputs always build the same tree
//! 2. **Reachability**: Every supplied folder path exists in the output
//! 3. **Completeness**: Every placeable file appears exactly once
//! 4. **Folder Uniqueness**: Sibling folders never share a name

#![cfg(test)]

use proptest::prelude::*;

use super::builder::{FilePlacement, TreeBuilder};
use super::entry::VirtualEntry;

// =============================================================================
// Property Strategies
// =============================================================================

/// Strategy for one path segment.
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// Strategy for an absolute path of 1-4 segments.
fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..=4)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Strategy for a set of folder paths.
fn folder_paths_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(path_strategy(), 0..8)
}

/// Strategy for a set of file placements with distinct ids.
fn files_strategy() -> impl Strategy<Value = Vec<FilePlacement>> {
    prop::collection::vec((path_strategy(), 0u64..10_000), 0..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (virtual_path, size))| FilePlacement {
                virtual_path,
                id: format!("f-{}", index),
                size,
                content_type: "application/octet-stream".to_string(),
            })
            .collect()
    })
}

// =============================================================================
// Tree Walking Helpers
// =============================================================================

/// Follow `segments` through folder children only.
fn find_folder<'a>(root: &'a VirtualEntry, segments: &[&str]) -> Option<&'a VirtualEntry> {
    let mut current = root;
    for segment in segments {
        current = current
            .children()?
            .iter()
            .find(|child| child.is_folder() && child.name() == *segment)?;
    }
    Some(current)
}

fn count_files(entry: &VirtualEntry) -> usize {
    match entry.children() {
        Some(children) => children.iter().map(count_files).sum(),
        None => 1,
    }
}

/// True iff no folder level contains two folder children with one name.
fn folder_names_unique(entry: &VirtualEntry) -> bool {
    let Some(children) = entry.children() else {
        return true;
    };
    let mut seen = std::collections::HashSet::new();
    for child in children {
        if child.is_folder() && !seen.insert(child.name()) {
            return false;
        }
    }
    children.iter().all(folder_names_unique)
}

// =============================================================================
// Structure Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: Every supplied folder path resolves to a folder entry.
    #[test]
    fn prop_folder_paths_reachable(folder_paths in folder_paths_strategy()) {
        let tree = TreeBuilder::build(&folder_paths, &[]);

        for path in &folder_paths {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            let found = find_folder(&tree, &segments);
            prop_assert!(found.is_some(), "Folder path {} not reachable", path);
            prop_assert!(found.unwrap().is_folder());
        }
    }

    /// Property: Every file appears exactly once as a leaf.
    #[test]
    fn prop_every_file_placed(
        folder_paths in folder_paths_strategy(),
        files in files_strategy(),
    ) {
        let tree = TreeBuilder::build(&folder_paths, &files);
        prop_assert_eq!(count_files(&tree), files.len());
    }

    /// Property: Sibling folders never duplicate a name; the builder reuses
    /// an existing folder child instead of creating a second one.
    #[test]
    fn prop_sibling_folder_names_unique(
        folder_paths in folder_paths_strategy(),
        files in files_strategy(),
    ) {
        let tree = TreeBuilder::build(&folder_paths, &files);
        prop_assert!(folder_names_unique(&tree));
    }

    /// Property: The root is always a folder named `/`.
    #[test]
    fn prop_root_shape(
        folder_paths in folder_paths_strategy(),
        files in files_strategy(),
    ) {
        let tree = TreeBuilder::build(&folder_paths, &files);
        prop_assert!(tree.is_folder());
        prop_assert_eq!(tree.name(), "/");
    }
}

// =============================================================================
// Determinism Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: Building twice from the same inputs yields the same tree.
    #[test]
    fn prop_build_deterministic(
        folder_paths in folder_paths_strategy(),
        files in files_strategy(),
    ) {
        let first = TreeBuilder::build(&folder_paths, &files);
        let second = TreeBuilder::build(&folder_paths, &files);
        prop_assert_eq!(first, second);
    }
}
