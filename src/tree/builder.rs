//! Virtual Path Tree Builder
//!
//! Turns a flat collection of absolute virtual paths into the nested
//! folder/file view served by the tree endpoint. Folder paths are applied
//! first, then file paths, both in the order supplied by the caller; the
//! metadata store hands them over in path-ascending order, which makes the
//! output deterministic and pins first-insertion child order at every level.

use crate::tree::entry::VirtualEntry;

/// File attributes placed at an absolute virtual path.
///
/// The final path segment is the displayed file name; everything before it
/// is the containing folder chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePlacement {
    pub virtual_path: String,
    pub id: String,
    pub size: u64,
    pub content_type: String,
}

/// Assembles the namespace tree for one owner.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Build the tree rooted at `/`.
    ///
    /// Intermediate segments reuse an existing folder child of the same
    /// name; a file child with that name is never reused or descended
    /// into, so a folder and a file sharing a name end up as siblings. A
    /// path with no non-empty segments contributes nothing.
    pub fn build(folder_paths: &[String], files: &[FilePlacement]) -> VirtualEntry {
        let mut children: Vec<VirtualEntry> = Vec::new();

        for path in folder_paths {
            let segments = split_segments(path);
            ensure_folder(&mut children, &segments);
        }

        for file in files {
            let segments = split_segments(&file.virtual_path);
            if let Some((leaf, parents)) = segments.split_last() {
                let parent = ensure_folder(&mut children, parents);
                parent.push(VirtualEntry::file(
                    *leaf,
                    file.id.clone(),
                    file.size,
                    file.content_type.clone(),
                ));
            }
        }

        VirtualEntry::Folder {
            name: "/".to_string(),
            children,
        }
    }
}

/// Walk the folder chain named by `segments`, creating missing folders,
/// and return the children of the innermost one.
fn ensure_folder<'a>(
    mut children: &'a mut Vec<VirtualEntry>,
    segments: &[&str],
) -> &'a mut Vec<VirtualEntry> {
    for segment in segments {
        let index = match children
            .iter()
            .position(|child| child.is_folder() && child.name() == *segment)
        {
            Some(index) => index,
            None => {
                children.push(VirtualEntry::folder(*segment));
                children.len() - 1
            }
        };
        children = match &mut children[index] {
            VirtualEntry::Folder { children, .. } => children,
            VirtualEntry::File { .. } => unreachable!("position only matches folder entries"),
        };
    }
    children
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
