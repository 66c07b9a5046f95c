//! Virtual Entry
//!
//! One logical node in the presented namespace tree. Built transiently per
//! tree request and serialized straight into the API response; never
//! persisted in this form.

use serde::Serialize;

/// A folder or file in the virtual namespace.
///
/// Serializes with a `type` tag, e.g.
/// `{"type":"folder","name":"a","children":[...]}` and
/// `{"type":"file","name":"c.txt","id":"...","size":10,"contentType":"text/plain"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VirtualEntry {
    Folder {
        name: String,
        children: Vec<VirtualEntry>,
    },
    #[serde(rename_all = "camelCase")]
    File {
        name: String,
        id: String,
        size: u64,
        content_type: String,
    },
}

impl VirtualEntry {
    /// New empty folder entry.
    pub fn folder(name: impl Into<String>) -> Self {
        Self::Folder {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// New file leaf.
    pub fn file(
        name: impl Into<String>,
        id: impl Into<String>,
        size: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self::File {
            name: name.into(),
            id: id.into(),
            size,
            content_type: content_type.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }

    /// Children of a folder entry; `None` for a file.
    pub fn children(&self) -> Option<&[VirtualEntry]> {
        match self {
            Self::Folder { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }
}
