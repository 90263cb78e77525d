use alloc::string::String;
use alloc::vec::Vec;
use super::inode::{FileType, NodeIndex};

/// A directory entry as reported by `readdir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub file_type: FileType,
}

/// One name -> node binding inside a directory.
#[derive(Debug, Clone)]
struct Binding {
    name: String,
    node: NodeIndex,
}

/// Child bindings of a directory node.
///
/// New bindings go to the front, so iteration yields the most recently
/// added child first. Names are not checked for uniqueness here; callers
/// look the name up with `find_child` before adding.
#[derive(Debug, Default)]
pub(crate) struct Directory {
    entries: Vec<Binding>,
}

impl Directory {
    pub fn new() -> Self {
        Directory { entries: Vec::new() }
    }

    pub fn add_child(&mut self, name: &str, node: NodeIndex) {
        self.entries.insert(0, Binding { name: String::from(name), node });
    }

    /// Exact, case-sensitive match.
    pub fn find_child(&self, name: &str) -> Option<NodeIndex> {
        self.entries.iter().find(|b| b.name == name).map(|b| b.node)
    }

    /// Remove the first binding with this name.
    pub fn remove_child(&mut self, name: &str) -> Option<NodeIndex> {
        let pos = self.entries.iter().position(|b| b.name == name)?;
        Some(self.entries.remove(pos).node)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, NodeIndex)> + '_ {
        self.entries.iter().map(|b| (b.name.as_str(), b.node))
    }
}
