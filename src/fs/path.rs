use super::inode::NodeIndex;
use super::registry::InodeRegistry;

/// The virtual diagnostic file. Answered before tree resolution and never
/// inserted into the tree.
pub const SUPERBLOCK_PATH: &str = "/superblock";

/// Name of the diagnostic file as listed in directories.
pub const SUPERBLOCK_NAME: &str = "superblock";

pub fn is_superblock(path: &str) -> bool {
    path == SUPERBLOCK_PATH
}

/// Split a path into parent directory and final component, the way
/// `dirname`/`basename` do for absolute paths.
pub fn split_path(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => ("/", trimmed),
    }
}

/// Split a final component into name and the initial content embedded
/// after the first `=`.
pub fn split_initial_content(base: &str) -> (&str, Option<&str>) {
    match base.split_once('=') {
        Some((name, content)) => (name, Some(content)),
        None => (base, None),
    }
}

/// Walk an absolute path from `root`. A component that is missing, or that
/// sits under a file, makes the whole resolution fail.
pub(crate) fn resolve(registry: &InodeRegistry, root: NodeIndex, path: &str) -> Option<NodeIndex> {
    if path == "/" {
        return Some(root);
    }

    let mut current = root;
    for component in path.split('/').filter(|c| !c.is_empty()) {
        let dir = registry.get(current)?.as_dir()?;
        current = dir.find_child(component)?;
    }
    Some(current)
}
