use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use super::inode::NodeIndex;
use super::registry::InodeRegistry;
use super::superblock::Superblock;

/// Render the `/superblock` report: accounting counters, a pre-order tree
/// dump from the root, then one line per registered inode, newest first.
pub(crate) fn render(sb: &Superblock, registry: &InodeRegistry, root: NodeIndex) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "Superblock Info:\n\
         Total inodes: {}\n\
         Free inodes: {}\n\
         Total blocks: {}\n\
         Free blocks: {}\n\
         Block size: {}\n\
         Mounted at: {}\n\n",
        sb.total_inodes, sb.free_inodes, sb.total_blocks, sb.free_blocks, sb.block_size, sb.mounted_at
    );

    out.push_str("File system tree:\n");
    render_tree(&mut out, registry, root);

    for node in registry.enumerate_all().rev() {
        let _ = writeln!(
            out,
            "Inode {}: {}, type={}, size={}, blocks={}, rights={}, created={}",
            node.id,
            node.name,
            node.file_type().label(),
            node.size,
            node.blocks.count,
            node.perm,
            node.created
        );
    }

    out
}

fn render_tree(out: &mut String, registry: &InodeRegistry, root: NodeIndex) {
    let mut stack: Vec<(NodeIndex, usize)> = alloc::vec![(root, 0)];

    while let Some((idx, depth)) = stack.pop() {
        let node = match registry.get(idx) {
            Some(node) => node,
            None => continue,
        };

        for _ in 0..depth {
            out.push_str("│   ");
        }
        let _ = writeln!(
            out,
            "├── {} ({}, inode: {}, size: {})",
            node.name,
            node.file_type().label(),
            node.id,
            node.size
        );

        if let Some(dir) = node.as_dir() {
            // Pushed in reverse so the first binding is popped first.
            for (_, child) in dir.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
}
