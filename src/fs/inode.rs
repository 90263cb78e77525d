use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::dentry::Directory;
use super::time::Timestamp;

/// Type of filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
}

impl FileType {
    /// Short label used in the superblock report.
    pub fn label(&self) -> &'static str {
        match self {
            FileType::File => "file",
            FileType::Directory => "dir",
        }
    }
}

bitflags::bitflags! {
    /// rwx permission bits. Stored for display only, never enforced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u16 {
        const USER_READ = 0o400;
        const USER_WRITE = 0o200;
        const USER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl Permissions {
    /// rw-r--r--
    pub const FILE_DEFAULT: Permissions = Permissions::from_bits_truncate(0o644);
    /// rwxr-xr-x
    pub const DIR_DEFAULT: Permissions = Permissions::from_bits_truncate(0o755);
    /// r--r--r--
    pub const READ_ONLY: Permissions = Permissions::from_bits_truncate(0o444);
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const BITS: [(Permissions, char); 9] = [
            (Permissions::USER_READ, 'r'),
            (Permissions::USER_WRITE, 'w'),
            (Permissions::USER_EXEC, 'x'),
            (Permissions::GROUP_READ, 'r'),
            (Permissions::GROUP_WRITE, 'w'),
            (Permissions::GROUP_EXEC, 'x'),
            (Permissions::OTHER_READ, 'r'),
            (Permissions::OTHER_WRITE, 'w'),
            (Permissions::OTHER_EXEC, 'x'),
        ];
        for (bit, c) in BITS {
            let c = if self.contains(bit) { c } else { '-' };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// Attributes returned by `getattr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttr {
    pub file_type: FileType,
    pub size: usize,
    pub perm: Permissions,
    pub nlink: u32,
    pub blocks: u32,
    pub created: Timestamp,
}

/// Advisory block bookkeeping. Only used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockRange {
    pub start: Option<u32>,
    pub count: u32,
}

/// Content of a regular file. The buffer exists once the file owns a block
/// and is exactly one block long.
#[derive(Debug, Default)]
pub(crate) struct FileData {
    pub content: Option<Vec<u8>>,
}

#[derive(Debug)]
pub(crate) enum NodeData {
    File(FileData),
    Directory(Directory),
}

/// Index of a node slot in the registry arena.
pub(crate) type NodeIndex = usize;

/// An entity in the tree. Lives in the registry arena; directories reference
/// their children and each child its parent by arena index.
#[derive(Debug)]
pub(crate) struct RamNode {
    pub id: u32,
    pub name: String,
    pub perm: Permissions,
    pub size: usize,
    pub created: Timestamp,
    pub blocks: BlockRange,
    pub initial_content: Option<String>,
    pub parent: Option<NodeIndex>,
    pub data: NodeData,
}

impl RamNode {
    pub fn new_file(name: &str, initial_content: Option<&str>, parent: NodeIndex, now: Timestamp) -> Self {
        RamNode {
            id: 0,
            name: String::from(name),
            perm: Permissions::FILE_DEFAULT,
            size: 0,
            created: now,
            blocks: BlockRange::default(),
            initial_content: initial_content.map(String::from),
            parent: Some(parent),
            data: NodeData::File(FileData::default()),
        }
    }

    pub fn new_dir(name: &str, parent: Option<NodeIndex>, now: Timestamp) -> Self {
        RamNode {
            id: 0,
            name: String::from(name),
            perm: Permissions::DIR_DEFAULT,
            size: 0,
            created: now,
            blocks: BlockRange::default(),
            initial_content: None,
            parent,
            data: NodeData::Directory(Directory::new()),
        }
    }

    pub fn file_type(&self) -> FileType {
        match self.data {
            NodeData::File(_) => FileType::File,
            NodeData::Directory(_) => FileType::Directory,
        }
    }

    pub fn as_dir(&self) -> Option<&Directory> {
        match &self.data {
            NodeData::Directory(dir) => Some(dir),
            NodeData::File(_) => None,
        }
    }

    pub fn as_dir_mut(&mut self) -> Option<&mut Directory> {
        match &mut self.data {
            NodeData::Directory(dir) => Some(dir),
            NodeData::File(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileData> {
        match &mut self.data {
            NodeData::File(file) => Some(file),
            NodeData::Directory(_) => None,
        }
    }

    pub fn to_attr(&self) -> FileAttr {
        FileAttr {
            file_type: self.file_type(),
            size: self.size,
            perm: self.perm,
            nlink: if self.parent.is_none() { 2 } else { 1 },
            blocks: self.blocks.count,
            created: self.created,
        }
    }
}
