//! In-memory filesystem core: allocation accounting, the inode registry,
//! the directory tree, path resolution and the handler table a host
//! filesystem binding dispatches into.

pub mod dentry;
pub mod error;
pub mod inode;
pub mod mount;
pub mod options;
pub mod path;
pub mod ramfs;
pub mod superblock;
pub mod time;

mod registry;
mod report;

pub use dentry::DirEntry;
pub use error::{FsError, FsResult};
pub use inode::{FileAttr, FileType, Permissions};
pub use mount::{FileSystem, StatFs};
pub use options::MountOptions;
pub use ramfs::RamFs;
pub use superblock::Superblock;
pub use time::{Clock, FixedClock, Timestamp};

#[cfg(feature = "std")]
pub use time::SystemClock;
