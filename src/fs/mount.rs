use alloc::vec::Vec;
use super::dentry::DirEntry;
use super::error::FsResult;
use super::inode::FileAttr;

/// Filesystem statistics for `statfs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatFs {
    pub block_size: u32,
    pub total_blocks: u32,
    pub free_blocks: u32,
    pub total_inodes: u32,
    pub free_inodes: u32,
    pub name_max: u32,
}

/// The handler table a host binding dispatches into.
/// Every path is absolute within the mounted filesystem.
pub trait FileSystem: Send + Sync {
    /// Name of this filesystem (e.g. "ramfs").
    fn name(&self) -> &str;

    /// Metadata for the node at `path`.
    fn getattr(&self, path: &str) -> FsResult<FileAttr>;

    /// List entries in directory at `path`, including the synthetic
    /// `.`, `..` and diagnostic entries.
    fn readdir(&self, path: &str) -> FsResult<Vec<DirEntry>>;

    /// Create a regular file. The final component may carry initial
    /// content as `name=content`. `mode` is not enforced.
    fn create(&self, path: &str, mode: u32) -> FsResult<()>;

    /// Create a new directory at `path`.
    fn mkdir(&self, path: &str) -> FsResult<()>;

    /// Remove an empty directory.
    fn rmdir(&self, path: &str) -> FsResult<()>;

    /// Remove a regular file.
    fn unlink(&self, path: &str) -> FsResult<()>;

    /// Read up to `buf.len()` bytes starting at `offset`.
    /// Returns number of bytes read.
    fn read(&self, path: &str, offset: usize, buf: &mut [u8]) -> FsResult<usize>;

    /// Write `data` starting at `offset`. Returns number of bytes written,
    /// which may be less than `data.len()` at the block boundary.
    fn write(&self, path: &str, offset: usize, data: &[u8]) -> FsResult<usize>;

    /// Check that `path` can be opened.
    fn open(&self, path: &str) -> FsResult<()>;

    /// Timestamp update. Accepted and ignored.
    fn utimens(&self, path: &str) -> FsResult<()>;

    /// Set the size of a regular file.
    fn truncate(&self, path: &str, size: usize) -> FsResult<()>;

    fn statfs(&self) -> StatFs;
}
