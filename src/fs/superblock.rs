//! Allocation accounting for a mounted instance.
//!
//! Counters only: released blocks go back into `free_blocks` but their
//! ranges are not tracked, so a new block's start offset is derived from the
//! running free count and may overlap a range handed out earlier.

use super::error::{FsError, FsResult};
use super::options::MountOptions;
use super::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superblock {
    pub total_inodes: u32,
    pub free_inodes: u32,
    pub total_blocks: u32,
    pub free_blocks: u32,
    pub block_size: u32,
    pub inode_capacity: u32,
    pub mounted_at: Timestamp,
}

impl Superblock {
    /// Empty accounting: no inode slots claimed yet, every block free.
    pub fn new(opts: &MountOptions, mounted_at: Timestamp) -> Self {
        Superblock {
            total_inodes: 0,
            free_inodes: opts.inode_capacity,
            total_blocks: opts.total_blocks,
            free_blocks: opts.total_blocks,
            block_size: opts.block_size,
            inode_capacity: opts.inode_capacity,
            mounted_at,
        }
    }

    /// Claim one block, returning its start offset.
    pub fn allocate_block(&mut self) -> FsResult<u32> {
        if self.free_blocks == 0 {
            return Err(FsError::NoSpace);
        }
        let start = self.total_blocks - self.free_blocks;
        self.free_blocks -= 1;
        Ok(start)
    }

    pub fn release_blocks(&mut self, count: u32) {
        self.free_blocks = self.free_blocks.saturating_add(count).min(self.total_blocks);
    }

    /// Claim an inode slot. Capacity is advisory: past it `total_inodes`
    /// keeps growing and `free_inodes` stays at zero.
    pub fn allocate_inode_slot(&mut self) {
        self.total_inodes += 1;
        self.free_inodes = self.inode_capacity.saturating_sub(self.total_inodes);
    }

    pub fn release_inode_slot(&mut self) {
        self.total_inodes = self.total_inodes.saturating_sub(1);
        self.free_inodes = self.inode_capacity.saturating_sub(self.total_inodes);
    }
}
