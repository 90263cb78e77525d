use super::error::{FsError, FsResult};

/// Mount parameters, normally parsed from the host's `-o` option string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountOptions {
    pub total_blocks: u32,
    pub block_size: u32,
    pub inode_capacity: u32,
}

impl Default for MountOptions {
    fn default() -> Self {
        MountOptions {
            total_blocks: 1024,
            block_size: 4096,
            inode_capacity: 100,
        }
    }
}

impl MountOptions {
    /// Parse `blocks=N,block_size=N,inodes=N`. Keys may appear in any order
    /// and any may be omitted; an empty string gives the defaults.
    pub fn parse(data: &str) -> FsResult<Self> {
        let mut opts = MountOptions::default();

        for item in data.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = item.split_once('=').ok_or(FsError::InvalidOption)?;
            let value: u32 = value.trim().parse().map_err(|_| FsError::InvalidOption)?;
            match key.trim() {
                "blocks" => opts.total_blocks = value,
                "block_size" => opts.block_size = value,
                "inodes" => opts.inode_capacity = value,
                other => {
                    log::warn!("ramfs: unknown mount option '{}'", other);
                    return Err(FsError::InvalidOption);
                }
            }
        }

        // A one-byte block could not hold any initial content.
        if opts.block_size < 2 || opts.total_blocks == 0 {
            return Err(FsError::InvalidOption);
        }
        Ok(opts)
    }
}
