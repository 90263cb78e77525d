#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod fs;

pub use fs::{
    Clock, DirEntry, FileAttr, FileSystem, FileType, FixedClock, FsError, FsResult, MountOptions,
    Permissions, RamFs, StatFs, Superblock, Timestamp,
};

#[cfg(feature = "std")]
pub use fs::SystemClock;
