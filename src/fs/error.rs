use core::fmt;

/// Filesystem error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    NotFound,
    AlreadyExists,
    NotADirectory,
    DirectoryNotEmpty,
    NoSpace,
    InvalidPath,
    InvalidOption,
}

impl FsError {
    /// Host errno for this error, positive (the binding negates it).
    pub fn errno(&self) -> i32 {
        match self {
            FsError::NotFound => 2,
            FsError::AlreadyExists => 17,
            FsError::NotADirectory => 20,
            FsError::DirectoryNotEmpty => 39,
            FsError::NoSpace => 28,
            FsError::InvalidPath | FsError::InvalidOption => 22,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FsError::NotFound => write!(f, "No such file or directory"),
            FsError::AlreadyExists => write!(f, "File exists"),
            FsError::NotADirectory => write!(f, "Not a directory"),
            FsError::DirectoryNotEmpty => write!(f, "Directory not empty"),
            FsError::NoSpace => write!(f, "No space left on device"),
            FsError::InvalidPath => write!(f, "Invalid path"),
            FsError::InvalidOption => write!(f, "Invalid mount option"),
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;
