use crate::constant::mode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One entry of a remote directory listing
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttr {
    pub name: String,
    pub size: u64,
    /// `st_mode` bits as reported by the server, type bits included
    pub mode: u32,
    /// seconds since the unix epoch
    pub mtime: u64,
}

impl FileAttr {
    pub fn new<N: ToString>(name: N, size: u64, mode: u32, mtime: u64) -> Self {
        FileAttr {
            name: name.to_string(),
            size,
            mode,
            mtime,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.mode & mode::S_IFMT == mode::S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.mode & mode::S_IFMT == mode::S_IFREG
    }

    /// permission bits only
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    pub fn modified(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.mtime)
    }
}
