use std::time::Duration;

pub(crate) const DEFAULT_PORT: u16 = 22;

/// sftp subsystem requested on the session channel
pub(crate) const SUBSYSTEM_SFTP: &str = "sftp";

/// directory listed by the liveness probe
pub(crate) const ROOT: &str = "/";

/// default directory for `ls`
pub(crate) const CURRENT_DIR: &str = ".";

pub(crate) const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(300);

pub(crate) mod size {
    /// chunk size for file copies
    pub const BUF_SIZE: usize = 32768;
}

/// file type bits of `st_mode`
pub(crate) mod mode {
    pub const S_IFMT: u32 = 0o170000;
    pub const S_IFDIR: u32 = 0o040000;
    pub const S_IFREG: u32 = 0o100000;
}
