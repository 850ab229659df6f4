use super::Client;
use crate::{
    channel::{Channel, Connect},
    error::{SftpError, SftpResult},
    util,
};
use tracing::*;

impl<C: Connect> Client<C> {
    /// make every directory along `path`, parents first, like `mkdir -p`
    ///
    /// Each prefix is entered first and only created when that fails, so
    /// directories that already exist are left alone. A prefix that exists
    /// as something other than a directory fails with
    /// [SftpError::PathConflictError].
    ///
    pub fn ensure_path(&self, path: &str) -> SftpResult<()> {
        let channel = self.channel()?;
        for prefix in util::prefixes(path) {
            if enter(channel, &prefix)? {
                continue;
            }
            debug!("creating remote directory {}", prefix);
            if let Err(e) = channel.create_dir(&prefix) {
                // lost a race with another creator, or hit a file
                match channel.metadata(&prefix) {
                    Ok(attr) if attr.is_dir() => continue,
                    Ok(_) => return Err(SftpError::PathConflictError(prefix)),
                    Err(_) => {
                        error!("mkdir {} failed: {}", prefix, e);
                        return Err(e);
                    }
                }
            }
        }
        Ok(())
    }
}

/// `Ok(true)` when `dir` is an existing directory, `Ok(false)` when it cannot be entered
fn enter<H: Channel>(channel: &H, dir: &str) -> SftpResult<bool> {
    match channel.metadata(dir) {
        Ok(attr) if attr.is_dir() => Ok(true),
        Ok(_) => Err(SftpError::PathConflictError(dir.to_owned())),
        Err(_) => Ok(false),
    }
}
