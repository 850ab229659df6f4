use super::Client;
use crate::{
    channel::{Channel, Connect},
    constant::CURRENT_DIR,
    error::SftpResult,
    model::FileAttr,
};
use tracing::*;

impl<C: Connect> Client<C> {
    /// list a single directory level, in the order the server reports it
    ///
    /// With `include_dirs == false` directory entries are left out.
    ///
    pub fn ls(&self, path: &str, include_dirs: bool) -> SftpResult<Vec<FileAttr>> {
        let channel = self.channel()?;
        debug!("listing {}", path);
        let entries = channel.read_dir(path)?;
        if include_dirs {
            Ok(entries)
        } else {
            Ok(entries.into_iter().filter(|attr| !attr.is_dir()).collect())
        }
    }

    /// everything in the remote working directory
    ///
    pub fn ls_cwd(&self) -> SftpResult<Vec<FileAttr>> {
        self.ls(CURRENT_DIR, true)
    }
}
