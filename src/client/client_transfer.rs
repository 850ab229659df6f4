use super::Client;
use crate::{
    channel::{Channel, Connect},
    constant::CURRENT_DIR,
    error::{SftpError, SftpResult},
    util,
};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::*;

impl<C: Connect> Client<C> {
    /// download the remote file `from_path` to the local `to_path`
    ///
    /// `to_path` defaults to `from_path`. With `mkdirs` the local parent
    /// directory is created first. The bytes land in a temporary file next
    /// to `to_path` that replaces it only once the download is complete, so
    /// a failed download leaves an existing local file untouched. Any
    /// failure is reported as [SftpError::TransferError].
    ///
    pub fn get_file(&self, from_path: &str, to_path: Option<&Path>, mkdirs: bool) -> SftpResult<()> {
        let channel = self.channel()?;
        let to_path = to_path.unwrap_or_else(|| Path::new(from_path));
        let to_str = to_path.display().to_string();

        info!("download remote [{}] to local [{}].", from_path, to_str);

        let dir = match to_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new(CURRENT_DIR),
        };
        if mkdirs && !dir.is_dir() {
            debug!("creating local directory {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| SftpError::transfer(from_path, &to_str, e.into()))?;
        }

        let mut staged = NamedTempFile::new_in(dir)
            .map_err(|e| SftpError::transfer(from_path, &to_str, e.into()))?;
        let res = {
            let mut sink = BufWriter::new(staged.as_file_mut());
            channel.download(from_path, &mut sink)
        };
        match res {
            Ok(count) => {
                staged
                    .persist(to_path)
                    .map_err(|e| SftpError::transfer(from_path, &to_str, e.error.into()))?;
                info!("download of {} finished, {} bytes.", from_path, count);
                Ok(())
            }
            Err(e) => {
                // dropping `staged` removes the partial download
                error!("download of {} failed: {}", from_path, e);
                Err(SftpError::transfer(from_path, &to_str, e))
            }
        }
    }

    /// upload the local file `from_path` to the remote `to_path`
    ///
    /// `to_path` defaults to `from_path` rendered with forward slashes.
    /// With `mkdirs` the remote parent directory is made with
    /// [Client::ensure_path] first. A file in the way of that directory
    /// fails with [SftpError::PathConflictError]; every other failure is
    /// an [SftpError::TransferError].
    ///
    pub fn put_file(&self, from_path: &Path, to_path: Option<&str>, mkdirs: bool) -> SftpResult<()> {
        let channel = self.channel()?;
        let from_str = util::posix_string(from_path);
        let to_path = to_path.unwrap_or(from_str.as_str());

        info!("upload local [{}] to remote [{}].", from_str, to_path);

        let mut source = File::open(from_path)
            .map_err(|e| SftpError::transfer(&from_str, to_path, e.into()))?;

        if mkdirs {
            let dir = util::parent(to_path);
            if !dir.is_empty() {
                self.ensure_path(dir).map_err(|e| match e {
                    SftpError::PathConflictError(_) => e,
                    other => SftpError::transfer(&from_str, to_path, other),
                })?;
            }
        }

        match channel.upload(&mut source, to_path) {
            Ok(count) => {
                info!("upload to {} finished, {} bytes.", to_path, count);
                Ok(())
            }
            Err(e) => {
                error!("upload to {} failed: {}", to_path, e);
                Err(SftpError::transfer(&from_str, to_path, e))
            }
        }
    }
}
