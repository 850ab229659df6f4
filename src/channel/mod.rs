mod channel_sftp;

pub use channel_sftp::{ChannelSftp, SshConnector};

use crate::{config::Config, error::SftpResult, model::FileAttr};
use std::io::{Read, Write};

/// Opens a [Channel] for a [Config]
///
/// [SshConnector] is the production implementation; anything that can
/// produce a [Channel] (an in-process fake, a proxy...) can drive a
/// [crate::Client] as well.
///
pub trait Connect {
    type Channel: Channel;

    fn connect(&self, config: &Config) -> SftpResult<Self::Channel>;
}

/// The remote filesystem primitives the client is built from
///
/// Every call blocks until the server replies. A channel carries one
/// request at a time.
///
pub trait Channel {
    /// single level listing, in the order the server reports it
    fn read_dir(&self, path: &str) -> SftpResult<Vec<FileAttr>>;

    /// `stat` the remote path, following symlinks
    fn metadata(&self, path: &str) -> SftpResult<FileAttr>;

    fn create_dir(&self, path: &str) -> SftpResult<()>;

    /// copy the remote file into `sink`, returning the number of bytes copied
    fn download(&self, path: &str, sink: &mut dyn Write) -> SftpResult<u64>;

    /// create or truncate the remote file and fill it from `source`
    fn upload(&self, source: &mut dyn Read, path: &str) -> SftpResult<u64>;

    /// close the sftp channel, then the session
    fn close(self) -> SftpResult<()>
    where
        Self: Sized;
}
