use super::{Channel, Connect};
use crate::{
    config::Config,
    constant::{size, INACTIVITY_TIMEOUT, SUBSYSTEM_SFTP},
    error::{SftpError, SftpResult, StatusCode},
    model::FileAttr,
};
use russh::{
    client::{self, Handle},
    keys::ssh_key,
    Disconnect,
};
use russh_sftp::{
    client::{error::Error as ProtocolError, SftpSession},
    protocol::{FileAttributes, StatusCode as ProtocolStatus},
};
use std::{
    io::{Read, Write},
    sync::Arc,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    runtime::{Builder, Runtime},
};
use tracing::*;

/// Accepts whatever host key the server presents
///
pub(crate) struct ClientHandler {
    host: String,
    port: u16,
}

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            host = %self.host,
            port = self.port,
            fingerprint = %server_public_key.fingerprint(ssh_key::HashAlg::Sha256),
            "accepting server host key"
        );
        Ok(true)
    }
}

/// Connects over ssh with password authentication and opens the sftp subsystem
///
#[derive(Debug, Default, Clone, Copy)]
pub struct SshConnector;

impl SshConnector {
    async fn open(config: &Config) -> SftpResult<(Handle<ClientHandler>, SftpSession)> {
        let (host, port) = config.address();
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(INACTIVITY_TIMEOUT),
            ..Default::default()
        });
        let handler = ClientHandler {
            host: host.to_owned(),
            port,
        };

        let mut session = client::connect(ssh_config, (host, port), handler)
            .await
            .map_err(|e| connection_error("connect", config, e))?;

        let auth = session
            .authenticate_password(config.username(), config.password())
            .await
            .map_err(|e| connection_error("authenticate", config, e))?;
        if !auth.success() {
            error!("password authentication failed for {}", config.username());
            return Err(SftpError::ConnectionError(format!(
                "password authentication failed for user '{}' on {}:{}",
                config.username(),
                host,
                port
            )));
        }

        let channel = session
            .channel_open_session()
            .await
            .map_err(|e| connection_error("open channel", config, e))?;
        channel
            .request_subsystem(true, SUBSYSTEM_SFTP)
            .await
            .map_err(|e| connection_error("request sftp subsystem", config, e))?;
        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| {
                SftpError::ConnectionError(format!("sftp init on {}:{}: {}", host, port, e))
            })?;

        Ok((session, sftp))
    }
}

impl Connect for SshConnector {
    type Channel = ChannelSftp;

    fn connect(&self, config: &Config) -> SftpResult<ChannelSftp> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("sftp-rs")
            .enable_all()
            .build()
            .map_err(|e| SftpError::ConnectionError(format!("start io runtime: {}", e)))?;
        let (session, sftp) = runtime.block_on(Self::open(config))?;
        info!("sftp channel to {}:{} opened.", config.hostname(), config.port());
        Ok(ChannelSftp {
            sftp,
            session,
            runtime,
        })
    }
}

/// An sftp subsystem channel over an authenticated ssh session
///
/// The async transport runs on a private runtime; every call blocks on it,
/// so a `ChannelSftp` must not be used from inside another async runtime.
///
pub struct ChannelSftp {
    sftp: SftpSession,
    session: Handle<ClientHandler>,
    runtime: Runtime,
}

impl Channel for ChannelSftp {
    fn read_dir(&self, path: &str) -> SftpResult<Vec<FileAttr>> {
        self.runtime.block_on(async {
            let entries = self
                .sftp
                .read_dir(path)
                .await
                .map_err(|e| remote_error(path, e))?;
            Ok::<_, SftpError>(entries
                .filter(|entry| {
                    let name = entry.file_name();
                    name != "." && name != ".."
                })
                .map(|entry| to_file_attr(entry.file_name(), &entry.metadata()))
                .collect())
        })
    }

    fn metadata(&self, path: &str) -> SftpResult<FileAttr> {
        let attrs = self
            .runtime
            .block_on(self.sftp.metadata(path))
            .map_err(|e| remote_error(path, e))?;
        let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
        Ok(to_file_attr(name, &attrs))
    }

    fn create_dir(&self, path: &str) -> SftpResult<()> {
        self.runtime
            .block_on(self.sftp.create_dir(path))
            .map_err(|e| remote_error(path, e))
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> SftpResult<u64> {
        self.runtime.block_on(async {
            let mut file = self.sftp.open(path).await.map_err(|e| remote_error(path, e))?;
            let mut buf = vec![0u8; size::BUF_SIZE];
            let mut count = 0u64;
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                sink.write_all(&buf[..n])?;
                count += n as u64;
            }
            sink.flush()?;
            Ok::<_, SftpError>(count)
        })
    }

    fn upload(&self, source: &mut dyn Read, path: &str) -> SftpResult<u64> {
        self.runtime.block_on(async {
            let mut file = self
                .sftp
                .create(path)
                .await
                .map_err(|e| remote_error(path, e))?;
            let mut buf = vec![0u8; size::BUF_SIZE];
            let mut count = 0u64;
            loop {
                let n = source.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                file.write_all(&buf[..n]).await?;
                count += n as u64;
            }
            file.flush().await?;
            file.shutdown().await?;
            Ok::<_, SftpError>(count)
        })
    }

    fn close(self) -> SftpResult<()> {
        let ChannelSftp {
            sftp,
            session,
            runtime,
        } = self;
        if let Err(e) = runtime.block_on(sftp.close()) {
            warn!("closing sftp channel failed: {}", e);
        }
        drop(sftp);
        let res = runtime.block_on(session.disconnect(Disconnect::ByApplication, "", "en"));
        drop(session);
        runtime.shutdown_background();
        info!("sftp channel closed.");
        res.map_err(SftpError::from)
    }
}

fn connection_error(op: &str, config: &Config, e: russh::Error) -> SftpError {
    error!("ssh {} {}:{} failed: {}", op, config.hostname(), config.port(), e);
    SftpError::ConnectionError(format!(
        "ssh {} {}:{}: {}",
        op,
        config.hostname(),
        config.port(),
        e
    ))
}

fn remote_error(path: &str, e: ProtocolError) -> SftpError {
    match e {
        ProtocolError::Status(status) => {
            SftpError::status(path, status_code(status.status_code), status.error_message)
        }
        other => SftpError::status(path, StatusCode::Failure, other),
    }
}

fn status_code(code: ProtocolStatus) -> StatusCode {
    match code {
        ProtocolStatus::Eof => StatusCode::Eof,
        ProtocolStatus::NoSuchFile => StatusCode::NoSuchFile,
        ProtocolStatus::PermissionDenied => StatusCode::PermissionDenied,
        ProtocolStatus::BadMessage => StatusCode::BadMessage,
        ProtocolStatus::NoConnection => StatusCode::NoConnection,
        ProtocolStatus::ConnectionLost => StatusCode::ConnectionLost,
        ProtocolStatus::OpUnsupported => StatusCode::OpUnsupported,
        _ => StatusCode::Failure,
    }
}

fn to_file_attr<N: ToString>(name: N, attrs: &FileAttributes) -> FileAttr {
    FileAttr::new(
        name,
        attrs.size.unwrap_or(0),
        attrs.permissions.unwrap_or(0),
        attrs.mtime.map(u64::from).unwrap_or(0),
    )
}
