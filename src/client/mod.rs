mod client_list;
mod client_path;
mod client_transfer;
mod client_tree;

pub use client_tree::Tree;

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{
    channel::{Channel, Connect, SshConnector},
    config::Config,
    constant::ROOT,
    error::{SftpError, SftpResult},
};
use tracing::*;

enum ClientState<H> {
    Disconnected,
    Connected(H),
}

/// Builds a [Client]
///
/// ```no_run
/// let mut client = sftp::create_client()
///     .hostname("127.0.0.1")
///     .port(22)
///     .username("ubuntu")
///     .password("password")
///     .connect()
///     .unwrap();
/// for attr in client.ls("/", false).unwrap() {
///     println!("{} {}", attr.name, attr.size);
/// }
/// client.close().unwrap();
/// ```
///
pub struct ClientBuilder<C = SshConnector> {
    config: Config,
    connector: C,
}

impl Default for ClientBuilder<SshConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder<SshConnector> {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            connector: SshConnector,
        }
    }
}

impl<C: Connect> ClientBuilder<C> {
    pub fn hostname(mut self, hostname: &str) -> Self {
        self.config.hostname = hostname.to_owned();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.config.auth.username(username);
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.auth.password(password);
        self
    }

    /// replace the transport used to open channels
    ///
    pub fn connector<D: Connect>(self, connector: D) -> ClientBuilder<D> {
        ClientBuilder {
            config: self.config,
            connector,
        }
    }

    /// a disconnected client, call [Client::connect] or [Client::scoped] to use it
    ///
    pub fn build(self) -> Client<C> {
        Client {
            config: self.config,
            connector: self.connector,
            state: ClientState::Disconnected,
        }
    }

    pub fn connect(self) -> SftpResult<Client<C>> {
        let mut client = self.build();
        client.connect()?;
        Ok(client)
    }
}

/// A connection to a remote host's filesystem
///
/// A client starts disconnected. Every remote operation on a disconnected
/// client fails with [SftpError::NotConnected], except [Client::connected]
/// and [Client::exists] which answer `false`.
///
/// One request is in flight at a time; share a client between threads
/// only behind external synchronization.
///
pub struct Client<C: Connect = SshConnector> {
    config: Config,
    connector: C,
    state: ClientState<C::Channel>,
}

impl<C: Connect> Client<C> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// open the session and the sftp channel
    ///
    /// Calling it on a connected client does nothing.
    ///
    pub fn connect(&mut self) -> SftpResult<()> {
        if let ClientState::Connected(_) = self.state {
            debug!("already connected to {}", self.config.hostname());
            return Ok(());
        }
        info!(
            "connecting to {}@{}:{}.",
            self.config.username(),
            self.config.hostname(),
            self.config.port()
        );
        let channel = self.connector.connect(&self.config)?;
        self.state = ClientState::Connected(channel);
        Ok(())
    }

    /// close the sftp channel, then the session
    ///
    /// Calling it on a disconnected client does nothing.
    ///
    pub fn close(&mut self) -> SftpResult<()> {
        match std::mem::replace(&mut self.state, ClientState::Disconnected) {
            ClientState::Connected(channel) => {
                info!("closing connection to {}.", self.config.hostname());
                channel.close()
            }
            ClientState::Disconnected => Ok(()),
        }
    }

    /// liveness probe: lists the root directory
    ///
    /// Any failure, including never having connected, reads as `false`.
    ///
    pub fn connected(&self) -> bool {
        match &self.state {
            ClientState::Connected(channel) => match channel.read_dir(ROOT) {
                Ok(_) => true,
                Err(e) => {
                    debug!("liveness probe failed: {}", e);
                    false
                }
            },
            ClientState::Disconnected => false,
        }
    }

    /// whether `path` can be stat-ed on the remote host
    ///
    /// A missing path, a permission error and a broken connection all
    /// read as `false`.
    ///
    pub fn exists(&self, path: &str) -> bool {
        match self.channel() {
            Ok(channel) => match channel.metadata(path) {
                Ok(_) => true,
                Err(e) => {
                    debug!("stat {} failed: {}", path, e);
                    false
                }
            },
            Err(_) => false,
        }
    }

    /// connect and hand back a guard that closes the client when dropped
    ///
    pub fn scoped(&mut self) -> SftpResult<ClientGuard<'_, C>> {
        self.connect()?;
        Ok(ClientGuard { client: self })
    }

    /// run `f` between a connect and a close
    ///
    /// The close happens whether `f` succeeds, fails or panics. An error
    /// from `f` takes precedence over an error from the close.
    ///
    pub fn with_connection<T, F>(&mut self, f: F) -> SftpResult<T>
    where
        F: FnOnce(&mut Client<C>) -> SftpResult<T>,
    {
        let mut guard = self.scoped()?;
        let res = f(&mut *guard);
        let closed = guard.close();
        let value = res?;
        closed?;
        Ok(value)
    }

    pub(crate) fn channel(&self) -> SftpResult<&C::Channel> {
        match &self.state {
            ClientState::Connected(channel) => Ok(channel),
            ClientState::Disconnected => Err(SftpError::NotConnected),
        }
    }
}

impl<C: Connect> fmt::Display for Client<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<SFTP Client::{}@{}::port={}::connected={}>",
            self.config.username(),
            self.config.hostname(),
            self.config.port(),
            self.connected()
        )
    }
}

impl<C: Connect> fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field(
                "state",
                &match self.state {
                    ClientState::Connected(_) => "connected",
                    ClientState::Disconnected => "disconnected",
                },
            )
            .finish()
    }
}

impl<C: Connect> Drop for Client<C> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("close on drop failed: {}", e);
        }
    }
}

/// A connected [Client] that is closed when the guard goes out of scope
///
pub struct ClientGuard<'a, C: Connect> {
    client: &'a mut Client<C>,
}

impl<C: Connect> ClientGuard<'_, C> {
    /// close now and report the outcome instead of logging it
    ///
    pub fn close(self) -> SftpResult<()> {
        let res = self.client.close();
        // the drop that follows finds the client disconnected
        res
    }
}

impl<C: Connect> Deref for ClientGuard<'_, C> {
    type Target = Client<C>;
    fn deref(&self) -> &Self::Target {
        &*self.client
    }
}

impl<C: Connect> DerefMut for ClientGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.client
    }
}

impl<C: Connect> Drop for ClientGuard<'_, C> {
    fn drop(&mut self) {
        if let Err(e) = self.client.close() {
            error!("close at end of scope failed: {}", e);
        }
    }
}
