//! Dependencies
//! ```toml
//! sftp-rs = "0.1"
//! ```
//!
//! A blocking SFTP client: list, walk, create directories and move files
//! to and from a remote host.
//!
//! Quick example:
//!
//!```no_run
//! use std::path::Path;
//!
//! fn main() {
//!     // enable logging
//!     tracing_subscriber::fmt()
//!         .with_max_level(tracing::Level::INFO)
//!         .init();
//!
//!     let mut client = sftp::create_client()
//!         .hostname("127.0.0.1")
//!         .port(22)
//!         .username("ubuntu")
//!         .password("password")
//!         .build();
//!
//!     client
//!         .with_connection(|client| {
//!             for attr in client.tree("/home/ubuntu", Some(1))? {
//!                 println!("{}", attr?.name);
//!             }
//!             client.put_file(Path::new("Cargo.toml"), Some("/tmp/a/b/Cargo.toml"), true)?;
//!             client.get_file("/tmp/a/b/Cargo.toml", Some(Path::new("copy.toml")), false)
//!         })
//!         .unwrap();
//! }
//!```

mod channel;
mod client;
mod config;
mod constant;
mod model;
mod util;

#[cfg(test)]
mod testutil;

pub mod error;

pub use channel::{Channel, ChannelSftp, Connect, SshConnector};
pub use client::{Client, ClientBuilder, ClientGuard, Tree};
pub use config::{Config, ResourceConfig};
pub use error::{SftpError, SftpResult, StatusCode};
pub use model::{File, FileAttr, FileId};

/// start building a [Client]
///
pub fn create_client() -> ClientBuilder {
    ClientBuilder::new()
}

/// build a client from host supplied settings and connect it
///
pub fn resource(config: ResourceConfig) -> SftpResult<Client> {
    config.connect()
}
