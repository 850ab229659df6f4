//! An in-memory remote filesystem that stands in for an sftp server

use crate::{
    channel::{Channel, Connect},
    client::{Client, ClientBuilder},
    config::Config,
    error::{SftpError, SftpResult, StatusCode},
    model::FileAttr,
};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

const DIR_MODE: u32 = 0o040755;
const FILE_MODE: u32 = 0o100644;
const MTIME: u64 = 1_650_000_000;

enum Node {
    File(Vec<u8>),
    Dir(Vec<(String, Node)>),
}

impl Node {
    fn attr(&self, name: &str) -> FileAttr {
        match self {
            Node::File(data) => FileAttr::new(name, data.len() as u64, FILE_MODE, MTIME),
            Node::Dir(_) => FileAttr::new(name, 4096, DIR_MODE, MTIME),
        }
    }

    fn child(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Dir(entries) => entries.iter().find(|(n, _)| n == name).map(|(_, node)| node),
            Node::File(_) => None,
        }
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self {
            Node::Dir(entries) => entries
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, node)| node),
            Node::File(_) => None,
        }
    }
}

struct State {
    root: Node,
    alive: bool,
    deny_mkdir: bool,
    failing: HashSet<Vec<String>>,
    connects: usize,
    closes: usize,
    listings: usize,
    mkdirs: usize,
}

/// remote paths resolve against `/`, which doubles as the home directory
fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_owned)
        .collect()
}

fn no_such_file(path: &str) -> SftpError {
    SftpError::status(path, StatusCode::NoSuchFile, "No such file")
}

fn failure(path: &str) -> SftpError {
    SftpError::status(path, StatusCode::Failure, "Failure")
}

impl State {
    fn lookup(&self, path: &str) -> SftpResult<&Node> {
        let mut node = &self.root;
        for seg in segments(path) {
            node = node.child(&seg).ok_or_else(|| no_such_file(path))?;
        }
        Ok(node)
    }

    /// the directory that would hold `path`, plus the entry name
    fn parent_mut(&mut self, path: &str) -> SftpResult<(&mut Vec<(String, Node)>, String)> {
        let mut segs = segments(path);
        let name = segs.pop().ok_or_else(|| failure(path))?;
        let mut node = &mut self.root;
        for seg in segs {
            node = node.child_mut(&seg).ok_or_else(|| no_such_file(path))?;
        }
        match node {
            Node::Dir(entries) => Ok((entries, name)),
            Node::File(_) => Err(no_such_file(path)),
        }
    }

    fn insert(&mut self, path: &str, new: Node) -> SftpResult<()> {
        let (entries, name) = self.parent_mut(path)?;
        match entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing @ Node::File(_))) if matches!(new, Node::File(_)) => {
                *existing = new;
                Ok(())
            }
            Some(_) => Err(failure(path)),
            None => {
                entries.push((name, new));
                Ok(())
            }
        }
    }
}

/// Hands out channels onto one shared in-memory tree
///
#[derive(Clone)]
pub(crate) struct MemoryConnector {
    state: Arc<Mutex<State>>,
    refuse: bool,
}

impl MemoryConnector {
    pub fn empty() -> Self {
        MemoryConnector {
            state: Arc::new(Mutex::new(State {
                root: Node::Dir(vec![]),
                alive: true,
                deny_mkdir: false,
                failing: HashSet::new(),
                connects: 0,
                closes: 0,
                listings: 0,
                mkdirs: 0,
            })),
            refuse: false,
        }
    }

    /// a connector whose every connect attempt fails
    pub fn refusing() -> Self {
        MemoryConnector {
            refuse: true,
            ..Self::empty()
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn mkdir(&self, path: &str) {
        self.lock().insert(path, Node::Dir(vec![])).unwrap();
    }

    pub fn put_file(&self, path: &str, data: &[u8]) {
        self.lock().insert(path, Node::File(data.to_vec())).unwrap();
    }

    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        match self.lock().lookup(path) {
            Ok(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// make the next listings of `path` fail
    pub fn fail_listing(&self, path: &str) {
        self.lock().failing.insert(segments(path));
    }

    pub fn deny_mkdir(&self) {
        self.lock().deny_mkdir = true;
    }

    /// every later request fails as if the network went away
    pub fn drop_connection(&self) {
        self.lock().alive = false;
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    pub fn listings(&self) -> usize {
        self.lock().listings
    }

    pub fn mkdirs(&self) -> usize {
        self.lock().mkdirs
    }
}

impl Connect for MemoryConnector {
    type Channel = MemoryChannel;

    fn connect(&self, _config: &Config) -> SftpResult<MemoryChannel> {
        if self.refuse {
            return Err(SftpError::ConnectionError("connection refused".to_owned()));
        }
        let mut state = self.lock();
        state.connects += 1;
        state.alive = true;
        Ok(MemoryChannel {
            connector: self.clone(),
        })
    }
}

pub(crate) struct MemoryChannel {
    connector: MemoryConnector,
}

impl MemoryChannel {
    fn state(&self, path: &str) -> SftpResult<MutexGuard<'_, State>> {
        let state = self.connector.lock();
        if !state.alive {
            return Err(SftpError::status(
                path,
                StatusCode::ConnectionLost,
                "Connection lost",
            ));
        }
        Ok(state)
    }
}

impl Channel for MemoryChannel {
    fn read_dir(&self, path: &str) -> SftpResult<Vec<FileAttr>> {
        let mut state = self.state(path)?;
        state.listings += 1;
        if state.failing.contains(&segments(path)) {
            return Err(SftpError::status(
                path,
                StatusCode::PermissionDenied,
                "Permission denied",
            ));
        }
        match state.lookup(path)? {
            Node::Dir(entries) => Ok(entries.iter().map(|(name, node)| node.attr(name)).collect()),
            Node::File(_) => Err(failure(path)),
        }
    }

    fn metadata(&self, path: &str) -> SftpResult<FileAttr> {
        let state = self.state(path)?;
        let node = state.lookup(path)?;
        let name = segments(path).pop().unwrap_or_else(|| "/".to_owned());
        Ok(node.attr(&name))
    }

    fn create_dir(&self, path: &str) -> SftpResult<()> {
        let mut state = self.state(path)?;
        if state.deny_mkdir {
            return Err(SftpError::status(
                path,
                StatusCode::PermissionDenied,
                "Permission denied",
            ));
        }
        if state.lookup(path).is_ok() {
            return Err(failure(path));
        }
        state.insert(path, Node::Dir(vec![]))?;
        state.mkdirs += 1;
        Ok(())
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> SftpResult<u64> {
        let state = self.state(path)?;
        match state.lookup(path)? {
            Node::File(data) => {
                sink.write_all(data)?;
                sink.flush()?;
                Ok(data.len() as u64)
            }
            Node::Dir(_) => Err(failure(path)),
        }
    }

    fn upload(&self, source: &mut dyn Read, path: &str) -> SftpResult<u64> {
        let mut data = vec![];
        source.read_to_end(&mut data)?;
        let len = data.len() as u64;
        self.state(path)?.insert(path, Node::File(data))?;
        Ok(len)
    }

    fn close(self) -> SftpResult<()> {
        self.connector.lock().closes += 1;
        Ok(())
    }
}

/// the directory tree the client tests run against
///
/// ```text
/// /root_file.dat
/// /tmp/
/// /a_dir/somefile.txt
/// /listed_dir/{a, b, subdir/{sub_c, subsubdir/{subsub_d}}, other_subdir/{i, a, of}}
/// ```
pub(crate) fn fixture() -> MemoryConnector {
    let connector = MemoryConnector::empty();
    connector.put_file("/root_file.dat", b"root file contents");
    connector.mkdir("/tmp");
    connector.mkdir("/a_dir");
    connector.put_file("/a_dir/somefile.txt", b"File content");
    connector.mkdir("/listed_dir");
    connector.put_file("/listed_dir/a", b"a_contents");
    connector.put_file("/listed_dir/b", b"b_contents");
    connector.mkdir("/listed_dir/subdir");
    connector.put_file("/listed_dir/subdir/sub_c", b"sub_c_contents");
    connector.mkdir("/listed_dir/subdir/subsubdir");
    connector.put_file("/listed_dir/subdir/subsubdir/subsub_d", b"subsub_d_contents");
    connector.mkdir("/listed_dir/other_subdir");
    connector.put_file("/listed_dir/other_subdir/i", b"am");
    connector.put_file("/listed_dir/other_subdir/a", b"set");
    connector.put_file("/listed_dir/other_subdir/of", b"files");
    connector
}

/// a client connected to [fixture], plus the connector to inspect it
pub(crate) fn connected_fixture() -> (Client<MemoryConnector>, MemoryConnector) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let connector = fixture();
    let client = ClientBuilder::new()
        .hostname("sftp.local")
        .username("user")
        .password("pw")
        .connector(connector.clone())
        .connect()
        .unwrap();
    (client, connector)
}
