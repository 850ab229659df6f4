use super::Client;
use crate::{
    channel::{Channel, Connect},
    error::{SftpError, SftpResult},
    model::FileAttr,
    util,
};
use std::iter::FusedIterator;
use tracing::*;

struct Frame {
    dir: String,
    depth: usize,
    entries: std::vec::IntoIter<FileAttr>,
}

/// Depth-first walk over a remote directory, see [Client::tree]
///
/// Directories are listed only when the walk reaches them, one listing
/// per directory. After the first error the walk yields nothing more.
///
pub struct Tree<'a, H: Channel> {
    channel: &'a H,
    max_depth: Option<usize>,
    root: Option<String>,
    stack: Vec<Frame>,
    done: bool,
}

impl<'a, H: Channel> Tree<'a, H> {
    fn new(channel: &'a H, path: &str, max_depth: Option<usize>) -> Self {
        Tree {
            channel,
            max_depth,
            root: Some(path.to_owned()),
            stack: vec![],
            done: false,
        }
    }

    fn descend(&mut self, dir: String, depth: usize) -> SftpResult<()> {
        debug!("walking into {} at depth {}", dir, depth);
        let entries = self
            .channel
            .read_dir(&dir)
            .map_err(|e| SftpError::traversal(&dir, e))?;
        self.stack.push(Frame {
            dir,
            depth,
            entries: entries.into_iter(),
        });
        Ok(())
    }

    fn fail(&mut self, e: SftpError) -> Option<SftpResult<FileAttr>> {
        error!("{}", e);
        self.done = true;
        self.stack.clear();
        Some(Err(e))
    }
}

impl<H: Channel> Iterator for Tree<'_, H> {
    type Item = SftpResult<FileAttr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(root) = self.root.take() {
            if let Err(e) = self.descend(root, 0) {
                return self.fail(e);
            }
        }
        loop {
            let frame = match self.stack.last_mut() {
                Some(frame) => frame,
                None => {
                    self.done = true;
                    return None;
                }
            };
            let entry = match frame.entries.next() {
                Some(entry) => entry,
                None => {
                    self.stack.pop();
                    continue;
                }
            };
            if !entry.is_dir() {
                return Some(Ok(entry));
            }
            let depth = frame.depth;
            if self.max_depth.map_or(true, |max| depth < max) {
                let dir = util::join(&frame.dir, &entry.name);
                if let Err(e) = self.descend(dir, depth + 1) {
                    return self.fail(e);
                }
            }
        }
    }
}

impl<H: Channel> FusedIterator for Tree<'_, H> {}

impl<C: Connect> Client<C> {
    /// walk `path` depth first, yielding every non-directory entry
    ///
    /// A subdirectory's contents are yielded as soon as the walk reaches
    /// it, before the siblings that follow it. `max_depth` counts levels
    /// below `path`: `Some(0)` yields only the entries of `path` itself,
    /// `None` walks everything. Each call walks the server afresh.
    ///
    /// Symlink loops are not detected; the walk assumes a finite tree.
    ///
    pub fn tree(&self, path: &str, max_depth: Option<usize>) -> SftpResult<Tree<'_, C::Channel>> {
        let channel = self.channel()?;
        Ok(Tree::new(channel, path, max_depth))
    }

    /// the whole of [Client::tree] collected, same order
    ///
    pub fn tree_list(&self, path: &str) -> SftpResult<Vec<FileAttr>> {
        self.tree(path, None)?.collect()
    }
}
