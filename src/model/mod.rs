mod file;
mod file_attr;

pub use file::{File, FileId};
pub use file_attr::FileAttr;
