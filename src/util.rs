use std::path::Path;

/// render a local path with forward slashes, whatever the platform
pub(crate) fn posix_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// join a directory and an entry name the way a posix shell would
pub(crate) fn join(dir: &str, name: &str) -> String {
    if name.starts_with('/') || dir.is_empty() {
        name.to_owned()
    } else if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// directory part of a remote path, empty when there is none
pub(crate) fn parent(path: &str) -> &str {
    match path.rfind('/') {
        None => "",
        Some(i) => {
            let head = &path[..=i];
            let trimmed = head.trim_end_matches('/');
            if trimmed.is_empty() {
                head
            } else {
                trimmed
            }
        }
    }
}

/// every directory prefix of `path`, root side first
///
/// `/a/b/c` gives `/a`, `/a/b`, `/a/b/c`; relative paths stay relative.
/// Empty segments are skipped, `.`/`..` are passed through untouched.
pub(crate) fn prefixes(path: &str) -> Vec<String> {
    let mut current = if path.starts_with('/') {
        String::from("/")
    } else {
        String::new()
    };
    let mut out = vec![];
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = join(&current, segment);
        out.push(current.clone());
    }
    out
}
