//! Document identifiers and path helpers.
//!
//! Hosts identify documents by URI (`file:///...`, `untitled:...`) or by plain path. The
//! navigation engine orders files, matches them against the active editor and tests them
//! against globs using the *path component* only, so this module extracts it once per id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-provided document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileId {
    uri: String,
    path: String,
}

impl FileId {
    /// Create an id from a URI or plain path.
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let path = uri_path(&uri);
        Self { uri, path }
    }

    /// The identifier exactly as the host provided it.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The decoded path component (`/home/me/src/lib.rs` for `file:///home/me/src/lib.rs`).
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<FileId> for String {
    fn from(value: FileId) -> Self {
        value.uri
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// A root folder of the open workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFolder {
    /// Display name of the folder (used as a prefix in multi-root workspaces).
    pub name: String,
    /// Folder path, in the same form as [`FileId::path`].
    pub path: String,
}

impl WorkspaceFolder {
    /// Create a workspace folder.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

fn scheme_len(uri: &str) -> Option<usize> {
    let colon = uri.find(':')?;
    let scheme = &uri[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    // A single letter is a Windows drive (`C:`), not a scheme.
    if scheme.len() < 2 || !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some(colon)
}

/// Extract the decoded path component of a URI. Plain paths are returned unchanged.
pub fn uri_path(uri: &str) -> String {
    let Some(colon) = scheme_len(uri) else {
        return uri.to_string();
    };

    let rest = &uri[colon + 1..];
    let rest = match rest.strip_prefix("//") {
        // Skip the authority (`localhost`, `server`, empty for `file:///`).
        Some(after) => match after.find('/') {
            Some(slash) => &after[slash..],
            None => "/",
        },
        None => rest,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    decode_escapes(&rest[..end])
}

/// Decode `%XX` escapes of a path. Malformed escapes are kept verbatim.
fn decode_escapes(encoded: &str) -> String {
    let mut decoded = Vec::with_capacity(encoded.len());
    let mut rest = encoded.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        let escaped = match tail {
            [hi, lo, ..] if byte == b'%' && hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                std::str::from_utf8(&tail[..2])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            }
            _ => None,
        };
        match escaped {
            Some(value) => {
                decoded.push(value);
                rest = &tail[2..];
            }
            None => {
                decoded.push(byte);
                rest = tail;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Path of `path` relative to the workspace folder containing it.
///
/// Returns `None` when no folder strictly contains the path. In a multi-root workspace the
/// folder name is prepended (`frontend/src/app.ts`).
pub fn workspace_relative_path(path: &str, folders: &[WorkspaceFolder]) -> Option<String> {
    for folder in folders {
        let root = folder.path.trim_end_matches('/');
        let Some(rest) = path.strip_prefix(root) else {
            continue;
        };
        let Some(relative) = rest.strip_prefix('/') else {
            continue;
        };
        if relative.is_empty() {
            continue;
        }
        if folders.len() > 1 {
            return Some(format!("{}/{}", folder.name, relative));
        }
        return Some(relative.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_path_extraction() {
        assert_eq!(uri_path("file:///tmp/a%20b.rs"), "/tmp/a b.rs");
        assert_eq!(uri_path("file://server/share/x.rs"), "/share/x.rs");
        assert_eq!(uri_path("untitled:Untitled-1"), "Untitled-1");
        assert_eq!(uri_path("file:///a.rs?query#frag"), "/a.rs");
        assert_eq!(uri_path("/plain/path.rs"), "/plain/path.rs");
        assert_eq!(uri_path("C:/windows/path.rs"), "C:/windows/path.rs");
    }

    #[test]
    fn test_uri_path_keeps_malformed_escapes() {
        assert_eq!(uri_path("file:///a%2"), "/a%2");
        assert_eq!(uri_path("file:///a%zz"), "/a%zz");
        assert_eq!(uri_path("file:///a%+1"), "/a%+1");
        assert_eq!(uri_path("file:///%41%42"), "/AB");
        assert_eq!(uri_path("file:///caf%C3%A9.rs"), "/café.rs");
    }

    #[test]
    fn test_workspace_relative_single_and_multi_root() {
        let single = [WorkspaceFolder::new("proj", "/home/me/proj")];
        assert_eq!(
            workspace_relative_path("/home/me/proj/src/lib.rs", &single).as_deref(),
            Some("src/lib.rs")
        );
        assert_eq!(workspace_relative_path("/home/me/project/x.rs", &single), None);
        assert_eq!(workspace_relative_path("/home/me/proj", &single), None);

        let multi = [
            WorkspaceFolder::new("web", "/repo/web/"),
            WorkspaceFolder::new("api", "/repo/api"),
        ];
        assert_eq!(
            workspace_relative_path("/repo/api/main.go", &multi).as_deref(),
            Some("api/main.go")
        );
    }

    #[test]
    fn test_file_id_keeps_raw_and_path() {
        let id = FileId::new("file:///src/foo.test.ts");
        assert_eq!(id.as_str(), "file:///src/foo.test.ts");
        assert_eq!(id.path(), "/src/foo.test.ts");
        assert_eq!(id.to_string(), "file:///src/foo.test.ts");
    }
}
