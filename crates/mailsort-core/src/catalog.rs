//! The per-run catalog of recipient folders.

use std::collections::BTreeMap;

use mailsort_imap::{ListResponse, MailboxAttribute};

use crate::config::RoutingOptions;
use crate::transport::{MailSession, TransportResult};
use crate::{Error, Result};

/// Delimiter assumed when the server reports none for the root.
const DEFAULT_DELIMITER: char = '.';

/// Folders known to exist under `<root><d><container>` for one run.
///
/// Keys are lower-cased folder names; values are the full server paths,
/// which keep the server's spelling. The catalog only grows.
#[derive(Debug, Clone)]
pub struct FolderCatalog {
    root: String,
    container_path: String,
    delimiter: char,
    folders: BTreeMap<String, String>,
    created: usize,
}

impl FolderCatalog {
    /// Reads the folder tree and seeds the catalog with the container's
    /// immediate children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] when the root is missing, or when the
    /// container is missing and may not (or cannot) be created. Returns
    /// [`Error::Transport`] when the folder tree cannot be listed.
    pub async fn initialize<M: MailSession>(
        session: &mut M,
        options: &RoutingOptions,
    ) -> Result<Self> {
        let tree = session.list_folders().await?;

        let root_entry = tree
            .iter()
            .find(|entry| is_root(entry, &options.root))
            .ok_or_else(|| Error::Structural(format!("root folder missing: {}", options.root)))?;
        let root = root_entry.mailbox.as_str().to_string();
        let delimiter = root_entry.delimiter.unwrap_or(DEFAULT_DELIMITER);

        let wanted = format!("{root}{delimiter}{}", options.container);
        let container_path = match tree
            .iter()
            .find(|entry| entry.mailbox.as_str().eq_ignore_ascii_case(&wanted))
        {
            Some(entry) => entry.mailbox.as_str().to_string(),
            None if options.create_container => {
                create_container(session, &wanted).await?;
                wanted
            }
            None => {
                return Err(Error::Structural(format!(
                    "container folder missing: {wanted}"
                )));
            }
        };

        let prefix = format!("{container_path}{delimiter}");
        let mut folders = BTreeMap::new();
        for entry in &tree {
            if entry.attributes.contains(&MailboxAttribute::NonExistent) {
                continue;
            }
            if let Some(name) = child_name(entry.mailbox.as_str(), &prefix, delimiter) {
                folders
                    .entry(name.to_lowercase())
                    .or_insert_with(|| entry.mailbox.as_str().to_string());
            }
        }

        tracing::info!(
            root = %root,
            container = %container_path,
            %delimiter,
            known = folders.len(),
            "folder catalog ready"
        );

        Ok(Self {
            root,
            container_path,
            delimiter,
            folders,
            created: 0,
        })
    }

    /// Makes sure the folder for `name` exists and returns its full path.
    ///
    /// A known folder costs no round trip. Otherwise the folder is created;
    /// if the server says it already exists it is adopted all the same.
    ///
    /// # Errors
    ///
    /// Returns the server's error for any other creation failure. Nothing is
    /// added to the catalog in that case.
    pub async fn ensure<M: MailSession>(
        &mut self,
        session: &mut M,
        name: &str,
    ) -> TransportResult<String> {
        let key = name.to_lowercase();
        if let Some(path) = self.folders.get(&key) {
            return Ok(path.clone());
        }

        let path = format!("{}{}{key}", self.container_path, self.delimiter);
        match session.create_folder(&path).await {
            Ok(()) => {
                tracing::info!(folder = %key, %path, "created folder");
                self.created += 1;
            }
            Err(e) if e.is_already_exists() => {
                tracing::debug!(folder = %key, %path, "folder already exists on the server");
            }
            Err(e) => return Err(e),
        }

        self.folders.insert(key, path.clone());
        Ok(path)
    }

    /// Returns true if `name` is known, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.folders.contains_key(&name.to_lowercase())
    }

    /// Returns the full path of a known folder.
    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.folders.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Known folder names, lower-cased, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    /// Number of known folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Returns true if no folder is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Server path of the root folder.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Server path of the container folder.
    #[must_use]
    pub fn container_path(&self) -> &str {
        &self.container_path
    }

    /// Hierarchy delimiter in use.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Number of folders this catalog created on the server.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }
}

/// `INBOX` is case-insensitive (RFC 3501); any other root must match exactly.
fn is_root(entry: &ListResponse, root: &str) -> bool {
    if root.eq_ignore_ascii_case("INBOX") {
        entry.mailbox.is_inbox()
    } else {
        entry.mailbox.as_str() == root
    }
}

/// Returns the last path segment when `path` is an immediate child of the
/// folder that `prefix` (path plus delimiter) names.
fn child_name<'a>(path: &'a str, prefix: &str, delimiter: char) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let name = &path[prefix.len()..];
    (!name.is_empty() && !name.contains(delimiter)).then_some(name)
}

async fn create_container<M: MailSession>(session: &mut M, path: &str) -> Result<()> {
    match session.create_folder(path).await {
        Ok(()) => {
            tracing::info!(%path, "created container folder");
            Ok(())
        }
        Err(e) if e.is_already_exists() => Ok(()),
        Err(e) => Err(Error::Structural(format!(
            "cannot create container folder {path}: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_name_only_matches_immediate_children() {
        let prefix = "INBOX.Received.";
        assert_eq!(child_name("INBOX.Received.bob", prefix, '.'), Some("bob"));
        assert_eq!(child_name("inbox.received.Bob", prefix, '.'), Some("Bob"));
        assert_eq!(child_name("INBOX.Received.bob.old", prefix, '.'), None);
        assert_eq!(child_name("INBOX.Received", prefix, '.'), None);
        assert_eq!(child_name("INBOX.Received.", prefix, '.'), None);
        assert_eq!(child_name("INBOX.Sent", prefix, '.'), None);
    }

    #[test]
    fn test_child_name_with_slash_delimiter() {
        let prefix = "INBOX/Received/";
        assert_eq!(child_name("INBOX/Received/dave", prefix, '/'), Some("dave"));
        assert_eq!(child_name("INBOX/Received/dave.smith", prefix, '/'), Some("dave.smith"));
    }

    #[test]
    fn test_child_name_survives_multibyte_paths() {
        assert_eq!(child_name("Entwürfe", "INBOX.Received.", '.'), None);
    }
}
