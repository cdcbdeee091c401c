use reqwest::Method;
use serde::Serialize;

use super::entry::{FsEntry, check_abs_path};
use crate::errors::{Error, RequestError, Result};
use crate::session::Session;
use crate::util::check_http_status;

/// File storage adapter. Obtained via [`crate::Puter::fs`].
///
/// Thin verbs over the drive endpoints (`/readdir`, `/mkdir`, `/stat`,
/// `/rename`, `/batch`, `/delete`). All paths are absolute; the signed-in
/// user's home is `/{username}`.
///
/// # Example
/// ```no_run
/// # async fn run() -> puter::Result<()> {
/// let puter = puter::Puter::with_token("my-token")?;
/// for entry in puter.fs().readdir("/alice").await? {
///     println!("{}{}", entry.name, if entry.is_dir { "/" } else { "" });
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct FileSystem {
    session: Session,
}

impl FileSystem {
    /// Construct from an existing session. Equivalent to [`crate::Puter::fs`].
    pub fn new(session: Session) -> FileSystem {
        FileSystem { session }
    }

    /// List the entries of a directory.
    pub async fn readdir(&self, path: &str) -> Result<Vec<FsEntry>> {
        check_abs_path(path)?;
        self.session.post_json("readdir", &PathArgs { path }).await
    }

    /// Create a directory.
    ///
    /// See [`MkdirOptions`] for overwrite/dedupe behavior; by default the call
    /// fails if the target already exists or its parent is missing.
    pub async fn mkdir(&self, options: MkdirOptions) -> Result<FsEntry> {
        check_abs_path(&options.path)?;
        self.session.post_json("mkdir", &options).await
    }

    /// Fetch the metadata of a single file or directory (`/stat`).
    pub async fn stat(&self, path: &str) -> Result<FsEntry> {
        check_abs_path(path)?;
        self.session.post_json("stat", &PathArgs { path }).await
    }

    /// Rename a file or directory in place, returning the updated entry.
    ///
    /// `new_name` is a base name, not a path; moving between directories is
    /// not part of this call.
    pub async fn rename(&self, path: &str, new_name: &str) -> Result<FsEntry> {
        check_abs_path(path)?;
        if new_name.trim().is_empty() {
            return Err(Error::from(RequestError::Validation {
                message: "New name must not be empty.".into(),
            }));
        }
        self.session
            .post_json("rename", &RenameArgs { path, new_name })
            .await
    }

    /// Upload a file into a directory via the multipart `/batch` endpoint,
    /// returning the created entry.
    pub async fn upload(&self, options: UploadOptions) -> Result<FsEntry> {
        check_abs_path(&options.dest)?;
        if options.name.trim().is_empty() {
            return Err(Error::from(RequestError::Validation {
                message: "File name must not be empty.".into(),
            }));
        }

        let operation = serde_json::to_string(&WriteOperation {
            op: "write",
            path: &options.dest,
            name: &options.name,
            overwrite: options.overwrite,
        })?;
        let part = reqwest::multipart::Part::bytes(options.data).file_name(options.name.clone());
        let form = reqwest::multipart::Form::new()
            .text("operation", operation)
            .part("file", part);

        let resp = self
            .session
            .request(Method::POST, "batch")
            .await?
            .multipart(form)
            .send()
            .await?;
        let resp = check_http_status(resp).await?;

        let batch: BatchResponse = resp.json().await?;
        batch.results.into_iter().next().ok_or_else(|| {
            Error::from(RequestError::DecodeJson {
                message: "The batch upload response contained no entries.".into(),
            })
        })
    }

    /// Delete a file or directory (recursively).
    pub async fn delete(&self, path: &str) -> Result<()> {
        check_abs_path(path)?;
        let resp = self
            .session
            .request(Method::POST, "delete")
            .await?
            .json(&DeleteArgs { paths: vec![path] })
            .send()
            .await?;
        check_http_status(resp).await?;
        Ok(())
    }
}

/// Options for [`FileSystem::mkdir`].
///
/// Defaults mirror the endpoint's: no overwrite, no name deduplication, no
/// auto-created parents.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct MkdirOptions {
    path: String,
    overwrite: bool,
    dedupe_name: bool,
    create_missing_parents: bool,
}

impl MkdirOptions {
    /// Target an absolute directory path.
    pub fn new(path: impl Into<String>) -> MkdirOptions {
        MkdirOptions {
            path: path.into(),
            overwrite: false,
            dedupe_name: false,
            create_missing_parents: false,
        }
    }

    /// Replace an existing entry at the target path.
    pub const fn overwrite(mut self, yes: bool) -> Self {
        self.overwrite = yes;
        self
    }

    /// Let the server pick a free name (`dir`, `dir (1)`, …) on collision.
    pub const fn dedupe_name(mut self, yes: bool) -> Self {
        self.dedupe_name = yes;
        self
    }

    /// Create intermediate directories as needed.
    pub const fn create_missing_parents(mut self, yes: bool) -> Self {
        self.create_missing_parents = yes;
        self
    }
}

/// Options for [`FileSystem::upload`]: destination directory, file name and
/// raw contents.
#[derive(Debug, Clone)]
#[must_use]
pub struct UploadOptions {
    dest: String,
    name: String,
    data: Vec<u8>,
    overwrite: bool,
}

impl UploadOptions {
    /// Upload `data` as `{dest}/{name}`.
    pub fn new(dest: impl Into<String>, name: impl Into<String>, data: Vec<u8>) -> UploadOptions {
        UploadOptions {
            dest: dest.into(),
            name: name.into(),
            data,
            overwrite: true,
        }
    }

    /// Whether an existing file of the same name is replaced. Defaults to true.
    pub const fn overwrite(mut self, yes: bool) -> Self {
        self.overwrite = yes;
        self
    }
}

#[derive(Debug, Serialize)]
struct PathArgs<'a> {
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct RenameArgs<'a> {
    path: &'a str,
    new_name: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteArgs<'a> {
    paths: Vec<&'a str>,
}

/// One write instruction inside a `/batch` multipart request. The JSON goes
/// into an `operation` form field, the file bytes into the matching `file`
/// part.
#[derive(Debug, Serialize)]
struct WriteOperation<'a> {
    op: &'a str,
    path: &'a str,
    name: &'a str,
    overwrite: bool,
}

#[derive(Debug, serde::Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<FsEntry>,
}
