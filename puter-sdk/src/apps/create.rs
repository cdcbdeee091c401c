//! The app provisioning workflow: one `create` call that wires up a backend
//! record, a storage directory, a public subdomain serving that directory,
//! and a cross-link from the record back to the subdomain URL.
//!
//! The platform offers no multi-resource transaction, so the four steps run
//! strictly in sequence, each consuming the previous step's output, and a
//! failure at any step aborts the rest.

use rand::distr::{Alphanumeric, SampleString};
use serde::Serialize;

use super::core::{Apps, INTERFACE};
use super::model::AppRecord;
use crate::errors::{BackendError, Error, RequestError, Result};
use crate::fs::core::{FileSystem, MkdirOptions};
use crate::fs::entry::FsEntry;
use crate::hosting::{DEFAULT_SITE_HOST, Hosting, SubdomainRecord};

/// Input to [`Apps::create`]. Only the name is required.
#[derive(Debug, Clone)]
#[must_use]
pub struct CreateAppOptions {
    pub(crate) name: String,
    pub(crate) url: Option<String>,
    pub(crate) description: Option<String>,
}

impl CreateAppOptions {
    /// Create options for an app called `name`.
    pub fn new(name: impl Into<String>) -> CreateAppOptions {
        CreateAppOptions {
            name: name.into(),
            url: None,
            description: None,
        }
    }

    /// Initial URL the app record points at, before the subdomain cross-link
    /// overwrites it.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Free-form description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Everything provisioned by [`Apps::create`].
#[derive(Debug, Clone)]
pub struct CreatedApp {
    /// The app record, with `index_url` already pointing at the subdomain.
    pub record: AppRecord,
    /// The storage directory backing the app's site.
    pub directory: FsEntry,
    /// The subdomain serving the directory.
    pub subdomain: SubdomainRecord,
}

impl Apps {
    /// Create a fully wired app: record, storage directory, subdomain, and
    /// the record's `index_url` pointing at that subdomain.
    ///
    /// The four steps run in strict sequence:
    /// 1. create the app record (name deduplication on; a taken name fails
    ///    with a backend `already_in_use` error, see
    ///    [`Error::is_already_exists`]),
    /// 2. create a directory under `/{owner}/AppData/{app-uid}` with a random
    ///    leaf name,
    /// 3. create a subdomain named `{app-name}-{short-uid}` rooted at that
    ///    directory,
    /// 4. patch the record's `index_url` to `https://{subdomain}.puter.site`
    ///    and its title to the app name.
    ///
    /// There is **no rollback**: if a later step fails, the resources created
    /// by earlier steps are left behind (an orphaned record, directory or
    /// subdomain) and must be cleaned up by the caller.
    ///
    /// # Example
    /// ```no_run
    /// # use puter::CreateAppOptions;
    /// # async fn run() -> puter::Result<()> {
    /// let puter = puter::Puter::with_token("my-token")?;
    /// let app = puter
    ///     .apps()
    ///     .create(CreateAppOptions::new("test-app").url("https://test.app"))
    ///     .await?;
    /// println!("serving at {}", app.record.index_url);
    /// # Ok(()) }
    /// ```
    pub async fn create(&self, options: CreateAppOptions) -> Result<CreatedApp> {
        if options.name.trim().is_empty() {
            return Err(Error::from(RequestError::Validation {
                message: "App name is required.".into(),
            }));
        }

        let record = self.create_record(&options).await?;
        tracing::debug!(app = %record.name, uid = %record.uid, "created app record");

        let directory = self.create_app_directory(&record).await?;
        tracing::debug!(path = %directory.path, "created app directory");

        let subdomain = self.create_subdomain(&options.name, &directory).await?;
        tracing::debug!(subdomain = %subdomain.subdomain, "created subdomain");

        let record = self
            .link_subdomain(record, &options.name, &subdomain.subdomain)
            .await?;
        tracing::debug!(index_url = %record.index_url, "linked app to subdomain");

        Ok(CreatedApp {
            record,
            directory,
            subdomain,
        })
    }

    /// Step 1: create the app record with the fixed launch metadata.
    async fn create_record(&self, options: &CreateAppOptions) -> Result<AppRecord> {
        let args = CreateRecordArgs {
            object: NewAppObject {
                name: &options.name,
                index_url: options.url.as_deref().unwrap_or_default(),
                title: &options.name,
                description: options.description.as_deref().unwrap_or_default(),
                maximize_on_start: false,
                background: false,
                metadata: NewAppMetadata {
                    window_resizable: true,
                },
            },
            options: CreateRecordOptions { dedupe_name: true },
        };
        self.session.driver_call(INTERFACE, "create", &args).await
    }

    /// Step 2: create the storage directory backing the app's site.
    ///
    /// The parent path is deterministic (`/{owner}/AppData/{uid}`); the leaf
    /// is a random token, so repeated creates cannot collide and server-side
    /// deduplication stays off.
    async fn create_app_directory(&self, record: &AppRecord) -> Result<FsEntry> {
        let owner = record
            .owner
            .as_ref()
            .map(|o| o.username.as_str())
            .unwrap_or_default();
        if owner.is_empty() || record.uid.is_empty() {
            return Err(Error::from(RequestError::Validation {
                message: "Invalid app record: missing owner or uid.".into(),
            }));
        }

        let path = format!("/{owner}/AppData/{}/{}", record.uid, random_leaf());
        let entry = FileSystem::new(self.session.clone())
            .mkdir(
                MkdirOptions::new(path)
                    .overwrite(true)
                    .dedupe_name(false)
                    .create_missing_parents(true),
            )
            .await?;

        if entry.uid.is_empty() {
            return Err(Error::from(RequestError::DecodeJson {
                message: "The mkdir response did not include a directory uid.".into(),
            }));
        }
        Ok(entry)
    }

    /// Step 3: create the subdomain serving the directory.
    async fn create_subdomain(
        &self,
        app_name: &str,
        directory: &FsEntry,
    ) -> Result<SubdomainRecord> {
        let subdomain = derive_subdomain_name(app_name, &directory.uid);
        Hosting::new(self.session.clone())
            .create(&subdomain, &directory.path)
            .await
            .map_err(subdomain_step_error)
    }

    /// Step 4: point the record's `index_url` at the subdomain and set the
    /// title. The patched fields are mirrored onto the local record; the
    /// response body is not consulted.
    async fn link_subdomain(
        &self,
        mut record: AppRecord,
        app_name: &str,
        subdomain: &str,
    ) -> Result<AppRecord> {
        let index_url = format!("https://{subdomain}.{DEFAULT_SITE_HOST}");
        self.session
            .driver_call_unit(
                INTERFACE,
                "update",
                &LinkArgs {
                    id: super::core::AppId { name: &record.name },
                    object: LinkPatch {
                        index_url: &index_url,
                        title: app_name,
                    },
                },
            )
            .await
            .map_err(link_step_error)?;

        record.index_url = index_url;
        record.title = app_name.to_string();
        Ok(record)
    }
}

/// `{app-name}-{first '-'-separated segment of the directory uid}`: short and
/// collision-resistant without carrying the whole uid into DNS.
fn derive_subdomain_name(app_name: &str, dir_uid: &str) -> String {
    let short = dir_uid.split('-').next().unwrap_or_default();
    format!("{app_name}-{short}")
}

/// Random alphanumeric leaf for the app's storage directory.
fn random_leaf() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 20)
}

/// Step-3 mapping: a structured backend message wins; transport failures pass
/// through; anything else collapses into the fixed subdomain failure.
fn subdomain_step_error(source: Error) -> Error {
    match source {
        Error::Request(RequestError::Backend(e))
            if !e.message.is_empty() && e.code != crate::errors::MISSING_ERROR_BODY =>
        {
            Error::Request(RequestError::Backend(e))
        }
        Error::Request(RequestError::Transport(e)) => Error::Request(RequestError::Transport(e)),
        _ => Error::Request(RequestError::Backend(BackendError {
            code: "subdomain_creation_failed".into(),
            message: "Failed to create subdomain".into(),
            details: serde_json::Map::new(),
        })),
    }
}

/// Step-4 mapping: every envelope-reported failure collapses into the fixed
/// cross-link failure; transport failures pass through.
fn link_step_error(source: Error) -> Error {
    match source {
        Error::Request(RequestError::Transport(e)) => Error::Request(RequestError::Transport(e)),
        _ => Error::Request(RequestError::Backend(BackendError {
            code: "app_update_failed".into(),
            message: "Failed to update app with subdomain URL".into(),
            details: serde_json::Map::new(),
        })),
    }
}

#[derive(Debug, Serialize)]
struct CreateRecordArgs<'a> {
    object: NewAppObject<'a>,
    options: CreateRecordOptions,
}

#[derive(Debug, Serialize)]
struct NewAppObject<'a> {
    name: &'a str,
    index_url: &'a str,
    title: &'a str,
    description: &'a str,
    maximize_on_start: bool,
    background: bool,
    metadata: NewAppMetadata,
}

#[derive(Debug, Serialize)]
struct NewAppMetadata {
    window_resizable: bool,
}

#[derive(Debug, Serialize)]
struct CreateRecordOptions {
    dedupe_name: bool,
}

#[derive(Debug, Serialize)]
struct LinkArgs<'a> {
    id: super::core::AppId<'a>,
    object: LinkPatch<'a>,
}

#[derive(Debug, Serialize)]
struct LinkPatch<'a> {
    index_url: &'a str,
    title: &'a str,
}
