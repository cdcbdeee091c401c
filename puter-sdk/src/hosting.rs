//! Static-site hosting: subdomains bound to storage directories.
//!
//! A subdomain record binds a DNS label under [`DEFAULT_SITE_HOST`] to a
//! directory on the user's drive; the platform serves that directory's
//! contents as a static site. All operations go through the
//! `puter-subdomains` driver interface.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::session::Session;

/// Host suffix under which created subdomains are served
/// (`https://{subdomain}.puter.site`).
pub const DEFAULT_SITE_HOST: &str = "puter.site";

const INTERFACE: &str = "puter-subdomains";

/// Hosting adapter. Obtained via [`crate::Puter::hosting`].
///
/// # Example
/// ```no_run
/// # async fn run() -> puter::Result<()> {
/// let puter = puter::Puter::with_token("my-token")?;
/// let site = puter.hosting().create("my-site", "/alice/www").await?;
/// println!("serving at https://{}.{}", site.subdomain, puter::DEFAULT_SITE_HOST);
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Hosting {
    session: Session,
}

/// A subdomain bound to a storage directory for static serving.
#[derive(Debug, Clone, Deserialize)]
pub struct SubdomainRecord {
    /// Stable identifier of the record.
    #[serde(default)]
    pub uid: String,
    /// The DNS label, without the [`DEFAULT_SITE_HOST`] suffix.
    #[serde(default)]
    pub subdomain: String,
    /// The directory served by this subdomain, as the server reports it.
    #[serde(default)]
    pub root_dir: Option<serde_json::Value>,
    /// Any additional fields returned by the server, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Hosting {
    /// Construct from an existing session. Equivalent to [`crate::Puter::hosting`].
    pub fn new(session: Session) -> Hosting {
        Hosting { session }
    }

    /// Create a subdomain serving the directory at `root_dir`.
    pub async fn create(&self, subdomain: &str, root_dir: &str) -> Result<SubdomainRecord> {
        self.session
            .driver_call(
                INTERFACE,
                "create",
                &CreateArgs {
                    object: NewSubdomain {
                        subdomain,
                        root_dir,
                    },
                },
            )
            .await
    }

    /// List the subdomains the signed-in user can edit.
    pub async fn list(&self) -> Result<Vec<SubdomainRecord>> {
        self.session
            .driver_call(
                INTERFACE,
                "select",
                &SelectArgs {
                    predicate: ["user-can-edit"],
                },
            )
            .await
    }

    /// Delete a subdomain record. The label is the identifier the backend
    /// addresses the record by; the served directory is left untouched.
    pub async fn delete(&self, subdomain: &str) -> Result<()> {
        self.session
            .driver_call_unit(
                INTERFACE,
                "delete",
                &DeleteArgs {
                    id: SubdomainId { subdomain },
                },
            )
            .await
    }
}

#[derive(Debug, Serialize)]
struct CreateArgs<'a> {
    object: NewSubdomain<'a>,
}

#[derive(Debug, Serialize)]
struct NewSubdomain<'a> {
    subdomain: &'a str,
    root_dir: &'a str,
}

#[derive(Debug, Serialize)]
struct SelectArgs {
    predicate: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct DeleteArgs<'a> {
    id: SubdomainId<'a>,
}

#[derive(Debug, Serialize)]
struct SubdomainId<'a> {
    subdomain: &'a str,
}
