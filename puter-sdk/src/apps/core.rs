use serde::Serialize;

use super::model::AppRecord;
use crate::Result;
use crate::errors::{Error, RequestError};
use crate::session::Session;

pub(crate) const INTERFACE: &str = "puter-apps";

/// Application adapter. Obtained via [`crate::Puter::apps`].
///
/// Simple record CRUD lives here; [`Apps::create`] runs the full provisioning
/// workflow (record, storage directory, subdomain, cross-link) and is
/// documented in [`create`](crate::Apps::create).
#[derive(Debug, Clone)]
pub struct Apps {
    pub(crate) session: Session,
}

impl Apps {
    /// Construct from an existing session. Equivalent to [`crate::Puter::apps`].
    pub fn new(session: Session) -> Apps {
        Apps { session }
    }

    /// List the apps the signed-in user can edit.
    pub async fn list(&self) -> Result<Vec<AppRecord>> {
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

    /// Fetch one app record by name.
    pub async fn get(&self, name: &str) -> Result<AppRecord> {
        self.session
            .driver_call(INTERFACE, "read", &ReadArgs { id: AppId { name } })
            .await
    }

    /// Patch an app record's fields, returning the updated record.
    ///
    /// Only record fields are touched; the contents of the app's served
    /// directory are managed through [`crate::FileSystem`].
    pub async fn update(&self, name: &str, options: UpdateAppOptions) -> Result<AppRecord> {
        let updated: Option<AppRecord> = self
            .session
            .driver_call(
                INTERFACE,
                "update",
                &UpdateArgs {
                    id: AppId { name },
                    object: &options,
                },
            )
            .await?;
        updated.ok_or_else(|| {
            Error::from(RequestError::DecodeJson {
                message: "The update response did not include the app record.".into(),
            })
        })
    }

    /// Delete an app record by name.
    ///
    /// The app's storage directory and any subdomain pointing at it are left
    /// in place.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.session
            .driver_call_unit(INTERFACE, "delete", &ReadArgs { id: AppId { name } })
            .await
    }
}

/// Record patch for [`Apps::update`]; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[must_use]
pub struct UpdateAppOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
}

impl UpdateAppOptions {
    /// An empty patch; chain setters for the fields to change.
    pub fn new() -> UpdateAppOptions {
        UpdateAppOptions::default()
    }

    /// Rename the app.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Point the app at a new URL.
    pub fn index_url(mut self, index_url: impl Into<String>) -> Self {
        self.index_url = Some(index_url.into());
        self
    }

    /// Change the display title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Change the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the metadata bag.
    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectArgs {
    pub(crate) predicate: [&'static str; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct AppId<'a> {
    pub(crate) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReadArgs<'a> {
    pub(crate) id: AppId<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateArgs<'a> {
    id: AppId<'a>,
    object: &'a UpdateAppOptions,
}
