#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

mod ai;
mod apps;
mod auth;
mod client;
pub mod errors;
mod fs;
mod hosting;
mod kv;
mod puter;
mod session;
mod usage;
mod util;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Transport
pub use client::core::{DEFAULT_API_URL, PuterHttpClient, PuterHttpClientBuilder};
// Facade and the session it owns
pub use crate::puter::Puter;
pub use session::Session;
// Resource adapters
pub use ai::core::Ai;
pub use apps::core::Apps;
pub use auth::Auth;
pub use fs::core::FileSystem;
pub use hosting::Hosting;
pub use kv::KeyValue;
pub use usage::Usage;

// Errors
pub use errors::{BuildError, Error, Result};

// Export common types and constants
pub use ai::chat::{
    ChatArgs, ChatCompletion, ChatInput, ChatMessage, ChatOptions, ChatReply, ContentPart,
    MessageContent, Role,
};
pub use ai::core::Voice;
pub use ai::stream::ByteStream;
pub use apps::core::UpdateAppOptions;
pub use apps::create::{CreateAppOptions, CreatedApp};
pub use apps::model::{AppOwner, AppRecord};
pub use auth::UserInfo;
pub use fs::core::{MkdirOptions, UploadOptions};
pub use fs::entry::FsEntry;
pub use hosting::{DEFAULT_SITE_HOST, SubdomainRecord};
pub use kv::MAX_KEY_LENGTH;
pub use usage::{DiskUsage, UsageInfo};

// Re-exports
pub use reqwest::{Method, StatusCode};
