//! Common imports for quick starts.

// Common
pub use crate::{BuildError, Error, Result};

// Facade: one connection, all resource adapters.
pub use crate::Puter;

// Transport
pub use crate::{PuterHttpClient, PuterHttpClientBuilder};

// Resource adapters
pub use crate::{Ai, Apps, Auth, FileSystem, Hosting, KeyValue, Usage};

// Call options
pub use crate::{
    ChatArgs, ChatOptions, CreateAppOptions, MkdirOptions, UpdateAppOptions, UploadOptions,
};

// Models
pub use crate::{AppRecord, ChatMessage, FsEntry, SubdomainRecord, UserInfo};
