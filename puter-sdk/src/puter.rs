use crate::ai::core::Ai;
use crate::apps::core::Apps;
use crate::auth::Auth;
use crate::client::core::PuterHttpClient;
use crate::errors::Result;
use crate::fs::core::FileSystem;
use crate::hosting::Hosting;
use crate::kv::KeyValue;
use crate::session::Session;
use crate::usage::Usage;

/// One connection to a Puter backend.
///
/// `Puter` owns the [`Session`] (transport client plus bearer token) and mints
/// the resource adapters that share it. Adapters are cheap to create; grab one
/// per call or hold on to it, both work. Signing in or out through
/// [`Puter::auth`] changes the token seen by every adapter minted from this
/// instance, clones included.
///
/// # Example
/// ```no_run
/// # async fn run() -> puter::Result<()> {
/// let puter = puter::Puter::new()?;
/// puter.auth().sign_in("alice", "hunter2").await?;
///
/// puter.kv().set("visits", &1).await?;
/// for entry in puter.fs().readdir("/alice").await? {
///     println!("{}", entry.path);
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Puter {
    session: Session,
}

impl Puter {
    /// Anonymous connection to the public Puter cloud.
    ///
    /// Sign in via [`Puter::auth`] to obtain a token, or use
    /// [`Puter::with_token`] when you already hold one.
    pub fn new() -> Result<Puter> {
        Ok(Puter::with_client(PuterHttpClient::new()?, None))
    }

    /// Connection to the public Puter cloud with an existing bearer token.
    pub fn with_token(token: impl Into<String>) -> Result<Puter> {
        Ok(Puter::with_client(
            PuterHttpClient::new()?,
            Some(token.into()),
        ))
    }

    /// Pair a custom-configured transport client with an optional token.
    ///
    /// Use [`PuterHttpClient::builder`] to target a self-hosted instance or
    /// tune timeouts before handing the client over.
    pub fn with_client(client: PuterHttpClient, token: Option<String>) -> Puter {
        Puter {
            session: Session::new(client, token),
        }
    }

    /// The session shared by every adapter minted from this instance.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Authentication: sign-in, sign-out, account lookup.
    pub fn auth(&self) -> Auth {
        Auth::new(self.session.clone())
    }

    /// File storage.
    pub fn fs(&self) -> FileSystem {
        FileSystem::new(self.session.clone())
    }

    /// Key-value storage.
    pub fn kv(&self) -> KeyValue {
        KeyValue::new(self.session.clone())
    }

    /// App records and the provisioning workflow.
    pub fn apps(&self) -> Apps {
        Apps::new(self.session.clone())
    }

    /// Static site hosting on `puter.site` subdomains.
    pub fn hosting(&self) -> Hosting {
        Hosting::new(self.session.clone())
    }

    /// AI inference: chat, OCR, image generation, speech.
    pub fn ai(&self) -> Ai {
        Ai::new(self.session.clone())
    }

    /// Disk and service usage reporting.
    pub fn usage(&self) -> Usage {
        Usage::new(self.session.clone())
    }
}
