use serde::{Deserialize, Serialize};

use super::chat::{
    ChatArgs, ChatInput, ChatReply, append_image_parts, assemble, check_messages, into_messages,
};
use super::stream::ByteStream;
use crate::errors::{Error, RequestError, Result};
use crate::fs::core::{FileSystem, UploadOptions};
use crate::session::Session;

pub(crate) const CHAT_INTERFACE: &str = "puter-chat-completion";
const OCR_INTERFACE: &str = "puter-ocr";
const IMAGE_INTERFACE: &str = "puter-image-generation";
const TTS_INTERFACE: &str = "puter-tts";

/// AI inference adapter. Obtained via [`crate::Puter::ai`].
///
/// # Example
/// ```no_run
/// # async fn run() -> puter::Result<()> {
/// let puter = puter::Puter::with_token("my-token")?;
/// let reply = puter
///     .ai()
///     .chat("Tell me a joke", puter::ChatArgs::new())
///     .await?;
/// if let Some(completion) = reply.into_completion() {
///     println!("{}", completion.text());
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Ai {
    session: Session,
}

impl Ai {
    /// Construct from an existing session. Equivalent to [`crate::Puter::ai`].
    pub fn new(session: Session) -> Ai {
        Ai { session }
    }

    /// Request a chat completion.
    ///
    /// `input` is either a bare prompt (one user message) or a full message
    /// history; [`ChatArgs`] carries the optional knobs. Image attachments
    /// are uploaded first and appended to the last user message as
    /// `file://{uid}` references.
    ///
    /// With `stream` off (the default) the reply is a buffered
    /// [`ChatCompletion`](super::chat::ChatCompletion); with it on, the raw
    /// [`ByteStream`] is handed back as-is and errors the backend reports
    /// mid-generation surface in the stream, not here.
    pub async fn chat(&self, input: impl Into<ChatInput>, args: ChatArgs) -> Result<ChatReply> {
        let ChatArgs {
            test_mode,
            images,
            options,
        } = args;

        let mut messages = into_messages(input.into());
        if !images.is_empty() {
            let parts = self.upload_images(&images).await?;
            append_image_parts(&mut messages, parts);
        }
        check_messages(&messages)?;

        let call = assemble(messages, test_mode, options);
        if call.stream {
            let resp = self
                .session
                .driver_call_raw(CHAT_INTERFACE, "complete", &call)
                .await?;
            Ok(ChatReply::Stream(ByteStream::from_response(resp)))
        } else {
            let completion = self
                .session
                .driver_call(CHAT_INTERFACE, "complete", &call)
                .await?;
            Ok(ChatReply::Completion(completion))
        }
    }

    /// Extract the text of an image previously uploaded to the platform,
    /// addressed by its file uid.
    pub async fn img2txt(&self, file_uid: &str) -> Result<String> {
        let result: OcrResult = self
            .session
            .driver_call(OCR_INTERFACE, "recognize", &SourceArgs { source: file_uid })
            .await?;
        Ok(result.text)
    }

    /// Generate an image from a prompt, returning its URL (or data URI).
    pub async fn txt2img(&self, prompt: &str) -> Result<String> {
        let value: serde_json::Value = self
            .session
            .driver_call(IMAGE_INTERFACE, "generate", &PromptArgs { prompt })
            .await?;
        image_url_from(value).ok_or_else(|| {
            Error::from(RequestError::DecodeJson {
                message: "The image generation response did not include an image URL.".into(),
            })
        })
    }

    /// List the available text-to-speech voices.
    pub async fn list_voices(&self) -> Result<Vec<Voice>> {
        self.session
            .driver_call(TTS_INTERFACE, "list_voices", &serde_json::json!({}))
            .await
    }

    /// Synthesize speech for `text`, streaming the audio bytes as the server
    /// renders them. `voice` picks one of [`Ai::list_voices`]; the platform
    /// default is used when `None`.
    pub async fn txt2speech(&self, text: &str, voice: Option<&str>) -> Result<ByteStream> {
        let resp = self
            .session
            .driver_call_raw(TTS_INTERFACE, "synthesize", &SynthesizeArgs { text, voice })
            .await?;
        Ok(ByteStream::from_response(resp))
    }

    /// List the chat models the platform can route to, optionally narrowed
    /// to one provider. Entries are provider-specific JSON objects.
    pub async fn list_models(&self, provider: Option<&str>) -> Result<Vec<serde_json::Value>> {
        self.session
            .driver_call(CHAT_INTERFACE, "models", &ModelsArgs { provider })
            .await
    }

    /// List the chat model providers.
    pub async fn list_model_providers(&self) -> Result<Vec<String>> {
        self.session
            .driver_call(CHAT_INTERFACE, "providers", &serde_json::json!({}))
            .await
    }

    /// Upload each local image file to the storage root and build the
    /// `file://{uid}` content parts referencing them.
    async fn upload_images(&self, paths: &[String]) -> Result<Vec<super::chat::ContentPart>> {
        let fs = FileSystem::new(self.session.clone());
        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            let name = std::path::Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::from(RequestError::Validation {
                        message: format!("Image path has no file name: {path}"),
                    })
                })?;
            let data = tokio::fs::read(path).await.map_err(|source| {
                Error::from(RequestError::Validation {
                    message: format!("Could not read image file {path}: {source}"),
                })
            })?;
            let entry = fs.upload(UploadOptions::new("/", name, data)).await?;
            tracing::debug!(uid = %entry.uid, "uploaded chat image");
            parts.push(super::chat::ContentPart::ImageUrl {
                url: format!("file://{}", entry.uid),
            });
        }
        Ok(parts)
    }
}

/// One available text-to-speech voice.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    /// Stable voice identifier, passed to [`Ai::txt2speech`].
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// BCP 47 language tag, when the backend reports one.
    #[serde(default)]
    pub language: Option<String>,
    /// Any additional fields the backend returned, verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OcrResult {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct SourceArgs<'a> {
    source: &'a str,
}

#[derive(Debug, Serialize)]
struct PromptArgs<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct SynthesizeArgs<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ModelsArgs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
}

/// Image generation responses vary by provider: a bare URL string or an
/// object carrying a `url` field.
fn image_url_from(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(url) => Some(url),
        serde_json::Value::Object(mut map) => match map.remove("url") {
            Some(serde_json::Value::String(url)) => Some(url),
            _ => None,
        },
        _ => None,
    }
}
