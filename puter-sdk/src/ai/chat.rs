//! Chat message model and the request normalizer behind [`Ai::chat`].
//!
//! The entry point accepts two input shapes (a bare prompt or a full message
//! history) plus an explicit argument struct, and reduces them to exactly one
//! well-formed `puter-chat-completion` request. Image attachments are the one
//! side effect: each local file is uploaded first and referenced from the
//! message sequence as a `file://{uid}` content part.
//!
//! [`Ai::chat`]: crate::Ai::chat

use serde::{Deserialize, Serialize};

use super::stream::ByteStream;
use crate::errors::{Error, RequestError, Result};

/// Caller input to [`Ai::chat`](crate::Ai::chat): a bare prompt or a full
/// message history.
#[derive(Debug, Clone)]
pub enum ChatInput {
    /// A single user turn; becomes `[{role: user, content: prompt}]`.
    Prompt(String),
    /// A full conversation, sent as given (after image attachment).
    Messages(Vec<ChatMessage>),
}

impl From<&str> for ChatInput {
    fn from(prompt: &str) -> ChatInput {
        ChatInput::Prompt(prompt.to_string())
    }
}

impl From<String> for ChatInput {
    fn from(prompt: String) -> ChatInput {
        ChatInput::Prompt(prompt)
    }
}

impl From<Vec<ChatMessage>> for ChatInput {
    fn from(messages: Vec<ChatMessage>) -> ChatInput {
        ChatInput::Messages(messages)
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// The end user.
    User,
    /// The model.
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored this turn.
    pub role: Role,
    /// The turn's body.
    pub content: MessageContent,
}

impl ChatMessage {
    /// A `system` message with plain-text content.
    pub fn system(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    /// A `user` message with plain-text content.
    pub fn user(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// An `assistant` message with plain-text content.
    pub fn assistant(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }
}

/// Body of a message: a bare string, or an ordered list of typed parts once
/// non-text content (images) is involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text.
    Text(String),
    /// Mixed text and image parts.
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// The textual content, concatenating the text parts of a mixed body.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect(),
        }
    }
}

/// One entry of a mixed message body, serialized as a `{"type": ...}` tagged
/// object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text fragment.
    Text {
        /// The fragment.
        text: String,
    },
    /// An image reference, typically `file://{uid}` for an uploaded file.
    ImageUrl {
        /// Location of the image.
        url: String,
    },
}

/// Optional arguments to [`Ai::chat`](crate::Ai::chat).
///
/// This is the explicit form of the platform's historically overloaded chat
/// signature: a legacy test-mode flag, image attachments (local file paths,
/// uploaded before the call), and a model-tuning options bag.
///
/// # Example
/// ```
/// use puter::{ChatArgs, ChatOptions};
///
/// let args = ChatArgs::new()
///     .image("/home/alice/photo.png")
///     .options(ChatOptions::new().model("gpt-5-nano").temperature(0.5));
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ChatArgs {
    pub(crate) test_mode: bool,
    pub(crate) images: Vec<String>,
    pub(crate) options: ChatOptions,
}

impl ChatArgs {
    /// No test mode, no images, default options.
    pub fn new() -> ChatArgs {
        ChatArgs::default()
    }

    /// Set the legacy debug flag. Forced off whenever streaming is selected.
    pub const fn test_mode(mut self, yes: bool) -> Self {
        self.test_mode = yes;
        self
    }

    /// Attach a local image file; it is uploaded before the chat call and
    /// referenced from the last user message.
    pub fn image(mut self, path: impl Into<String>) -> Self {
        self.images.push(path.into());
        self
    }

    /// Attach several local image files.
    pub fn images<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Merge an options bag into the arguments. Applying several bags keeps
    /// the later bag's values for keys both set.
    pub fn options(mut self, options: ChatOptions) -> Self {
        self.options = self.options.merge(options);
        self
    }
}

/// Model-tuning options for a chat call. Unset fields are omitted from the
/// request so the backend's defaults apply.
#[derive(Debug, Clone, Default, Serialize)]
#[must_use]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_tokens: Option<u64>,
    // Sent at the top level of the payload, never spread with the options.
    #[serde(skip)]
    pub(crate) stream: bool,
    #[serde(flatten)]
    pub(crate) extra: serde_json::Map<String, serde_json::Value>,
}

impl ChatOptions {
    /// All defaults: backend-chosen model, buffered response.
    pub fn new() -> ChatOptions {
        ChatOptions::default()
    }

    /// Target model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sampling temperature.
    pub const fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap on generated tokens.
    pub const fn max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Ask for a live response stream instead of a buffered completion.
    pub const fn stream(mut self, yes: bool) -> Self {
        self.stream = yes;
        self
    }

    /// Pass an arbitrary field through to the backend verbatim.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Merge `later` over `self`: fields set in `later` win, the stream flag
    /// sticks once either bag set it, extras override key by key.
    pub fn merge(mut self, later: ChatOptions) -> ChatOptions {
        ChatOptions {
            model: later.model.or(self.model),
            temperature: later.temperature.or(self.temperature),
            max_tokens: later.max_tokens.or(self.max_tokens),
            stream: self.stream || later.stream,
            extra: {
                self.extra.extend(later.extra);
                self.extra
            },
        }
    }
}

/// What [`Ai::chat`](crate::Ai::chat) hands back: a buffered completion, or
/// the live byte stream when streaming was requested.
#[derive(Debug)]
pub enum ChatReply {
    /// The buffered completion (the default mode).
    Completion(ChatCompletion),
    /// The raw response stream (`stream: true`).
    Stream(ByteStream),
}

impl ChatReply {
    /// The buffered completion, if this was a non-streaming call.
    pub fn into_completion(self) -> Option<ChatCompletion> {
        match self {
            ChatReply::Completion(completion) => Some(completion),
            ChatReply::Stream(_) => None,
        }
    }

    /// The live stream, if this was a streaming call.
    pub fn into_stream(self) -> Option<ByteStream> {
        match self {
            ChatReply::Completion(_) => None,
            ChatReply::Stream(stream) => Some(stream),
        }
    }
}

/// A buffered chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    /// The assistant's reply.
    #[serde(default)]
    pub message: Option<ChatMessage>,
    /// Provider-specific passthrough fields (usage, finish reason, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChatCompletion {
    /// The reply's text, flattening a mixed body; empty when the backend sent
    /// no message.
    pub fn text(&self) -> String {
        self.message
            .as_ref()
            .map(|message| message.content.text())
            .unwrap_or_default()
    }
}

/// Wire shape of the `args` object of a `puter-chat-completion.complete`
/// call: the messages, the always-present `test_mode` flag, `stream` only
/// when true, and the remaining options spread after them.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCallArgs {
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) test_mode: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub(crate) stream: bool,
    #[serde(flatten)]
    pub(crate) options: ChatOptions,
}

fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn into_messages(input: ChatInput) -> Vec<ChatMessage> {
    match input {
        ChatInput::Prompt(prompt) => vec![ChatMessage::user(prompt)],
        ChatInput::Messages(messages) => messages,
    }
}

/// Append uploaded image parts to the last `user` message, upgrading its
/// content to parts form. When the sequence holds no user message, a new one
/// carrying only the image parts is appended instead.
pub(crate) fn append_image_parts(messages: &mut Vec<ChatMessage>, parts: Vec<ContentPart>) {
    if parts.is_empty() {
        return;
    }
    if let Some(message) = messages.iter_mut().rev().find(|m| m.role == Role::User) {
        let placeholder = MessageContent::Parts(Vec::new());
        let mut content = match std::mem::replace(&mut message.content, placeholder) {
            MessageContent::Text(text) => vec![ContentPart::Text { text }],
            MessageContent::Parts(existing) => existing,
        };
        content.extend(parts);
        message.content = MessageContent::Parts(content);
    } else {
        messages.push(ChatMessage {
            role: Role::User,
            content: MessageContent::Parts(parts),
        });
    }
}

/// Local validation, run after image handling and before any dispatch.
pub(crate) fn check_messages(messages: &[ChatMessage]) -> Result<()> {
    if messages.is_empty() {
        return Err(Error::from(RequestError::Validation {
            message: "At least one message is required.".into(),
        }));
    }
    for message in messages {
        if matches!(&message.content, MessageContent::Parts(parts) if parts.is_empty()) {
            return Err(Error::from(RequestError::Validation {
                message: "Invalid message format".into(),
            }));
        }
    }
    Ok(())
}

/// Assemble the final call arguments. A `stream` key smuggled through the
/// extras bag is consumed here rather than spread; test mode is forced off
/// whenever streaming is selected.
pub(crate) fn assemble(
    messages: Vec<ChatMessage>,
    test_mode: bool,
    mut options: ChatOptions,
) -> ChatCallArgs {
    if let Some(value) = options.extra.remove("stream") {
        options.stream = options.stream || value.as_bool().unwrap_or(false);
    }
    let stream = options.stream;
    ChatCallArgs {
        messages,
        test_mode: test_mode && !stream,
        stream,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_input_becomes_a_single_user_message() {
        let args = assemble(
            into_messages(ChatInput::from("Tell me a joke")),
            false,
            ChatOptions::new(),
        );
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(
            value["messages"],
            serde_json::json!([{ "role": "user", "content": "Tell me a joke" }])
        );
        assert_eq!(value["test_mode"], false);
        assert!(value.get("stream").is_none());
    }

    #[test]
    fn streaming_forces_test_mode_off() {
        let args = assemble(
            into_messages(ChatInput::from("hi")),
            true,
            ChatOptions::new().stream(true).temperature(0.5),
        );
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["stream"], true);
        assert_eq!(value["test_mode"], false);
        assert_eq!(value["temperature"], 0.5);
    }

    #[test]
    fn test_mode_survives_non_streaming_calls() {
        let args = assemble(into_messages(ChatInput::from("hi")), true, ChatOptions::new());
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["test_mode"], true);
    }

    #[test]
    fn unset_options_are_omitted_from_the_payload() {
        let args = assemble(
            into_messages(ChatInput::from("hi")),
            false,
            ChatOptions::new().model("gpt-5-nano"),
        );
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["model"], "gpt-5-nano");
        assert!(value.get("temperature").is_none());
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn later_options_override_earlier_ones() {
        let merged = ChatOptions::new()
            .model("gpt-5-nano")
            .temperature(0.1)
            .extra("seed", serde_json::json!(1))
            .merge(ChatOptions::new().model("claude").extra("seed", serde_json::json!(2)));
        assert_eq!(merged.model.as_deref(), Some("claude"));
        assert_eq!(merged.temperature, Some(0.1));
        assert_eq!(merged.extra.get("seed"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn stream_key_in_extras_is_consumed_not_spread() {
        let args = assemble(
            into_messages(ChatInput::from("hi")),
            true,
            ChatOptions::new().extra("stream", serde_json::json!(true)),
        );
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["stream"], true);
        assert_eq!(value["test_mode"], false);
        // Exactly one stream key: the top-level one, not a spread duplicate.
        assert_eq!(
            serde_json::to_string(&args).unwrap().matches("\"stream\"").count(),
            1
        );
    }

    #[test]
    fn image_parts_land_on_the_last_user_message() {
        let mut messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("first"),
            ChatMessage::user("what is in this picture?"),
            ChatMessage::assistant("let me look"),
        ];
        append_image_parts(
            &mut messages,
            vec![ContentPart::ImageUrl {
                url: "file://uid-1".into(),
            }],
        );

        assert_eq!(messages.len(), 4);
        let value = serde_json::to_value(&messages[2]).unwrap();
        assert_eq!(
            value["content"],
            serde_json::json!([
                { "type": "text", "text": "what is in this picture?" },
                { "type": "image_url", "url": "file://uid-1" }
            ])
        );
        // The earlier user message is untouched.
        let first = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(first["content"], "first");
    }

    #[test]
    fn a_user_message_is_synthesized_when_none_exists() {
        let mut messages = vec![ChatMessage::system("be brief")];
        append_image_parts(
            &mut messages,
            vec![ContentPart::ImageUrl {
                url: "file://uid-2".into(),
            }],
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        let value = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(
            value["content"],
            serde_json::json!([{ "type": "image_url", "url": "file://uid-2" }])
        );
    }

    #[test]
    fn empty_message_sequences_are_rejected() {
        let err = check_messages(&[]).unwrap_err();
        assert!(err.to_string().contains("At least one message is required."));
    }

    #[test]
    fn empty_part_lists_are_rejected() {
        let messages = vec![ChatMessage {
            role: Role::User,
            content: MessageContent::Parts(Vec::new()),
        }];
        let err = check_messages(&messages).unwrap_err();
        assert!(err.to_string().contains("Invalid message format"));
    }

    #[test]
    fn completion_text_flattens_mixed_bodies() {
        let completion: ChatCompletion = serde_json::from_value(serde_json::json!({
            "message": {
                "role": "assistant",
                "content": [
                    { "type": "text", "text": "Here " },
                    { "type": "image_url", "url": "file://x" },
                    { "type": "text", "text": "you go." }
                ]
            },
            "finish_reason": "stop"
        }))
        .unwrap();
        assert_eq!(completion.text(), "Here you go.");
        assert_eq!(completion.extra.get("finish_reason"), Some(&serde_json::json!("stop")));
    }
}
