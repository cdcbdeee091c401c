//! AI inference: chat completions (buffered or streaming), OCR, image
//! generation and text-to-speech, all dispatched through the generic driver
//! endpoint.

pub mod chat;
pub mod core;
pub mod stream;
