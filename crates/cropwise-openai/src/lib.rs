//! Backend for any server speaking the OpenAI *chat/completions* dialect
//! (OpenAI itself, Groq, local inference servers, ...).
mod adapter;
mod model_map;
mod provider_impl_chat;

pub use adapter::{API_KEY_ENV, BASE_URL_ENV, OpenAiAdapter, OpenAiAdapterBuilder};
pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenAiClient};
pub use model_map::{GPT4_O, GPT4_O_MINI, LLAMA3_1_8B_INSTANT, LLAMA3_3_70B_VERSATILE};
pub mod api_v1;
mod client;
pub mod error;
