mod client;
mod types;

pub use client::{ChatbotClient, HttpChatbotClient};
pub use types::*;
