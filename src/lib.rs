//! RocketChat Notify - 通过 RocketChat REST API 发送通知消息

pub mod channel;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod message;

pub use channel::{AnonymousNotifiable, RocketChatChannel, RocketChatNotifiable, RocketChatNotification};
pub use client::{HttpTransport, PostRequest, RocketChatClient, POST_MESSAGE_PATH};
pub use config::RocketChatConfig;
pub use error::{CouldNotSendNotification, SendError};
pub use message::{Attachment, AttachmentField, Message};
