//! RocketChat 通知渠道
//!
//! 宿主的通知对象实现 `RocketChatNotification` 生成消息，
//! 接收者实现 `RocketChatNotifiable` 提供默认频道。
//! 渠道把消息交给 `RocketChatClient` 发送，所有失败统一转换为
//! `CouldNotSendNotification`。

use tracing::{debug, error};

use crate::client::RocketChatClient;
use crate::error::CouldNotSendNotification;
use crate::message::Message;

/// 可以渲染为 RocketChat 消息的通知
pub trait RocketChatNotification {
    fn to_rocket_chat(&self, notifiable: &dyn RocketChatNotifiable) -> Message;
}

/// 可以提供 RocketChat 路由信息的接收者
pub trait RocketChatNotifiable {
    /// 默认频道，`None` 表示没有路由信息
    fn route_rocket_chat(&self) -> Option<String> {
        None
    }
}

/// 临时接收者，只携带一个频道
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymousNotifiable {
    route: Option<String>,
}

impl AnonymousNotifiable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发送到指定频道
    pub fn route(channel: impl Into<String>) -> Self {
        Self {
            route: Some(channel.into()),
        }
    }
}

impl RocketChatNotifiable for AnonymousNotifiable {
    fn route_rocket_chat(&self) -> Option<String> {
        self.route.clone()
    }
}

/// 已构建好的消息可以直接作为通知发送
impl RocketChatNotification for Message {
    fn to_rocket_chat(&self, _notifiable: &dyn RocketChatNotifiable) -> Message {
        self.clone()
    }
}

/// RocketChat 通知渠道
#[derive(Debug)]
pub struct RocketChatChannel {
    client: RocketChatClient,
}

impl RocketChatChannel {
    pub fn new(client: RocketChatClient) -> Self {
        Self { client }
    }

    /// 渠道名称（用于日志）
    pub fn name(&self) -> &str {
        "rocketchat"
    }

    pub fn client(&self) -> &RocketChatClient {
        &self.client
    }

    /// 向一个接收者发送通知
    pub fn send(
        &self,
        notifiable: &dyn RocketChatNotifiable,
        notification: &dyn RocketChatNotification,
    ) -> Result<(), CouldNotSendNotification> {
        let message = self.resolve(notifiable, notification);

        self.client.send(&message).map_err(|e| {
            error!(channel = self.name(), error = %e, "Failed to send notification");
            CouldNotSendNotification::from(e)
        })
    }

    /// 生成消息并补全目标频道
    ///
    /// 频道优先级：消息自身 > 接收者路由 > 客户端默认频道。
    pub fn resolve(
        &self,
        notifiable: &dyn RocketChatNotifiable,
        notification: &dyn RocketChatNotification,
    ) -> Message {
        let message = notification.to_rocket_chat(notifiable);
        if message.has_channel() {
            return message;
        }

        let fallback = notifiable
            .route_rocket_chat()
            .filter(|route| !route.is_empty())
            .or_else(|| {
                Some(self.client.default_channel().to_string()).filter(|c| !c.is_empty())
            });

        match fallback {
            Some(channel) => {
                debug!(channel = %channel, "Using fallback RocketChat channel");
                message.to(channel)
            }
            None => message,
        }
    }
}
