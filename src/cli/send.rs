//! Send 命令 - 发送一条 RocketChat 消息
//!
//! 消息经由 `RocketChatChannel` 发送，与宿主程序走同一条路径。

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use tracing::info;

use super::output::{format_json, RequestPreview};
use crate::channel::{AnonymousNotifiable, RocketChatChannel};
use crate::client::RocketChatClient;
use crate::config::RocketChatConfig;
use crate::error::CouldNotSendNotification;
use crate::message::Message;

/// Send 命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    /// 消息正文
    pub text: String,

    /// 目标频道（如 #general 或 @user）
    #[arg(long, short)]
    pub to: Option<String>,

    /// 发送者
    #[arg(long, short)]
    pub from: Option<String>,

    /// 消息未指定频道时使用的接收者路由
    #[arg(long)]
    pub route: Option<String>,

    /// emoji 头像（如 :rocket:）
    #[arg(long)]
    pub emoji: Option<String>,

    /// 头像 URL
    #[arg(long)]
    pub avatar: Option<String>,

    /// 显示名称
    #[arg(long)]
    pub alias: Option<String>,

    /// 附件（JSON 对象，可重复）
    #[arg(long = "attachment", value_name = "JSON")]
    pub attachments: Vec<String>,

    /// 只打印请求，不发送
    #[arg(long)]
    pub dry_run: bool,

    /// dry-run 输出 JSON 格式
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

impl SendArgs {
    /// 根据参数构建消息
    pub fn build_message(&self) -> Result<Message> {
        let mut message = Message::create(self.text.as_str());

        if let Some(to) = &self.to {
            message = message.to(to.as_str());
        }
        if let Some(from) = &self.from {
            message = message.from(from.as_str());
        }
        if let Some(emoji) = &self.emoji {
            message = message.icon(emoji.as_str());
        }
        if let Some(avatar) = &self.avatar {
            message = message.avatar(avatar.as_str());
        }
        if let Some(alias) = &self.alias {
            message = message.alias(alias.as_str());
        }

        for raw in &self.attachments {
            let attachment: serde_json::Value = serde_json::from_str(raw)
                .with_context(|| format!("Invalid attachment JSON: {}", raw))?;
            message = message.attach(attachment);
        }

        Ok(message)
    }

    fn notifiable(&self) -> AnonymousNotifiable {
        match &self.route {
            Some(route) => AnonymousNotifiable::route(route.as_str()),
            None => AnonymousNotifiable::new(),
        }
    }
}

/// 解析并校验将要发送的请求，不发起网络调用
pub fn preview_send(
    channel: &RocketChatChannel,
    notifiable: &AnonymousNotifiable,
    message: &Message,
) -> Result<RequestPreview, CouldNotSendNotification> {
    let resolved = channel.resolve(notifiable, message);
    let request = channel.client().prepare(&resolved)?;
    Ok(RequestPreview::from(&request))
}

/// 处理 send 命令
pub fn handle_send(args: SendArgs, config_path: Option<&Path>) -> Result<()> {
    let config = RocketChatConfig::load(config_path)?;
    let channel = RocketChatChannel::new(RocketChatClient::from_config(&config));

    let message = args.build_message()?;
    let notifiable = args.notifiable();

    if args.dry_run {
        let preview = preview_send(&channel, &notifiable, &message)?;

        if args.json {
            println!("{}", format_json(&preview));
        } else {
            println!("[DRY-RUN] Would send:\n{}", preview.to_text());
        }
        return Ok(());
    }

    channel.send(&notifiable, &message)?;
    info!(channel = channel.name(), "Notification delivered");
    Ok(())
}
