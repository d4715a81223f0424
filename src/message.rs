//! RocketChat 消息
//!
//! 链式构建，构建阶段不做任何校验，校验推迟到发送时。

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// 一条 RocketChat 消息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    text: String,
    attachments: Vec<Value>,
    channel: String,
    from: String,
    icon_emoji: Option<String>,
    avatar: Option<String>,
    alias: Option<String>,
}

impl Message {
    /// 创建消息（无附件、无路由信息）
    pub fn create(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// 设置目标频道
    pub fn to(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// 设置发送者
    pub fn from(mut self, identity: impl Into<String>) -> Self {
        self.from = identity.into();
        self
    }

    /// 替换消息正文
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// 追加一个附件
    pub fn attach(mut self, attachment: impl Into<Value>) -> Self {
        self.attachments.push(attachment.into());
        self
    }

    /// 按顺序追加多个附件
    pub fn attachments<I, A>(mut self, attachments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Value>,
    {
        self.attachments
            .extend(attachments.into_iter().map(Into::into));
        self
    }

    /// 设置 emoji 头像（如 `:rocket:`）
    pub fn icon(mut self, emoji: impl Into<String>) -> Self {
        self.icon_emoji = Some(emoji.into());
        self
    }

    /// 设置头像 URL
    pub fn avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar = Some(url.into());
        self
    }

    /// 设置显示名称
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 目标频道，空字符串表示未设置
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// 发送者，空字符串表示未设置
    pub fn sender(&self) -> &str {
        &self.from
    }

    pub fn attachment_list(&self) -> &[Value] {
        &self.attachments
    }

    pub fn icon_emoji(&self) -> Option<&str> {
        self.icon_emoji.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// 目标频道是否已设置
    pub fn has_channel(&self) -> bool {
        !self.channel.is_empty()
    }
}

/// 附件字段（表格中的一格）
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentField {
    /// 是否与相邻字段并排显示
    pub short: bool,
    pub title: String,
    pub value: String,
}

impl AttachmentField {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            short: false,
            title: title.into(),
            value: value.into(),
        }
    }

    pub fn short(mut self, short: bool) -> Self {
        self.short = short;
        self
    }
}

/// 结构化附件
///
/// 转换为 JSON 后追加到消息，未设置的字段不会出现在请求体里。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachment {
    pub title: Option<String>,
    pub title_link: Option<String>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub thumb_url: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub author_name: Option<String>,
    pub author_link: Option<String>,
    pub author_icon: Option<String>,
    pub message_link: Option<String>,
    pub collapsed: Option<bool>,
    pub timestamp: Option<DateTime<Utc>>,
    pub fields: Vec<AttachmentField>,
}

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title_link(mut self, link: impl Into<String>) -> Self {
        self.title_link = Some(link.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// 左侧色条（如 `#ff0000`）
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn thumb_url(mut self, url: impl Into<String>) -> Self {
        self.thumb_url = Some(url.into());
        self
    }

    pub fn audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    pub fn video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    pub fn author_link(mut self, link: impl Into<String>) -> Self {
        self.author_link = Some(link.into());
        self
    }

    pub fn author_icon(mut self, url: impl Into<String>) -> Self {
        self.author_icon = Some(url.into());
        self
    }

    pub fn message_link(mut self, link: impl Into<String>) -> Self {
        self.message_link = Some(link.into());
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn field(mut self, field: AttachmentField) -> Self {
        self.fields.push(field);
        self
    }
}

impl From<AttachmentField> for Value {
    fn from(field: AttachmentField) -> Self {
        let mut map = Map::new();
        map.insert("short".to_string(), Value::Bool(field.short));
        map.insert("title".to_string(), Value::String(field.title));
        map.insert("value".to_string(), Value::String(field.value));
        Value::Object(map)
    }
}

impl From<Attachment> for Value {
    fn from(attachment: Attachment) -> Self {
        let mut map = Map::new();
        let strings = [
            ("title", attachment.title),
            ("title_link", attachment.title_link),
            ("text", attachment.text),
            ("color", attachment.color),
            ("image_url", attachment.image_url),
            ("thumb_url", attachment.thumb_url),
            ("audio_url", attachment.audio_url),
            ("video_url", attachment.video_url),
            ("author_name", attachment.author_name),
            ("author_link", attachment.author_link),
            ("author_icon", attachment.author_icon),
            ("message_link", attachment.message_link),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value));
            }
        }

        if let Some(collapsed) = attachment.collapsed {
            map.insert("collapsed".to_string(), Value::Bool(collapsed));
        }
        if let Some(ts) = attachment.timestamp {
            map.insert(
                "ts".to_string(),
                Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        if !attachment.fields.is_empty() {
            let fields = attachment.fields.into_iter().map(Value::from).collect();
            map.insert("fields".to_string(), Value::Array(fields));
        }

        Value::Object(map)
    }
}
