//! RocketChat REST 客户端
//!
//! 通过 `POST {base_url}/api/v1/chat.postMessage` 发送消息。
//! 每次发送只发起一次请求，不重试，不解析响应体。

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::RocketChatConfig;
use crate::error::SendError;
use crate::message::Message;

/// 发送消息的 API 路径
pub const POST_MESSAGE_PATH: &str = "/api/v1/chat.postMessage";

/// 一次待发送的 HTTP POST
#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub url: String,
    /// 按发送顺序排列的请求头
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl PostRequest {
    /// 按名称查找请求头（大小写不敏感）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP 传输层
///
/// 返回 `Err` 表示请求失败（连接失败、超时、非 2xx 状态码等）。
pub trait HttpTransport: Send + Sync {
    fn post(&self, request: &PostRequest) -> Result<(), String>;
}

impl HttpTransport for reqwest::blocking::Client {
    fn post(&self, request: &PostRequest) -> Result<(), String> {
        let mut builder = reqwest::blocking::Client::post(self, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .json(&request.body)
            .send()
            .and_then(|response| response.error_for_status())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// RocketChat 客户端
///
/// 连接参数在构造时固定，任何字段都可以为空，
/// 只有发送时才会因为缺少必需字段而失败。
pub struct RocketChatClient {
    transport: Box<dyn HttpTransport>,
    base_url: String,
    token: String,
    user_id: String,
    default_channel: String,
    default_emoji: String,
}

impl RocketChatClient {
    /// 创建客户端
    pub fn new(
        transport: impl HttpTransport + 'static,
        base_url: impl Into<String>,
        token: impl Into<String>,
        user_id: impl Into<String>,
        default_channel: impl Into<String>,
        default_emoji: impl Into<String>,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            base_url: base_url.into(),
            token: token.into(),
            user_id: user_id.into(),
            default_channel: default_channel.into(),
            default_emoji: default_emoji.into(),
        }
    }

    /// 基于 reqwest 默认配置创建客户端
    pub fn from_config(config: &RocketChatConfig) -> Self {
        Self::new(
            reqwest::blocking::Client::new(),
            config.base_url.clone(),
            config.token.clone(),
            config.user_id.clone(),
            config.channel.clone(),
            config.emoji.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn default_channel(&self) -> &str {
        &self.default_channel
    }

    pub fn default_emoji(&self) -> &str {
        &self.default_emoji
    }

    /// 完整的发送消息 URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), POST_MESSAGE_PATH)
    }

    /// 校验消息并构造请求，不发起网络调用
    pub fn prepare(&self, message: &Message) -> Result<PostRequest, SendError> {
        if message.channel().is_empty() {
            return Err(SendError::MissingChannel);
        }
        if message.sender().is_empty() {
            return Err(SendError::MissingFrom);
        }

        let headers = vec![
            ("X-Auth-Token".to_string(), self.token.clone()),
            ("X-User-Id".to_string(), self.user_id.clone()),
            ("Rocket-Channel-Id".to_string(), message.channel().to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        Ok(PostRequest {
            url: self.endpoint(),
            headers,
            body: self.build_body(message),
        })
    }

    /// 发送消息
    pub fn send(&self, message: &Message) -> Result<(), SendError> {
        let request = self.prepare(message)?;

        debug!(
            channel = %message.channel(),
            endpoint = %request.url,
            attachments = message.attachment_list().len(),
            "Posting message to RocketChat"
        );

        match self.transport.post(&request) {
            Ok(()) => {
                info!(channel = %message.channel(), "RocketChat message sent");
                Ok(())
            }
            Err(e) => {
                warn!(channel = %message.channel(), error = %e, "RocketChat request failed");
                Err(SendError::TransportFailure(e))
            }
        }
    }

    fn build_body(&self, message: &Message) -> Value {
        let mut body = Map::new();
        body.insert("text".to_string(), Value::from(message.text()));
        body.insert("channel".to_string(), Value::from(message.channel()));

        if let Some(alias) = message.alias_name() {
            body.insert("alias".to_string(), Value::from(alias));
        }

        // 消息没有设置 emoji 时使用客户端默认值
        let emoji = message
            .icon_emoji()
            .or_else(|| Some(self.default_emoji.as_str()).filter(|e| !e.is_empty()));
        if let Some(emoji) = emoji {
            body.insert("icon_emoji".to_string(), Value::from(emoji));
        }

        if let Some(avatar) = message.avatar_url() {
            body.insert("avatar".to_string(), Value::from(avatar));
        }

        if !message.attachment_list().is_empty() {
            body.insert(
                "attachments".to_string(),
                Value::Array(message.attachment_list().to_vec()),
            );
        }

        Value::Object(body)
    }
}

impl std::fmt::Debug for RocketChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocketChatClient")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("default_channel", &self.default_channel)
            .field("default_emoji", &self.default_emoji)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// 测试用的 mock 传输层
    #[derive(Clone, Default)]
    struct MockTransport {
        requests: Arc<Mutex<Vec<PostRequest>>>,
        calls: Arc<AtomicUsize>,
        fail_with: Option<String>,
    }

    impl MockTransport {
        fn failing(error: &str) -> Self {
            Self {
                fail_with: Some(error.to_string()),
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> Option<PostRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl HttpTransport for MockTransport {
        fn post(&self, request: &PostRequest) -> Result<(), String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    fn client(transport: MockTransport, emoji: &str) -> RocketChatClient {
        RocketChatClient::new(
            transport,
            "http://localhost:3000",
            ":token",
            ":user_id",
            ":channel",
            emoji,
        )
    }

    #[test]
    fn test_send_posts_once_with_headers_and_body() {
        let transport = MockTransport::default();
        let client = client(transport.clone(), "");

        let message = Message::create("hello").from(":token").to(":channel");
        client.send(&message).unwrap();

        assert_eq!(transport.call_count(), 1);
        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:3000/api/v1/chat.postMessage");
        assert_eq!(request.header("X-Auth-Token"), Some(":token"));
        assert_eq!(request.header("X-User-Id"), Some(":user_id"));
        assert_eq!(request.header("Rocket-Channel-Id"), Some(":channel"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, json!({"text": "hello", "channel": ":channel"}));
    }

    #[test]
    fn test_missing_channel_makes_no_call() {
        let transport = MockTransport::default();
        let client = client(transport.clone(), "");

        let result = client.send(&Message::create("hello").from(":token"));

        assert_eq!(result, Err(SendError::MissingChannel));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_missing_from_makes_no_call() {
        let transport = MockTransport::default();
        let client = client(transport.clone(), "");

        let result = client.send(&Message::create("hello").to(":channel"));

        assert_eq!(result, Err(SendError::MissingFrom));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_channel_checked_before_from() {
        let transport = MockTransport::default();
        let client = client(transport.clone(), "");

        let result = client.send(&Message::create("hello"));
        assert_eq!(result, Err(SendError::MissingChannel));
    }

    #[test]
    fn test_transport_error_becomes_transport_failure() {
        let transport = MockTransport::failing("connection refused");
        let client = client(transport.clone(), "");

        let result = client.send(&Message::create("hello").from(":token").to(":channel"));

        assert_eq!(
            result,
            Err(SendError::TransportFailure("connection refused".to_string()))
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_optional_fields_in_body() {
        let transport = MockTransport::default();
        let client = client(transport.clone(), "");

        let message = Message::create("deploy done")
            .from("bot")
            .to("#ops")
            .alias("CI")
            .icon(":rocket:")
            .avatar("https://example.com/ci.png")
            .attach(json!({"title": "build #42"}));
        client.send(&message).unwrap();

        let body = transport.last_request().unwrap().body;
        assert_eq!(
            body,
            json!({
                "text": "deploy done",
                "channel": "#ops",
                "alias": "CI",
                "icon_emoji": ":rocket:",
                "avatar": "https://example.com/ci.png",
                "attachments": [{"title": "build #42"}],
            })
        );
    }

    #[test]
    fn test_default_emoji_applied_when_message_has_none() {
        let transport = MockTransport::default();
        let client = client(transport.clone(), ":bell:");

        client
            .send(&Message::create("hi").from("bot").to("#ops"))
            .unwrap();
        assert_eq!(transport.last_request().unwrap().body["icon_emoji"], ":bell:");

        client
            .send(&Message::create("hi").from("bot").to("#ops").icon(":fire:"))
            .unwrap();
        assert_eq!(transport.last_request().unwrap().body["icon_emoji"], ":fire:");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = RocketChatClient::new(
            MockTransport::default(),
            "https://chat.example.com/",
            "",
            "",
            "",
            "",
        );
        assert_eq!(
            client.endpoint(),
            "https://chat.example.com/api/v1/chat.postMessage"
        );
    }

    #[test]
    fn test_empty_config_is_not_fatal_at_construction() {
        let client = RocketChatClient::new(MockTransport::default(), "", "", "", "", "");
        assert_eq!(client.token(), "");
        assert_eq!(client.default_channel(), "");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client(MockTransport::default(), "");
        let debug = format!("{:?}", client);
        assert!(!debug.contains(":token"));
        assert!(debug.contains(":user_id"));
    }
}
