//! 错误类型
//!
//! `SendError` 由客户端产生，精确描述失败原因；
//! `CouldNotSendNotification` 是渠道适配器对外暴露的唯一错误类型。

use thiserror::Error;

/// 客户端发送失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// 消息没有目标频道
    #[error("RocketChat message has no destination channel")]
    MissingChannel,

    /// 消息没有发送者
    #[error("RocketChat message has no sender (from)")]
    MissingFrom,

    /// HTTP 请求本身失败（网络、DNS、非 2xx 状态码）
    #[error("RocketChat responded with an error: {0}")]
    TransportFailure(String),
}

/// 渠道适配器发送失败
///
/// 所有 `SendError` 统一包装为此类型，原始原因通过 `cause()` 或
/// `std::error::Error::source` 获取。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not send RocketChat notification: {reason}")]
pub struct CouldNotSendNotification {
    reason: String,
    #[source]
    source: SendError,
}

impl CouldNotSendNotification {
    /// 失败原因（原始错误的描述）
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// 原始错误
    pub fn cause(&self) -> &SendError {
        &self.source
    }
}

impl From<SendError> for CouldNotSendNotification {
    fn from(source: SendError) -> Self {
        Self {
            reason: source.to_string(),
            source,
        }
    }
}
