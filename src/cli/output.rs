//! CLI 输出格式化

use serde::Serialize;

use crate::client::PostRequest;
use crate::config::mask;

/// 格式化为缩进 JSON，序列化失败时输出错误描述
pub fn format_json<T: Serialize>(data: &T) -> String {
    match serde_json::to_string_pretty(data) {
        Ok(text) => text,
        Err(e) => format!("<failed to format output: {}>", e),
    }
}

/// dry-run 时展示的请求（token 已遮盖）
#[derive(Debug, Serialize)]
pub struct RequestPreview {
    pub url: String,
    pub headers: Vec<HeaderPreview>,
    pub body: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct HeaderPreview {
    pub name: String,
    pub value: String,
}

impl From<&PostRequest> for RequestPreview {
    fn from(request: &PostRequest) -> Self {
        let headers = request
            .headers
            .iter()
            .map(|(name, value)| HeaderPreview {
                name: name.clone(),
                value: if name.eq_ignore_ascii_case("X-Auth-Token") {
                    mask(value)
                } else {
                    value.clone()
                },
            })
            .collect();

        Self {
            url: request.url.clone(),
            headers,
            body: request.body.clone(),
        }
    }
}

impl RequestPreview {
    /// 纯文本格式
    pub fn to_text(&self) -> String {
        let mut lines = vec![format!("POST {}", self.url)];
        for header in &self.headers {
            lines.push(format!("{}: {}", header.name, header.value));
        }
        lines.push(String::new());
        lines.push(format_json(&self.body));
        lines.join("\n")
    }
}
