//! Config 命令 - 显示解析后的连接配置

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::output::format_json;
use crate::config::RocketChatConfig;

/// Config 命令参数
#[derive(Args)]
pub struct ConfigArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 config 命令
pub fn handle_config(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let config = RocketChatConfig::load(config_path)?;
    println!("{}", render_config(&config, args.json));
    Ok(())
}

/// 格式化配置，token 始终遮盖
pub fn render_config(config: &RocketChatConfig, json: bool) -> String {
    let config = config.redacted();

    if json {
        return format_json(&config);
    }

    [
        format!("base_url: {}", config.base_url),
        format!("token:    {}", display_or_unset(&config.token)),
        format!("user_id:  {}", display_or_unset(&config.user_id)),
        format!("channel:  {}", display_or_unset(&config.channel)),
        format!("emoji:    {}", display_or_unset(&config.emoji)),
    ]
    .join("\n")
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}
