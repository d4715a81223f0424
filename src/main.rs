//! RocketChat Notify CLI
//!
//! 通过 RocketChat REST API 发送通知消息

use anyhow::Result;
use clap::{Parser, Subcommand};
use rocketchat_notify::cli::{handle_config, handle_send, ConfigArgs, SendArgs};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "rocketchat-notify")]
#[command(about = "RocketChat Notify - 通过 RocketChat REST API 发送通知")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/rocketchat-notify）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 发送一条消息
    Send(SendArgs),
    /// 显示解析后的配置（token 已遮盖）
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 日志输出到 stderr，避免污染 stdout
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rocketchat_notify={level},rocketchat-notify={level}",
            level = default_level
        ))
    });

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Send(args) => handle_send(args, config_path),
        Commands::Config(args) => handle_config(args, config_path),
    }
}
