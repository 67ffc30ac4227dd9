//! # Driver Layer (Presentation)
//!
//! CLIやその他の外部インターフェースを提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出してビジネスフローを起動
//! - 依存性注入（DI）を行い、全てを組み立てる
//! - ユーザーとのインターフェース
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **commands**: 補助コマンド（暗号化・鍵生成）
//! - **workflow**: ワークフロー全体のオーケストレーション

pub mod cli;
pub mod commands;
pub mod workflow;

pub use cli::{Args, Command};
pub use workflow::SyncWorkflow;

use anyhow::Result;

use crate::adapter::config::{resolve_config_path, Config};

/// Run the command selected on the command line
pub async fn run(args: &Args) -> Result<()> {
    match &args.command {
        Some(Command::EncryptSecret { value }) => {
            let token = commands::encrypt_secret(args.secret_key.as_deref(), value)?;
            println!("{}", token);
            Ok(())
        }
        Some(Command::GenerateKey) => {
            println!("{}", commands::generate_key());
            Ok(())
        }
        None => {
            let config_path = resolve_config_path(&args.config);
            let config = Config::load(&config_path, args.secret_key.as_deref())?;
            SyncWorkflow::new(config).execute(args).await.map(|_| ())
        }
    }
}
