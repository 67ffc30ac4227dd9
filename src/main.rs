//! spsync - SharePoint Folder Sync
//!
//! ローカルフォルダの新しいファイルをSharePointのドキュメントライブラリへコピー

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use clap::Parser;
use std::io::BufRead;

use spsync::driver::{self, Args};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = driver::run(&args).await {
        println!("✗ {:#}", e);

        if args.pause_on_exit {
            println!("Press Enter to exit...");
            let _ = std::io::stdin().lock().lines().next();
        }
        std::process::exit(1);
    }
}
