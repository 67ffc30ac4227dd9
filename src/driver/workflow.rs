//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション

use anyhow::{Context, Result};
use log::info;

use std::sync::Arc;

use crate::adapter::auth::{ClientCredentials, TokenProvider};
use crate::adapter::config::Config;
use crate::adapter::graph::client::{build_http_client, GraphClient};
use crate::adapter::graph::error::GraphError;
use crate::adapter::graph::retry::RetryPolicy;
use crate::adapter::repositories::file_source_repository::FileSourceRepository;
use crate::adapter::repositories::graph_drive_repository::{DriveConnectError, GraphDriveRepository};
use crate::adapter::repositories::json_report_repository::JsonReportRepository;
use crate::application::dto::sync_config::SyncConfig;
use crate::application::error::SyncError;
use crate::application::use_cases::discover_files::DiscoverFilesUseCase;
use crate::application::use_cases::sync_files::SyncFilesUseCase;
use crate::domain::entities::sync_report::{FileOutcome, SyncReport};
use crate::domain::repositories::report_repository::ReportRepository;
use crate::domain::services::file_selection::SelectionRules;

use super::cli::Args;

/// Hostname recorded in the report
pub fn current_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Console line for one file
pub fn outcome_line(name: &str, outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Copied => format!("✓ Copied: {}", name),
        FileOutcome::WouldCopy => format!("  Would copy: {}", name),
        FileOutcome::SkippedExisting => format!("  Already exists: {}", name),
        FileOutcome::SkippedNotFile => format!("  Not a regular file: {}", name),
        FileOutcome::Failed(reason) => format!("✗ {}: {}", name, reason),
    }
}

/// Folder to SharePoint sync workflow
pub struct SyncWorkflow {
    config: Config,
    source_repository: Arc<FileSourceRepository>,
    discover_use_case: DiscoverFilesUseCase<FileSourceRepository>,
    report_repository: JsonReportRepository,
}

impl SyncWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        let source_repo = Arc::new(FileSourceRepository::new());
        let discover_use_case = DiscoverFilesUseCase::new(source_repo.clone());

        Self {
            config,
            source_repository: source_repo,
            discover_use_case,
            report_repository: JsonReportRepository::new(),
        }
    }

    fn sync_config(&self, dry_run: bool) -> SyncConfig {
        SyncConfig::new(
            self.config.source_folder.clone(),
            self.config.sharepoint.library.clone(),
            SelectionRules::new(&self.config.sync.extensions, &self.config.sync.name_patterns),
            self.config.sync.upload_delay_ms,
            dry_run,
        )
    }

    /// Execute the sync workflow
    pub async fn execute(&self, args: &Args) -> Result<SyncReport> {
        info!("Starting SharePoint sync...");
        info!("Dry run: {}", args.dry_run);

        self.config.validate()?;
        let sync_config = self.sync_config(args.dry_run);
        let sharepoint = &self.config.sharepoint;

        println!("✓ Using configuration:");
        println!("  Source folder: {}", sync_config.source_folder_display());
        println!("  Site: {}", sharepoint.url);
        match &sharepoint.folder {
            Some(folder) => println!("  Library: {} / {}", sharepoint.library, folder),
            None => println!("  Library: {}", sharepoint.library),
        }

        // Discover eligible files before touching the network
        let files = self
            .discover_use_case
            .execute(&sync_config.source_folder, &sync_config.rules)
            .await?;
        if files.is_empty() {
            return Err(SyncError::NoEligibleFiles {
                folder: sync_config.source_folder_display(),
            }
            .into());
        }
        println!("✓ Found {} eligible files", files.len());

        // Graph client with client-credentials auth
        let http = build_http_client(self.config.sync.timeout_secs)?;
        let credentials = ClientCredentials::new(
            http.clone(),
            sharepoint.authority_url.as_str(),
            sharepoint.tenant_id.as_str(),
            sharepoint.client_id.as_str(),
            sharepoint.client_secret.as_str(),
            sharepoint.scope.as_str(),
        );
        let client = Arc::new(
            GraphClient::new(http, sharepoint.graph_url.as_str(), TokenProvider::new(credentials))
                .with_retry_policy(RetryPolicy::new(self.config.sync.max_retries)),
        );

        client
            .authenticate()
            .await
            .map_err(|e| match e {
                GraphError::Authentication(reason) => SyncError::Authentication(reason),
                other => SyncError::Authentication(other.to_string()),
            })?;
        println!("✓ Access token acquired");

        let site = sharepoint.site_address()?;
        let remote = match GraphDriveRepository::connect(
            client,
            &site,
            &sharepoint.library,
            sharepoint.folder.clone(),
        )
        .await
        {
            Ok(remote) => remote,
            Err(DriveConnectError::LibraryNotFound { name, available }) => {
                println!("✗ Library '{}' not found. Available libraries:", name);
                for drive in &available {
                    println!("  - {}", drive.name);
                }
                return Err(SyncError::LibraryNotFound {
                    name,
                    available: available.into_iter().map(|d| d.name).collect(),
                }
                .into());
            }
            Err(e) => return Err(e).context("Failed to connect to SharePoint"),
        };
        println!("✓ Connected to library '{}'", sharepoint.library);

        let run_id = uuid::Uuid::new_v4().to_string();
        let sync_use_case = SyncFilesUseCase::new(self.source_repository.clone(), Arc::new(remote));
        let report = sync_use_case
            .execute(&files, &sync_config, &run_id, &current_hostname())
            .await;

        for record in &report.files {
            println!("{}", outcome_line(&record.name, &record.outcome));
        }

        if report.dry_run {
            println!(
                "✓ Dry-run mode: {} files would be copied",
                report.pending_files().len()
            );
        }
        println!(
            "✓ Sync complete: {} files copied, {} errors",
            report.copied, report.errors
        );
        if !report.is_clean() {
            println!("⚠ Some files could not be copied, see the messages above");
        }

        if let Some(path) = &args.report {
            self.report_repository.save(path, &report).await?;
            println!("✓ Report written to {}", path);
        }

        Ok(report)
    }
}
