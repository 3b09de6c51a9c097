use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::models::{AuditMode, AuditReport, AuditRequest, ProgressEvent};
use crate::output::format_audit_report;
use crate::services::{Auditor, ChannelProgress};

pub async fn run_audit(
    url: &str,
    mode: AuditMode,
    json_output: bool,
    config: AuditConfig,
) -> Result<()> {
    let pb = if json_output {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?
                .progress_chars("#>-"),
        );
        pb
    };

    match audit(url, mode, config, &pb).await {
        Ok(report) => {
            pb.finish_and_clear();
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_audit_report(&report));
            }
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message(e.user_message());
            if json_output {
                println!("{}", serde_json::to_string_pretty(&error_payload(&e))?);
            }
            Err(e.into())
        }
    }
}

/// Validate, run and stream progress into `pb`. Every terminal failure lands here.
async fn audit(
    url: &str,
    mode: AuditMode,
    config: AuditConfig,
    pb: &ProgressBar,
) -> Result<AuditReport, AuditError> {
    let request = AuditRequest::new(url, mode)?;
    let auditor = Auditor::new(config)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let bar = pb.clone();
    let renderer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            debug!("Progress {}%: {}", event.percent, event.message);
            bar.set_position(event.percent as u64);
            bar.set_message(event.message);
        }
    });

    let result = auditor.run(&request, &ChannelProgress(tx)).await;
    // Sender is gone once `run` returns, so the renderer drains and exits
    renderer.await.ok();
    result
}

fn error_payload(e: &AuditError) -> serde_json::Value {
    serde_json::json!({ "error": e.user_message() })
}
