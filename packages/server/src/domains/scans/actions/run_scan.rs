//! Scan orchestration.
//!
//! A scan walks a fixed sequence of stages. Each stage either advances,
//! short-circuits to a terminal result, or skips an optional stage:
//!
//! ```text
//! Validating -> RateCheck -> CacheCheck -> AuditHome -> Crawl -> AuditSubpages
//!     -> Aggregate -> Persist -> Done
//! ```
//!
//! Validation and rate-limit failures reject the request. A homepage audit
//! failure is persisted as a failed attempt and ends the scan. Everything
//! after the homepage audit is best-effort and bounded by two deadlines
//! measured from the start of the homepage audit: past the soft deadline no
//! crawl is attempted. The hard deadline cuts off any audit still running,
//! homepage included, and no further subpage audit starts once it is reached.
//!
//! Stages run strictly one after another; the only concurrency is across
//! requests.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::aggregate::{average_score, build_teaser};
use super::guards::{check_rate_limit, find_cached_report};
use crate::common::url::normalize_url;
use crate::domains::auditing::actions::{audit_page, AuditError, AuditOutcome};
use crate::domains::auditing::models::{page_title_from_url, Finding, PageResult, Summary};
use crate::domains::crawling::discover_subpages;
use crate::domains::scans::errors::ScanError;
use crate::domains::scans::models::{NewScanRecord, COMPLETED_SCAN_STATUS};
use crate::domains::scans::types::{ScanReport, ScanRequest};
use crate::kernel::ServerDeps;

pub const HOMEPAGE_TITLE: &str = "Homepage";

/// Position of a scan in its lifecycle. Later stages carry the data handed
/// over from the stage before.
#[derive(Debug)]
pub enum ScanStage {
    Validating,
    RateCheck,
    CacheCheck,
    AuditHome,
    Crawl,
    AuditSubpages(Vec<String>),
    Aggregate,
    Persist(Box<CompletedScan>),
    Done(ScanReport),
}

impl ScanStage {
    pub fn name(&self) -> &'static str {
        match self {
            ScanStage::Validating => "validating",
            ScanStage::RateCheck => "rate_check",
            ScanStage::CacheCheck => "cache_check",
            ScanStage::AuditHome => "audit_home",
            ScanStage::Crawl => "crawl",
            ScanStage::AuditSubpages(_) => "audit_subpages",
            ScanStage::Aggregate => "aggregate",
            ScanStage::Persist(_) => "persist",
            ScanStage::Done(_) => "done",
        }
    }
}

/// Aggregated scan ready to be stored and returned.
#[derive(Debug)]
pub struct CompletedScan {
    pub record: NewScanRecord,
    pub report: ScanReport,
}

/// Mutable state of one scan execution.
struct ScanContext {
    request: ScanRequest,
    website_url: String,
    started: Option<Instant>,
    page_results: Vec<PageResult>,
    findings: Vec<Finding>,
    total_score: u32,
}

impl ScanContext {
    fn new(request: ScanRequest) -> Self {
        Self {
            request,
            website_url: String::new(),
            started: None,
            page_results: Vec::new(),
            findings: Vec::new(),
            total_score: 0,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    fn remaining(&self, hard_deadline: Duration) -> Duration {
        hard_deadline.saturating_sub(self.elapsed())
    }

    fn elapsed_ms(&self) -> i64 {
        self.elapsed().as_millis() as i64
    }

    fn add_page(&mut self, page: PageResult) {
        self.total_score += u32::from(page.accessibility_score);
        self.findings.extend(page.findings.iter().cloned());
        self.page_results.push(page);
    }
}

/// Run one scan request to completion.
pub async fn run_scan(request: ScanRequest, deps: &ServerDeps) -> Result<ScanReport, ScanError> {
    let mut ctx = ScanContext::new(request);
    let mut stage = ScanStage::Validating;

    loop {
        debug!(session_id = %ctx.request.session_id, stage = stage.name(), "Scan stage");

        stage = match stage {
            ScanStage::Validating => validate(&mut ctx)?,
            ScanStage::RateCheck => {
                check_rate_limit(&ctx.request.client_ip, deps).await?;
                ScanStage::CacheCheck
            }
            ScanStage::CacheCheck => match find_cached_report(&ctx.website_url, deps).await {
                Some(report) => ScanStage::Done(report),
                None => ScanStage::AuditHome,
            },
            ScanStage::AuditHome => audit_home(&mut ctx, deps).await?,
            ScanStage::Crawl => crawl(&ctx, deps).await,
            ScanStage::AuditSubpages(candidates) => {
                audit_subpages(&mut ctx, candidates, deps).await
            }
            ScanStage::Aggregate => aggregate(&mut ctx, deps),
            ScanStage::Persist(completed) => persist(*completed, deps).await?,
            ScanStage::Done(report) => return Ok(report),
        };
    }
}

fn validate(ctx: &mut ScanContext) -> Result<ScanStage, ScanError> {
    let request = &ctx.request;

    if request.website_url.trim().is_empty() {
        return Err(ScanError::InvalidInput("Website URL is required".into()));
    }
    if request.session_id.trim().is_empty() {
        return Err(ScanError::InvalidInput("Session ID is required".into()));
    }

    ctx.website_url =
        normalize_url(&request.website_url).map_err(|e| ScanError::InvalidInput(e.to_string()))?;

    Ok(ScanStage::RateCheck)
}

async fn audit_home(ctx: &mut ScanContext, deps: &ServerDeps) -> Result<ScanStage, ScanError> {
    ctx.started = Some(Instant::now());
    info!(url = %ctx.website_url, session_id = %ctx.request.session_id, "Scanning homepage");

    let result = audit_before_deadline(ctx, &ctx.website_url, deps).await;
    match result {
        Ok(outcome) => {
            let page = PageResult::new(
                ctx.website_url.clone(),
                Some(HOMEPAGE_TITLE.to_string()),
                outcome.score,
                outcome.findings,
            );
            ctx.add_page(page);
            Ok(ScanStage::Crawl)
        }
        Err(e) => {
            error!(url = %ctx.website_url, error = %e, "Homepage audit failed");

            let record = NewScanRecord::failed(
                &ctx.request.session_id,
                &ctx.website_url,
                &ctx.request.client_ip,
                ctx.elapsed_ms(),
                &deps.settings.scanner_version,
            );
            if let Err(store_err) = deps.scan_store.insert(&record).await {
                warn!(
                    session_id = %ctx.request.session_id,
                    error = %store_err,
                    "Failed to record failed scan attempt"
                );
            }

            Err(ScanError::AuditFailed(e.user_message()))
        }
    }
}

async fn crawl(ctx: &ScanContext, deps: &ServerDeps) -> ScanStage {
    let elapsed = ctx.elapsed();
    if elapsed > deps.settings.soft_deadline {
        info!(
            url = %ctx.website_url,
            elapsed_ms = elapsed.as_millis() as u64,
            "Homepage scan took too long, skipping subpages"
        );
        return ScanStage::Aggregate;
    }

    let candidates = discover_subpages(&ctx.website_url, deps).await;
    if candidates.is_empty() {
        return ScanStage::Aggregate;
    }

    ScanStage::AuditSubpages(candidates)
}

async fn audit_subpages(
    ctx: &mut ScanContext,
    candidates: Vec<String>,
    deps: &ServerDeps,
) -> ScanStage {
    let settings = &deps.settings;
    let mut scanned = 0;

    for page_url in candidates {
        if scanned >= settings.max_subpages {
            break;
        }

        let elapsed = ctx.elapsed();
        if elapsed >= settings.hard_deadline {
            info!(
                url = %ctx.website_url,
                elapsed_ms = elapsed.as_millis() as u64,
                "Scan deadline reached, stopping subpage audits"
            );
            break;
        }

        let result = audit_before_deadline(ctx, &page_url, deps).await;
        match result {
            Ok(outcome) => {
                let title = page_title_from_url(&page_url);
                ctx.add_page(PageResult::new(
                    page_url,
                    Some(title),
                    outcome.score,
                    outcome.findings,
                ));
                scanned += 1;
            }
            Err(e) => {
                warn!(url = %page_url, error = %e, "Subpage audit failed, skipping");
            }
        }
    }

    ScanStage::Aggregate
}

/// Audit `url`, giving up once the scan's hard deadline is reached.
async fn audit_before_deadline(
    ctx: &ScanContext,
    url: &str,
    deps: &ServerDeps,
) -> Result<AuditOutcome, AuditError> {
    let budget = ctx.remaining(deps.settings.hard_deadline);
    let audit = audit_page(url, deps.auditor.as_ref(), &deps.classifier);

    match tokio::time::timeout(budget, audit).await {
        Ok(result) => result,
        Err(_) => Err(AuditError {
            url: url.to_string(),
            cause: anyhow::anyhow!("Audit timed out after {}s", budget.as_secs()),
        }),
    }
}

fn aggregate(ctx: &mut ScanContext, deps: &ServerDeps) -> ScanStage {
    let avg_score = average_score(&ctx.page_results);
    let summary = Summary::from_findings(&ctx.findings, Some(avg_score));
    let teaser = build_teaser(&ctx.findings, Some(avg_score));
    let duration_ms = ctx.elapsed_ms();
    let pages_scanned = ctx.page_results.len();

    info!(
        url = %ctx.website_url,
        findings = ctx.findings.len(),
        pages_scanned,
        duration_ms,
        avg_score,
        total_score = ctx.total_score,
        "Scan completed"
    );

    let page_results = std::mem::take(&mut ctx.page_results);
    let findings = std::mem::take(&mut ctx.findings);

    let record = NewScanRecord {
        session_id: ctx.request.session_id.clone(),
        website_url: ctx.website_url.clone(),
        client_ip: ctx.request.client_ip.clone(),
        http_status: COMPLETED_SCAN_STATUS,
        scan_duration_ms: duration_ms,
        findings,
        summary: summary.clone(),
        page_results: page_results.clone(),
        pages_scanned: pages_scanned as i32,
        scanner_version: deps.settings.scanner_version.clone(),
    };

    let report = ScanReport {
        success: true,
        session_id: ctx.request.session_id.clone(),
        summary,
        teaser,
        pages_scanned: Some(pages_scanned as u32),
        page_results: Some(page_results),
        cached: None,
    };

    ScanStage::Persist(Box::new(CompletedScan { record, report }))
}

async fn persist(completed: CompletedScan, deps: &ServerDeps) -> Result<ScanStage, ScanError> {
    match deps.scan_store.insert(&completed.record).await {
        Ok(()) => {}
        Err(e) if e.is_duplicate() => {
            warn!(
                session_id = %completed.record.session_id,
                "Scan already recorded for session, keeping existing record"
            );
        }
        Err(e) => {
            error!(session_id = %completed.record.session_id, error = %e, "Failed to store scan");
            return Err(ScanError::PersistenceFailed(e));
        }
    }

    Ok(ScanStage::Done(completed.report))
}
