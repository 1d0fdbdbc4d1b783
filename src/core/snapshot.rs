use crate::core::client::StudentApiClient;
use crate::core::endpoints::{self, RequestSpec};
use crate::domain::model::{ApiResponse, StudentRef};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, StudentApiError};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub success: bool,
    pub status_code: Option<u16>,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u64,
    pub semester: String,
    pub entries: Vec<SnapshotEntry>,
}

impl SnapshotReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.success).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

/// The per-student calls a snapshot collects, in report order.
pub fn snapshot_requests(
    client: &StudentApiClient,
    student: &StudentRef,
    semester: &str,
) -> Result<Vec<RequestSpec>> {
    let signer = client.signer();
    Ok(vec![
        endpoints::student_by_id(signer, student)?,
        endpoints::balance(signer, student)?,
        endpoints::fee_by_roll(signer, student)?,
        endpoints::application(signer, student)?,
        endpoints::notification_by_roll(signer, student)?,
        endpoints::campus_info(signer, student)?,
        endpoints::activity_student(signer, student, semester)?,
        endpoints::student_attendances(signer, student, semester)?,
        endpoints::exam_schedule(signer, student, semester)?,
        endpoints::student_mark(signer, student, semester)?,
        endpoints::extra_points(signer, student, semester)?,
        endpoints::subject_by_semester(signer, &student.campus_code, semester, &student.authen)?,
    ])
}

/// Fetches every snapshot endpoint and stores each envelope plus a summary.
pub struct Snapshot<S: Storage> {
    client: StudentApiClient,
    storage: S,
    concurrent_requests: usize,
}

impl<S: Storage> Snapshot<S> {
    pub fn new(client: StudentApiClient, storage: S) -> Self {
        let concurrent_requests = client.config().concurrent_requests.max(1);
        Self {
            client,
            storage,
            concurrent_requests,
        }
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    pub async fn run(&self, student: &StudentRef, semester: &str) -> Result<SnapshotReport> {
        let started_at = Local::now();
        let start = Instant::now();

        let specs = snapshot_requests(&self.client, student, semester)?;
        tracing::info!(
            "📸 Snapshot of {} endpoints for {} ({} concurrent)",
            specs.len(),
            student.roll_number,
            self.concurrent_requests
        );

        let responses = self.fetch_all(specs.clone()).await?;

        let mut entries = Vec::with_capacity(specs.len());
        for (spec, response) in specs.iter().zip(responses) {
            let file = format!("{}.json", spec.name);
            let json = serde_json::to_vec_pretty(&response)?;
            self.storage.write_file(&file, &json).await?;

            entries.push(SnapshotEntry {
                name: spec.name.to_string(),
                success: response.success,
                status_code: response.status_code,
                file,
            });
        }

        let report = SnapshotReport {
            started_at,
            elapsed_ms: start.elapsed().as_millis() as u64,
            semester: semester.to_string(),
            entries,
        };

        let summary = serde_json::to_vec_pretty(&report)?;
        self.storage.write_file(SUMMARY_FILE, &summary).await?;

        tracing::info!(
            "📸 Snapshot finished: {} succeeded, {} failed in {:?}",
            report.succeeded(),
            report.failed(),
            report.elapsed()
        );
        Ok(report)
    }

    /// Results come back in the order of `specs`, whatever order requests finish in.
    async fn fetch_all(&self, specs: Vec<RequestSpec>) -> Result<Vec<ApiResponse>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));
        let mut tasks = JoinSet::new();

        for (index, spec) in specs.into_iter().enumerate() {
            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let response = match client.execute(&spec).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::error!("❌ {}: {}", spec.name, e);
                        ApiResponse::from_error(e.to_string())
                    }
                };
                (index, response)
            });
        }

        let mut slots: Vec<Option<ApiResponse>> = vec![None; tasks.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, response) = joined.map_err(|e| StudentApiError::SnapshotError {
                message: format!("request task failed: {}", e),
            })?;
            slots[index] = Some(response);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| StudentApiError::SnapshotError {
                    message: format!("no response recorded for request #{}", index),
                })
            })
            .collect()
    }
}
