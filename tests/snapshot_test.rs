use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use student_api::config::toml_config::FileConfig;
use student_api::core::snapshot::SUMMARY_FILE;
use student_api::{ApiConfig, ApiResponse, LocalStorage, Snapshot, StudentApiClient, StudentRef};
use tempfile::TempDir;

const SNAPSHOT_PATHS: [&str; 12] = [
    "/GetStudentById",
    "/GetBalance",
    "/GeFeeByRoll",
    "/GetApplication",
    "/GetNotificationByRoll",
    "/GetCampusInfo",
    "/GetActivityStudent",
    "/GetStudentAttendances",
    "/GetScheduleExam",
    "/GetStudentMark",
    "/GetDiemphongtrao",
    "/GetSubjectBySemester",
];

fn client_for(base_url: &str) -> StudentApiClient {
    client_with_file(base_url, &FileConfig::default())
}

fn client_with_file(base_url: &str, file: &FileConfig) -> StudentApiClient {
    let vars: HashMap<&str, String> = [
        ("BASE_URL", base_url.to_string()),
        ("AUTHEN_KEY", "env-token".to_string()),
        ("SECRET_KEY_MAIN", "m".to_string()),
        ("SECRET_KEY_ALT", "a".to_string()),
        ("SECRET_KEY_LONG", "l".to_string()),
        ("SUPER_SECRET_CODE", "c".to_string()),
    ]
    .into_iter()
    .collect();
    let config = ApiConfig::from_parts(file, |k| vars.get(k).cloned()).unwrap();
    StudentApiClient::new(config).unwrap()
}

#[tokio::test]
async fn test_snapshot_writes_every_endpoint_and_summary() -> Result<()> {
    let server = MockServer::start();
    let mocks: Vec<_> = SNAPSHOT_PATHS
        .iter()
        .map(|path| {
            server.mock(|when, then| {
                when.method(GET).path(*path).query_param("campusCode", "APHL");
                then.status(200).json_body(json!({"code": "200", "path": path}));
            })
        })
        .collect();

    let temp_dir = TempDir::new()?;
    let client = client_for(&server.base_url());
    let student = StudentRef::new("APHL", "SE123456", "tok");
    let snapshot = Snapshot::new(client, LocalStorage::new(temp_dir.path())).with_concurrency(3);

    let report = snapshot.run(&student, "Fall2024").await?;

    for mock in &mocks {
        mock.assert();
    }
    assert_eq!(report.entries.len(), SNAPSHOT_PATHS.len());
    assert_eq!(report.succeeded(), SNAPSHOT_PATHS.len());
    assert_eq!(report.failed(), 0);
    assert_eq!(report.entries[0].name, "student_by_id");
    assert_eq!(report.entries[11].name, "subject_by_semester");

    let balance: ApiResponse =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("balance.json"))?)?;
    assert!(balance.success);
    assert_eq!(balance.data.unwrap()["path"], "/GetBalance");

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join(SUMMARY_FILE))?)?;
    assert_eq!(summary["semester"], "Fall2024");
    assert_eq!(summary["entries"].as_array().unwrap().len(), SNAPSHOT_PATHS.len());
    assert_eq!(summary["entries"][1]["file"], "balance.json");
    Ok(())
}

#[tokio::test]
async fn test_snapshot_records_failures_without_aborting() -> Result<()> {
    let server = MockServer::start();
    for path in SNAPSHOT_PATHS.iter().filter(|p| **p != "/GetStudentMark") {
        server.mock(|when, then| {
            when.method(GET).path(*path);
            then.status(200).json_body(json!({"code": "200"}));
        });
    }
    server.mock(|when, then| {
        when.method(GET).path("/GetStudentMark");
        then.status(200).json_body(json!({"code": "500", "message": "not published"}));
    });

    let temp_dir = TempDir::new()?;
    let client = client_for(&server.base_url());
    let student = StudentRef::new("APHL", "SE123456", "tok");
    let report = Snapshot::new(client, LocalStorage::new(temp_dir.path()))
        .run(&student, "Fall2024")
        .await?;

    assert_eq!(report.failed(), 1);
    let marks = report
        .entries
        .iter()
        .find(|e| e.name == "student_mark")
        .unwrap();
    assert!(!marks.success);
    assert_eq!(marks.status_code, Some(200));
    assert!(temp_dir.path().join("student_mark.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_snapshot_with_unreachable_server_stores_error_envelopes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let client = client_for("http://127.0.0.1:1");
    let student = StudentRef::new("APHL", "SE123456", "tok");

    let report = Snapshot::new(client, LocalStorage::new(temp_dir.path()))
        .run(&student, "Fall2024")
        .await?;

    assert_eq!(report.succeeded(), 0);
    let profile: ApiResponse =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("student_by_id.json"))?)?;
    assert_eq!(profile.status_code, None);
    assert!(profile.error.is_some());
    Ok(())
}

#[tokio::test]
async fn test_snapshot_keeps_catalogue_order_when_first_request_is_slowest() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/GetStudentById");
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(json!({"code": "200"}));
    });
    for path in SNAPSHOT_PATHS.iter().skip(1) {
        server.mock(|when, then| {
            when.method(GET).path(*path);
            then.status(200).json_body(json!({"code": "200"}));
        });
    }

    let temp_dir = TempDir::new()?;
    let client = client_for(&server.base_url());
    let student = StudentRef::new("APHL", "SE123456", "tok");
    let report = Snapshot::new(client, LocalStorage::new(temp_dir.path()))
        .with_concurrency(4)
        .run(&student, "Fall2024")
        .await?;

    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "student_by_id",
            "balance",
            "fee_by_roll",
            "application",
            "notification_by_roll",
            "campus_info",
            "activity_student",
            "student_attendances",
            "exam_schedule",
            "student_mark",
            "extra_points",
            "subject_by_semester",
        ]
    );
    assert!(report.entries[0].success);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_with_zero_configured_concurrency_still_runs() -> Result<()> {
    let server = MockServer::start();
    for path in SNAPSHOT_PATHS {
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(200).json_body(json!({"code": "200"}));
        });
    }

    let file = FileConfig::from_toml_str("[snapshot]\nconcurrent_requests = 0\n")?;
    let temp_dir = TempDir::new()?;
    let client = client_with_file(&server.base_url(), &file);
    assert_eq!(client.config().concurrent_requests, 0);
    let student = StudentRef::new("APHL", "SE123456", "tok");
    let snapshot = Snapshot::new(client, LocalStorage::new(temp_dir.path()));

    let report =
        tokio::time::timeout(Duration::from_secs(10), snapshot.run(&student, "Fall2024")).await??;
    assert_eq!(report.succeeded(), SNAPSHOT_PATHS.len());
    Ok(())
}

#[tokio::test]
async fn test_snapshot_error_envelopes_do_not_expose_credentials() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let client = client_for("http://127.0.0.1:1");
    let student = StudentRef::new("APHL", "SE123456", "tok-SECRET-123");

    Snapshot::new(client, LocalStorage::new(temp_dir.path()))
        .run(&student, "Fall2024")
        .await?;

    let stored = std::fs::read_to_string(temp_dir.path().join("balance.json"))?;
    assert!(stored.contains("\"error\""));
    assert!(!stored.contains("tok-SECRET-123"));
    assert!(!stored.contains("checksum="));
    Ok(())
}
