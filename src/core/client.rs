use crate::config::ApiConfig;
use crate::core::checksum::Signer;
use crate::core::endpoints::{self, Host, HttpMethod, RequestSpec};
use crate::domain::model::{ApiResponse, StudentRef};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::{Result, StudentApiError};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Client for the student portal's mobile-app API.
///
/// Cheap to clone; clones share the connection pool and signer.
#[derive(Debug, Clone)]
pub struct StudentApiClient {
    client: Client,
    config: Arc<ApiConfig>,
    signer: Arc<Signer>,
}

impl StudentApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ApiConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                StudentApiError::InvalidConfigValueError {
                    field: "user_agent".to_string(),
                    value: config.user_agent.clone(),
                    reason: e.to_string(),
                }
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let signer = Signer::with_clock(config.secrets.clone(), clock);

        Ok(Self {
            client,
            config: Arc::new(config),
            signer: Arc::new(signer),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Student identity using the configured `AUTHEN_KEY` as the token.
    pub fn student(&self, campus_code: &str, roll_number: &str) -> StudentRef {
        StudentRef::new(campus_code, roll_number, self.config.authen_key.as_str())
    }

    fn url_for(&self, spec: &RequestSpec) -> Result<String> {
        let base = match spec.host {
            Host::Main => self.config.base_url.as_str(),
            Host::Survey => self.config.survey_url.as_deref().ok_or_else(|| {
                StudentApiError::MissingConfigError {
                    field: "GOOGLE_AUTH_URL".to_string(),
                }
            })?,
        };
        Ok(format!("{}/{}", base.trim_end_matches('/'), spec.path))
    }

    /// Sends a request and wraps whatever the server answered in an [`ApiResponse`].
    ///
    /// Only failures to obtain a response at all are returned as errors. Those
    /// errors carry no URL, since the query string holds `Authen` and `checksum`.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<ApiResponse> {
        let url = self.url_for(spec)?;

        let request = match spec.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        let request = if spec.params.is_empty() {
            request
        } else {
            request.query(&spec.params)
        };

        tracing::debug!("📡 {}: {:?} {}", spec.name, spec.method, url);
        let response = request.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        let envelope = ApiResponse::from_http(status, body);
        tracing::debug!(
            "📡 {}: status {} success={}",
            spec.name,
            status,
            envelope.success
        );
        if !envelope.success {
            tracing::warn!("⚠️ {} returned an unsuccessful response (status {})", spec.name, status);
        }
        Ok(envelope)
    }

    // Student information

    pub async fn get_student_by_id(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::student_by_id(&self.signer, student)?).await
    }

    pub async fn get_student_rate(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::student_rate(&self.signer, student)?).await
    }

    pub async fn add_rate(
        &self,
        student: &StudentRef,
        rate_id: &str,
        rate_value: &str,
        rate_comment: &str,
    ) -> Result<ApiResponse> {
        let spec = endpoints::add_rate(&self.signer, student, rate_id, rate_value, rate_comment)?;
        self.execute(&spec).await
    }

    pub async fn get_balance(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::balance(&self.signer, student)?).await
    }

    pub async fn get_fee_by_roll(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::fee_by_roll(&self.signer, student)?).await
    }

    pub async fn get_application(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::application(&self.signer, student)?).await
    }

    pub async fn retrieve_image(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::retrieve_image(&self.signer, student)?).await
    }

    // Academic

    pub async fn get_extra_points(&self, student: &StudentRef, semester: &str) -> Result<ApiResponse> {
        self.execute(&endpoints::extra_points(&self.signer, student, semester)?)
            .await
    }

    pub async fn get_student_attendances(
        &self,
        student: &StudentRef,
        semester: &str,
    ) -> Result<ApiResponse> {
        self.execute(&endpoints::student_attendances(&self.signer, student, semester)?)
            .await
    }

    pub async fn get_exam_schedule(&self, student: &StudentRef, semester: &str) -> Result<ApiResponse> {
        self.execute(&endpoints::exam_schedule(&self.signer, student, semester)?)
            .await
    }

    pub async fn get_student_mark(&self, student: &StudentRef, semester: &str) -> Result<ApiResponse> {
        self.execute(&endpoints::student_mark(&self.signer, student, semester)?)
            .await
    }

    pub async fn get_semester(&self, campus_code: &str, authen: &str) -> Result<ApiResponse> {
        self.execute(&endpoints::semester(&self.signer, campus_code, authen)?)
            .await
    }

    pub async fn get_subject_by_semester(
        &self,
        campus_code: &str,
        semester: &str,
        authen: &str,
    ) -> Result<ApiResponse> {
        let spec = endpoints::subject_by_semester(&self.signer, campus_code, semester, authen)?;
        self.execute(&spec).await
    }

    // Activities and notifications

    pub async fn get_activity_student(
        &self,
        student: &StudentRef,
        semester: &str,
    ) -> Result<ApiResponse> {
        self.execute(&endpoints::activity_student(&self.signer, student, semester)?)
            .await
    }

    pub async fn get_activity_student_by_week(
        &self,
        student: &StudentRef,
        week: &str,
        semester: &str,
        year: &str,
    ) -> Result<ApiResponse> {
        let spec =
            endpoints::activity_student_by_week(&self.signer, student, week, semester, year)?;
        self.execute(&spec).await
    }

    pub async fn get_notification_by_roll(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::notification_by_roll(&self.signer, student)?)
            .await
    }

    pub async fn get_top10_news(
        &self,
        campus_code: &str,
        authen: &str,
        news_type: &str,
    ) -> Result<ApiResponse> {
        let spec = endpoints::top10_news(&self.signer, campus_code, authen, news_type)?;
        self.execute(&spec).await
    }

    // System

    pub async fn get_all_active_campus(&self) -> Result<ApiResponse> {
        self.execute(&endpoints::all_active_campus()).await
    }

    pub async fn get_version(&self) -> Result<ApiResponse> {
        self.execute(&endpoints::version()).await
    }

    pub async fn get_campus_info(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::campus_info(&self.signer, student)?).await
    }

    pub async fn get_week_by_date(&self, timestamp: &str) -> Result<ApiResponse> {
        self.execute(&endpoints::week_by_date(timestamp)).await
    }

    // Feedback

    pub async fn check_open_feedback(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::check_open_feedback(&self.signer, student)?)
            .await
    }

    pub async fn check_update_profile(&self, student: &StudentRef) -> Result<ApiResponse> {
        self.execute(&endpoints::check_update_profile(&self.signer, student)?)
            .await
    }

    pub async fn get_required_survey(&self, username: &str) -> Result<ApiResponse> {
        self.execute(&endpoints::required_survey(&self.signer, username)?)
            .await
    }
}
