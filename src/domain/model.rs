use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the student a request is made for.
#[derive(Clone, Serialize, Deserialize)]
pub struct StudentRef {
    pub campus_code: String,
    pub roll_number: String,
    pub authen: String,
}

impl StudentRef {
    pub fn new(
        campus_code: impl Into<String>,
        roll_number: impl Into<String>,
        authen: impl Into<String>,
    ) -> Self {
        Self {
            campus_code: campus_code.into(),
            roll_number: roll_number.into(),
            authen: authen.into(),
        }
    }
}

impl fmt::Debug for StudentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentRef")
            .field("campus_code", &self.campus_code)
            .field("roll_number", &self.roll_number)
            .field("authen", &"<redacted>")
            .finish()
    }
}

/// Uniform envelope around every API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub status_code: Option<u16>,
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Builds the envelope from a completed HTTP exchange.
    ///
    /// The body counts as successful only when the status is 200 and, if the
    /// body is a JSON object with a `code` key, that key is the string `"200"`.
    pub fn from_http(status_code: u16, body: String) -> Self {
        let data = serde_json::from_str::<serde_json::Value>(&body).ok();

        let mut success = status_code == 200;
        if let Some(code) = data.as_ref().and_then(|d| d.get("code")) {
            success = success && code.as_str() == Some("200");
        }

        Self {
            success,
            status_code: Some(status_code),
            data,
            raw_response: Some(body),
            error: None,
        }
    }

    /// Envelope for a request that never produced an HTTP response.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: None,
            data: None,
            raw_response: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_code_200_string() {
        let resp = ApiResponse::from_http(200, r#"{"code":"200","data":[1,2]}"#.to_string());
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["data"], json!([1, 2]));
    }

    #[test]
    fn test_failure_when_body_code_differs() {
        let resp = ApiResponse::from_http(200, r#"{"code":"401","message":"expired"}"#.to_string());
        assert!(!resp.success);
        assert_eq!(resp.status_code, Some(200));
    }

    #[test]
    fn test_numeric_code_is_not_accepted() {
        let resp = ApiResponse::from_http(200, r#"{"code":200}"#.to_string());
        assert!(!resp.success);
    }

    #[test]
    fn test_success_without_code_field() {
        let resp = ApiResponse::from_http(200, r#"[{"campusCode":"APHL"}]"#.to_string());
        assert!(resp.success);
    }

    #[test]
    fn test_non_json_body_keeps_raw_text() {
        let resp = ApiResponse::from_http(200, "<html>maintenance</html>".to_string());
        assert!(resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.raw_response.as_deref(), Some("<html>maintenance</html>"));
    }

    #[test]
    fn test_non_200_status_fails() {
        let resp = ApiResponse::from_http(500, r#"{"code":"200"}"#.to_string());
        assert!(!resp.success);
    }

    #[test]
    fn test_error_envelope_shape() {
        let resp = ApiResponse::from_error("connection refused");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "status_code": null,
                "data": null,
                "error": "connection refused"
            })
        );
    }

    #[test]
    fn test_student_ref_debug_hides_authen() {
        let student = StudentRef::new("APHL", "SE123456", "tok-secret");
        let debug = format!("{:?}", student);
        assert!(debug.contains("SE123456"));
        assert!(!debug.contains("tok-secret"));
    }
}
