//! Catalogue of the API calls the mobile app makes.
//!
//! Each builder is pure: it signs with the given [`Signer`] and returns a
//! [`RequestSpec`] describing the call, without touching the network. Path
//! names are reproduced exactly as the server exposes them, misspellings
//! included (`GeFeeByRoll`, `RetriveImage`).

use crate::core::checksum::Signer;
use crate::domain::model::StudentRef;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Which base URL a request is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Main,
    Survey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub name: &'static str,
    pub method: HttpMethod,
    pub host: Host,
    pub path: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl RequestSpec {
    fn get(name: &'static str, path: &'static str, params: Vec<(&'static str, String)>) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            host: Host::Main,
            path,
            params,
        }
    }

    #[cfg(test)]
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// campusCode, rollNumber, Authen, checksum: the most common parameter set.
fn roll_params(signer: &Signer, student: &StudentRef) -> Result<Vec<(&'static str, String)>> {
    let checksum = signer.checksum_k(&student.roll_number, &student.campus_code)?;
    Ok(vec![
        ("campusCode", student.campus_code.clone()),
        ("rollNumber", student.roll_number.clone()),
        ("Authen", student.authen.clone()),
        ("checksum", checksum),
    ])
}

fn roll_request(
    name: &'static str,
    path: &'static str,
    signer: &Signer,
    student: &StudentRef,
) -> Result<RequestSpec> {
    Ok(RequestSpec::get(name, path, roll_params(signer, student)?))
}

// Student information

pub fn student_by_id(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("student_by_id", "GetStudentById", signer, student)
}

pub fn student_rate(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("student_rate", "GetStudentRate", signer, student)
}

/// Submits a rating. Parameters travel in the query string even though this is a POST.
pub fn add_rate(
    signer: &Signer,
    student: &StudentRef,
    rate_id: &str,
    rate_value: &str,
    rate_comment: &str,
) -> Result<RequestSpec> {
    let checksum = signer.checksum_k(rate_id, &student.campus_code)?;
    Ok(RequestSpec {
        name: "add_rate",
        method: HttpMethod::Post,
        host: Host::Main,
        path: "AddRate",
        params: vec![
            ("campusCode", student.campus_code.clone()),
            ("Authen", student.authen.clone()),
            ("rateid", rate_id.to_string()),
            ("rateValue", rate_value.to_string()),
            ("rateComment", rate_comment.to_string()),
            ("checksum", checksum),
        ],
    })
}

pub fn balance(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("balance", "GetBalance", signer, student)
}

pub fn fee_by_roll(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("fee_by_roll", "GeFeeByRoll", signer, student)
}

pub fn application(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("application", "GetApplication", signer, student)
}

pub fn retrieve_image(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("retrieve_image", "RetriveImage", signer, student)
}

// Academic

/// Extra-curricular ("phong trao") points. Note the lower-case `semester` key.
pub fn extra_points(signer: &Signer, student: &StudentRef, semester: &str) -> Result<RequestSpec> {
    let checksum = signer.checksum_k(&student.roll_number, &student.campus_code)?;
    Ok(RequestSpec::get(
        "extra_points",
        "GetDiemphongtrao",
        vec![
            ("campusCode", student.campus_code.clone()),
            ("rollNumber", student.roll_number.clone()),
            ("semester", semester.to_string()),
            ("Authen", student.authen.clone()),
            ("checksum", checksum),
        ],
    ))
}

pub fn student_attendances(
    signer: &Signer,
    student: &StudentRef,
    semester: &str,
) -> Result<RequestSpec> {
    let checksum = signer.checksum_k(&student.roll_number, &student.campus_code)?;
    Ok(RequestSpec::get(
        "student_attendances",
        "GetStudentAttendances",
        vec![
            ("campusCode", student.campus_code.clone()),
            ("Semester", semester.to_string()),
            ("rollNumber", student.roll_number.clone()),
            ("Authen", student.authen.clone()),
            ("checksum", checksum),
        ],
    ))
}

fn semester_request(
    name: &'static str,
    path: &'static str,
    signer: &Signer,
    student: &StudentRef,
    semester: &str,
) -> Result<RequestSpec> {
    let checksum = signer.checksum_k(&student.roll_number, &student.campus_code)?;
    Ok(RequestSpec::get(
        name,
        path,
        vec![
            ("campusCode", student.campus_code.clone()),
            ("rollNumber", student.roll_number.clone()),
            ("Semester", semester.to_string()),
            ("Authen", student.authen.clone()),
            ("checksum", checksum),
        ],
    ))
}

pub fn activity_student(
    signer: &Signer,
    student: &StudentRef,
    semester: &str,
) -> Result<RequestSpec> {
    semester_request("activity_student", "GetActivityStudent", signer, student, semester)
}

pub fn exam_schedule(signer: &Signer, student: &StudentRef, semester: &str) -> Result<RequestSpec> {
    semester_request("exam_schedule", "GetScheduleExam", signer, student, semester)
}

pub fn student_mark(signer: &Signer, student: &StudentRef, semester: &str) -> Result<RequestSpec> {
    semester_request("student_mark", "GetStudentMark", signer, student, semester)
}

pub fn activity_student_by_week(
    signer: &Signer,
    student: &StudentRef,
    week: &str,
    semester: &str,
    year: &str,
) -> Result<RequestSpec> {
    let checksum = signer.checksum_k(&student.roll_number, &student.campus_code)?;
    Ok(RequestSpec::get(
        "activity_student_by_week",
        "GetActivityStudentByWeek",
        vec![
            ("campusCode", student.campus_code.clone()),
            ("week", week.to_string()),
            ("rollNumber", student.roll_number.clone()),
            ("Semester", semester.to_string()),
            ("year", year.to_string()),
            ("Authen", student.authen.clone()),
            ("checksum", checksum),
        ],
    ))
}

pub fn notification_by_roll(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("notification_by_roll", "GetNotificationByRoll", signer, student)
}

// System

pub fn all_active_campus() -> RequestSpec {
    RequestSpec::get("all_active_campus", "GetAllActiveCampus", Vec::new())
}

pub fn version() -> RequestSpec {
    RequestSpec::get("version", "GetVersion", Vec::new())
}

pub fn campus_info(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("campus_info", "GetCampusInfo", signer, student)
}

pub fn semester(signer: &Signer, campus_code: &str, authen: &str) -> Result<RequestSpec> {
    let checksum = signer.checksum_a(campus_code)?;
    Ok(RequestSpec::get(
        "semester",
        "GetSemester",
        vec![
            ("campusCode", campus_code.to_string()),
            ("Authen", authen.to_string()),
            ("checksum", checksum),
        ],
    ))
}

/// Signed with an empty subject: the roll number is not part of this call.
pub fn subject_by_semester(
    signer: &Signer,
    campus_code: &str,
    semester: &str,
    authen: &str,
) -> Result<RequestSpec> {
    let checksum = signer.checksum_k("", campus_code)?;
    Ok(RequestSpec::get(
        "subject_by_semester",
        "GetSubjectBySemester",
        vec![
            ("campusCode", campus_code.to_string()),
            ("Semester", semester.to_string()),
            ("Authen", authen.to_string()),
            ("checksum", checksum),
        ],
    ))
}

/// The server does not check a checksum here, so none is sent.
pub fn week_by_date(timestamp: &str) -> RequestSpec {
    RequestSpec::get(
        "week_by_date",
        "GetWeekByDate",
        vec![("date", timestamp.to_string())],
    )
}

pub fn top10_news(
    signer: &Signer,
    campus_code: &str,
    authen: &str,
    news_type: &str,
) -> Result<RequestSpec> {
    let checksum = signer.checksum_k(news_type, campus_code)?;
    Ok(RequestSpec::get(
        "top10_news",
        "GetTop10News",
        vec![
            ("campusCode", campus_code.to_string()),
            ("Authen", authen.to_string()),
            ("type", news_type.to_string()),
            ("checksum", checksum),
        ],
    ))
}

// Feedback

pub fn check_open_feedback(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("check_open_feedback", "CheckOpenFeedBack", signer, student)
}

pub fn check_update_profile(signer: &Signer, student: &StudentRef) -> Result<RequestSpec> {
    roll_request("check_update_profile", "CheckUpdateProfile", signer, student)
}

pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Served by the survey host rather than the main API.
pub fn required_survey(signer: &Signer, username: &str) -> Result<RequestSpec> {
    let username = normalize_username(username);
    let checksum = signer.checksum_y(&username, "")?;
    Ok(RequestSpec {
        name: "required_survey",
        method: HttpMethod::Get,
        host: Host::Survey,
        path: "GetRequiredSurvey",
        params: vec![("username", username), ("checksum", checksum)],
    })
}
