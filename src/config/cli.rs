use crate::config::ApiConfig;
use crate::domain::model::StudentRef;
use crate::utils::error::{Result, StudentApiError};
use clap::{Parser, Subcommand};
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Parser)]
#[command(name = "student-api")]
#[command(about = "Command-line client for the student portal API")]
pub struct CliArgs {
    /// Environment file with credentials (defaults to ./.env when present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Optional TOML file with non-secret settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Campus code (falls back to CAMPUS_CODE)
    #[arg(long, global = true)]
    pub campus: Option<String>,

    /// Roll number (falls back to ROLL_NUMBER)
    #[arg(long, global = true)]
    pub roll: Option<String>,

    /// Authen token (falls back to AUTHEN_KEY)
    #[arg(long, global = true)]
    pub authen: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, global = true, help = "Print the response on a single line")]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Student profile
    Student,
    /// Student rating information
    Rate,
    /// Submit a rating
    AddRate {
        rate_id: String,
        rate_value: String,
        #[arg(default_value = "")]
        rate_comment: String,
    },
    /// Account balance
    Balance,
    /// Tuition fees
    Fee,
    /// Submitted applications
    Applications,
    /// Profile image
    Image,
    /// Extra-curricular points for a semester
    ExtraPoints { semester: String },
    /// Activities for a semester
    Activities { semester: String },
    /// Activities for one week
    WeeklyActivities {
        week: String,
        semester: String,
        year: String,
    },
    /// Notifications
    Notifications,
    /// All active campuses
    Campuses,
    /// API version information
    Version,
    /// Campus information
    CampusInfo,
    /// Whether feedback is open
    FeedbackOpen,
    /// Whether a profile update is required
    ProfileUpdate,
    /// Required survey for a username
    Survey { username: String },
    /// Available semesters
    Semesters,
    /// Subjects for a semester
    Subjects { semester: String },
    /// Week number for a date timestamp
    Week { date: String },
    /// Attendance summary for a semester
    Attendance { semester: String },
    /// Exam schedule for a semester
    Exams { semester: String },
    /// Marks for a semester
    Marks { semester: String },
    /// Top 10 news of a given type
    News { news_type: String },
    /// Save every student endpoint for a semester to a directory
    Snapshot {
        semester: String,
        /// Output directory (defaults to snapshot.output_path)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        concurrent_requests: Option<usize>,
    },
}

impl fmt::Debug for CliArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliArgs")
            .field("env_file", &self.env_file)
            .field("config", &self.config)
            .field("campus", &self.campus)
            .field("roll", &self.roll)
            .field("authen", &self.authen.as_ref().map(|_| "<redacted>"))
            .field("verbose", &self.verbose)
            .field("log_json", &self.log_json)
            .field("compact", &self.compact)
            .field("command", &self.command)
            .finish()
    }
}

impl CliArgs {
    pub fn campus_code(&self, config: &ApiConfig) -> Result<String> {
        self.campus
            .clone()
            .or_else(|| config.default_campus_code.clone())
            .ok_or_else(|| StudentApiError::MissingConfigError {
                field: "CAMPUS_CODE (or --campus)".to_string(),
            })
    }

    pub fn authen(&self, config: &ApiConfig) -> String {
        self.authen
            .clone()
            .unwrap_or_else(|| config.authen_key.clone())
    }

    pub fn student(&self, config: &ApiConfig) -> Result<StudentRef> {
        let roll_number = self
            .roll
            .clone()
            .or_else(|| config.default_roll_number.clone())
            .ok_or_else(|| StudentApiError::MissingConfigError {
                field: "ROLL_NUMBER (or --roll)".to_string(),
            })?;
        Ok(StudentRef::new(
            self.campus_code(config)?,
            roll_number,
            self.authen(config),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(extra: &[(&str, &str)]) -> ApiConfig {
        let mut vars: HashMap<String, String> = [
            ("BASE_URL", "https://portal.example.edu"),
            ("AUTHEN_KEY", "env-token"),
            ("SECRET_KEY_MAIN", "m"),
            ("SECRET_KEY_ALT", "a"),
            ("SECRET_KEY_LONG", "l"),
            ("SUPER_SECRET_CODE", "c"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        ApiConfig::from_lookup(|k| vars.get(k).cloned()).unwrap()
    }

    #[test]
    fn test_parse_subcommand_with_globals() {
        let args = CliArgs::parse_from([
            "student-api",
            "marks",
            "Fall2024",
            "--campus",
            "APHL",
            "--roll",
            "SE1",
            "--compact",
        ]);
        assert!(args.compact);
        assert!(matches!(args.command, Command::Marks { ref semester } if semester == "Fall2024"));

        let student = args.student(&config(&[])).unwrap();
        assert_eq!(student.campus_code, "APHL");
        assert_eq!(student.roll_number, "SE1");
        assert_eq!(student.authen, "env-token");
    }

    #[test]
    fn test_student_falls_back_to_env_defaults() {
        let args = CliArgs::parse_from(["student-api", "balance", "--authen", "cli-token"]);
        let student = args
            .student(&config(&[("CAMPUS_CODE", "APHN"), ("ROLL_NUMBER", "HE2")]))
            .unwrap();
        assert_eq!(student.campus_code, "APHN");
        assert_eq!(student.roll_number, "HE2");
        assert_eq!(student.authen, "cli-token");
    }

    #[test]
    fn test_debug_redacts_authen() {
        let args = CliArgs::parse_from([
            "student-api",
            "balance",
            "--roll",
            "SE1",
            "--authen",
            "tok-SECRET-123",
        ]);
        let debug = format!("{:?}", args);
        assert!(!debug.contains("tok-SECRET-123"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("SE1"));
    }

    #[test]
    fn test_missing_roll_number() {
        let args = CliArgs::parse_from(["student-api", "student", "--campus", "APHL"]);
        assert!(matches!(
            args.student(&config(&[])),
            Err(StudentApiError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_snapshot_options() {
        let args = CliArgs::parse_from([
            "student-api",
            "snapshot",
            "Spring2025",
            "--output",
            "/tmp/out",
            "--concurrent-requests",
            "2",
        ]);
        match args.command {
            Command::Snapshot {
                semester,
                output,
                concurrent_requests,
            } => {
                assert_eq!(semester, "Spring2025");
                assert_eq!(output, Some(PathBuf::from("/tmp/out")));
                assert_eq!(concurrent_requests, Some(2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
