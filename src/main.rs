use clap::Parser;
use student_api::config::cli::{CliArgs, Command};
use student_api::utils::error::ErrorSeverity;
use student_api::utils::logger;
use student_api::{ApiConfig, ApiResponse, LocalStorage, Snapshot, StudentApiClient, StudentApiError};

/// Exit code for a request the server answered but did not accept.
const EXIT_UNSUCCESSFUL_RESPONSE: i32 = 4;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::debug!("CLI args: {:?}", args);

    let code = match run(&args).await {
        Ok(true) => 0,
        Ok(false) => EXIT_UNSUCCESSFUL_RESPONSE,
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            if let StudentApiError::HttpError(_) = e {
                print_json(&ApiResponse::from_error(e.to_string()), args.compact);
            }
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
    };

    std::process::exit(code);
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("❌ Could not render response: {}", e),
    }
}

/// Returns whether the server reported success.
async fn run(args: &CliArgs) -> student_api::Result<bool> {
    let config = ApiConfig::load(args.env_file.as_deref(), args.config.as_deref())?;
    let client = StudentApiClient::new(config.clone())?;

    let response = match &args.command {
        Command::Student => client.get_student_by_id(&args.student(&config)?).await?,
        Command::Rate => client.get_student_rate(&args.student(&config)?).await?,
        Command::AddRate {
            rate_id,
            rate_value,
            rate_comment,
        } => {
            let student = args.student(&config)?;
            client
                .add_rate(&student, rate_id, rate_value, rate_comment)
                .await?
        }
        Command::Balance => client.get_balance(&args.student(&config)?).await?,
        Command::Fee => client.get_fee_by_roll(&args.student(&config)?).await?,
        Command::Applications => client.get_application(&args.student(&config)?).await?,
        Command::Image => client.retrieve_image(&args.student(&config)?).await?,
        Command::ExtraPoints { semester } => {
            client
                .get_extra_points(&args.student(&config)?, semester)
                .await?
        }
        Command::Activities { semester } => {
            client
                .get_activity_student(&args.student(&config)?, semester)
                .await?
        }
        Command::WeeklyActivities {
            week,
            semester,
            year,
        } => {
            client
                .get_activity_student_by_week(&args.student(&config)?, week, semester, year)
                .await?
        }
        Command::Notifications => {
            client
                .get_notification_by_roll(&args.student(&config)?)
                .await?
        }
        Command::Campuses => client.get_all_active_campus().await?,
        Command::Version => client.get_version().await?,
        Command::CampusInfo => client.get_campus_info(&args.student(&config)?).await?,
        Command::FeedbackOpen => client.check_open_feedback(&args.student(&config)?).await?,
        Command::ProfileUpdate => client.check_update_profile(&args.student(&config)?).await?,
        Command::Survey { username } => client.get_required_survey(username).await?,
        Command::Semesters => {
            client
                .get_semester(&args.campus_code(&config)?, &args.authen(&config))
                .await?
        }
        Command::Subjects { semester } => {
            client
                .get_subject_by_semester(&args.campus_code(&config)?, semester, &args.authen(&config))
                .await?
        }
        Command::Week { date } => client.get_week_by_date(date).await?,
        Command::Attendance { semester } => {
            client
                .get_student_attendances(&args.student(&config)?, semester)
                .await?
        }
        Command::Exams { semester } => {
            client
                .get_exam_schedule(&args.student(&config)?, semester)
                .await?
        }
        Command::Marks { semester } => {
            client
                .get_student_mark(&args.student(&config)?, semester)
                .await?
        }
        Command::News { news_type } => {
            client
                .get_top10_news(&args.campus_code(&config)?, &args.authen(&config), news_type)
                .await?
        }
        Command::Snapshot {
            semester,
            output,
            concurrent_requests,
        } => {
            let student = args.student(&config)?;
            let output = output
                .clone()
                .unwrap_or_else(|| config.snapshot_path.clone().into());
            let mut snapshot = Snapshot::new(client, LocalStorage::new(output.clone()));
            if let Some(n) = concurrent_requests {
                snapshot = snapshot.with_concurrency(*n);
            }

            let report = snapshot.run(&student, semester).await?;
            print_json(&report, args.compact);
            tracing::info!("📁 Snapshot saved to: {}", output.display());
            return Ok(report.failed() == 0);
        }
    };

    print_json(&response, args.compact);
    Ok(response.success)
}
