mod analytics;
mod api_client;
mod auth;
mod config;
mod errors;
mod interviews;
mod job_posting;
mod models;
mod profile;
mod roles;
mod routes;
mod state;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::api_client::UploadFile;
use crate::config::Config;
use crate::errors::ApiError;
use crate::models::analytics::SessionFilters;
use crate::models::interview::{AnswerSubmission, NewSession};
use crate::models::profile::ProfileUpdate;
use crate::models::user::Registration;
use crate::profile::level::level_description;
use crate::routes::Navigation;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Command-line client for the interview practice API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Keep tokens in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the token pair
    Login { email: String, password: String },

    /// Create an account and sign in
    Register {
        email: String,
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        password2: Option<String>,
    },

    /// Sign out and forget the stored tokens
    Logout,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show the signed-in user
    Whoami,

    /// Show the signed-in user's profile
    Profile,

    /// Mark the extracted profile as confirmed
    Confirm,

    /// Detect the experience level from the profile
    Level,

    /// Describe a level key (junior, mid, senior)
    Describe { level: String },

    /// Upload a CV document
    UploadCv { path: PathBuf },

    /// Show a CV document
    Cv { id: Uuid },

    /// List catalog roles
    Roles {
        #[arg(long)]
        category: Option<String>,
    },

    /// Suggest roles for an uploaded CV
    Suggestions { cv_id: Uuid },

    /// Interview sessions
    Interview {
        #[command(subcommand)]
        action: InterviewCommand,
    },

    /// Practice analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommand,
    },

    /// Parse a job posting from a text file
    ParseJob { path: PathBuf },

    /// Check whether navigation to a client path is allowed
    Route { target: String },
}

#[derive(Subcommand)]
enum InterviewCommand {
    /// Start a session; the level defaults to the one detected from the profile
    Create {
        role_id: Uuid,
        /// hr, technical, case or mixed
        #[arg(long = "type", default_value = "technical")]
        interview_type: String,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        profile_id: Option<Uuid>,
        #[arg(long, default_value = "catalog")]
        role_source: String,
    },
    Show { id: Uuid },
    /// List questions and show the current one
    Questions {
        id: Uuid,
        /// Zero-based question to make current instead of the first unanswered
        #[arg(long)]
        at: Option<usize>,
    },
    Answer {
        id: Uuid,
        question_id: Uuid,
        text: String,
        #[arg(long, default_value_t = 0)]
        time_seconds: u32,
    },
    Finish { id: Uuid },
    Report { id: Uuid },
}

#[derive(Subcommand)]
enum AnalyticsCommand {
    Overview,
    Sessions {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long = "type")]
        interview_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::from_env()?;

    // Logs go to stderr so command output on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url.trim_end_matches('/').to_string();
    }

    info!("Client v{} using {}", env!("CARGO_PKG_VERSION"), config.api_base_url);
    let state = AppState::init(config, cli.ephemeral)?;

    match cli.command {
        Commands::Login { email, password } => {
            let mut store = state.auth_store();
            let response = store
                .login(&email, &password)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&response.user)
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            password2,
        } => {
            let registration = Registration {
                email,
                password2: password2.unwrap_or_else(|| password.clone()),
                password,
                first_name,
                last_name,
            };
            let mut store = state.auth_store();
            let response = store
                .register(&registration)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&response.user)
        }
        Commands::Logout => {
            state.auth_store().logout().await?;
            println!("Logged out");
            Ok(())
        }
        Commands::Refresh => {
            state
                .auth_store()
                .refresh_access_token()
                .await
                .map_err(|e| surface(e, None))?;
            println!("Access token refreshed");
            Ok(())
        }
        Commands::Whoami => {
            let store = state.auth_store();
            match store.user() {
                Some(user) => print_json(&user),
                None if store.is_authenticated() => {
                    println!("Signed in; the backend returned no user details at login");
                    Ok(())
                }
                None => {
                    println!("Not signed in");
                    Ok(())
                }
            }
        }
        Commands::Profile => {
            let mut store = state.profile_store();
            match store.fetch_profile().await {
                Ok(profile) => print_json(profile),
                Err(e) => Err(surface(e, store.error.as_deref())),
            }
        }
        Commands::Confirm => {
            let mut store = state.profile_store();
            let update = ProfileUpdate {
                data_json: None,
                confirmed: Some(true),
            };
            match store.update_profile(&update).await {
                Ok(profile) => print_json(profile),
                Err(e) => Err(surface(e, store.error.as_deref())),
            }
        }
        Commands::Level => {
            let mut store = state.profile_store();
            if let Err(e) = store.fetch_profile().await.map(|_| ()) {
                return Err(surface(e, store.error.as_deref()));
            }
            match store.detected_level() {
                Some(level) => println!("{level}: {}", level.description()),
                None => println!("Not enough experience data to detect a level"),
            }
            Ok(())
        }
        Commands::Describe { level } => {
            println!("{}", level_description(&level));
            Ok(())
        }
        Commands::UploadCv { path } => {
            let file = read_upload(&path)?;
            let mut store = state.profile_store();
            let document = store
                .upload_cv(file)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&document)
        }
        Commands::Cv { id } => {
            let mut store = state.profile_store();
            let document = store
                .fetch_cv_document(id)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&document)
        }
        Commands::Roles { category } => {
            let mut store = state.roles_store();
            match store.fetch_roles(category.as_deref()).await {
                Ok(roles) => print_json(&roles),
                Err(e) => Err(surface(e, store.error.as_deref())),
            }
        }
        Commands::Suggestions { cv_id } => {
            let mut store = state.roles_store();
            match store.fetch_suggestions(cv_id).await {
                Ok(suggestions) => print_json(&suggestions),
                Err(e) => Err(surface(e, store.error.as_deref())),
            }
        }
        Commands::Interview { action } => run_interview(&state, action).await,
        Commands::Analytics { action } => run_analytics(&state, action).await,
        Commands::ParseJob { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read job posting from {}", path.display()))?;
            let parsed = state
                .job_postings()
                .parse_job_posting(&text)
                .await
                .map_err(|e| surface(e, None))?;
            print_json(&parsed)
        }
        Commands::Route { target } => {
            if let Some(route) = routes::resolve(&target) {
                info!("{target} matches route {}", route.name);
            }
            match routes::guard(&target, state.session.is_authenticated()) {
                Navigation::Proceed => println!("proceed {target}"),
                Navigation::Redirect { to } => println!("redirect {to}"),
            }
            Ok(())
        }
    }
}

async fn run_interview(state: &AppState, action: InterviewCommand) -> Result<()> {
    let mut store = state.interview_store();
    match action {
        InterviewCommand::Create {
            role_id,
            interview_type,
            level,
            profile_id,
            role_source,
        } => {
            let level = match level {
                Some(level) => level,
                None => detect_level(state).await?,
            };
            let new_session = NewSession {
                role_id,
                level,
                interview_type,
                profile_id,
                role_source,
            };
            let session = store
                .create_session(&new_session)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&session)
        }
        InterviewCommand::Show { id } => {
            let session = store
                .fetch_session(id)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&session)
        }
        InterviewCommand::Questions { id, at } => {
            if let Err(e) = store.fetch_questions(id).await.map(|_| ()) {
                return Err(surface(e, store.error.as_deref()));
            }
            if let Some(index) = at {
                store.set_current_question_index(index);
            }
            print_json(&store.questions)?;
            if let Some(question) = store.current_question() {
                eprintln!(
                    "Current question {} of {}: {}",
                    store.current_question_index + 1,
                    store.questions.len(),
                    question.question_text
                );
            }
            Ok(())
        }
        InterviewCommand::Answer {
            id,
            question_id,
            text,
            time_seconds,
        } => {
            let submission = AnswerSubmission {
                question_id,
                answer_text: text,
                time_seconds,
            };
            let answer = store
                .submit_answer(id, &submission)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&answer)
        }
        InterviewCommand::Finish { id } => {
            let session = store
                .finish_session(id)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&session)
        }
        InterviewCommand::Report { id } => {
            let report = store
                .fetch_report(id)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&report)
        }
    }
}

async fn run_analytics(state: &AppState, action: AnalyticsCommand) -> Result<()> {
    let mut store = state.analytics_store();
    match action {
        AnalyticsCommand::Overview => {
            let overview = store
                .fetch_overview()
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&overview)
        }
        AnalyticsCommand::Sessions {
            limit,
            offset,
            interview_type,
        } => {
            let filters = SessionFilters {
                limit,
                offset,
                interview_type,
            };
            let page = store
                .fetch_sessions(&filters)
                .await
                .map_err(|e| surface(e, store.error.as_deref()))?;
            print_json(&page)
        }
    }
}

/// Level for a new interview, taken from the profile when the user gave none.
async fn detect_level(state: &AppState) -> Result<String> {
    let mut store = state.profile_store();
    if let Err(e) = store.fetch_profile().await.map(|_| ()) {
        return Err(surface(e, store.error.as_deref()));
    }
    let level = store
        .detected_level()
        .context("Could not detect a level from the profile; pass --level")?;
    info!("Using detected level {level}");
    Ok(level.to_string())
}

fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read CV from {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("cv")
        .to_string();
    let mime_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        Some(ext) if ext.eq_ignore_ascii_case("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some(ext) if ext.eq_ignore_ascii_case("doc") => "application/msword",
        Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain",
        _ => "application/octet-stream",
    };
    Ok(UploadFile {
        file_name,
        mime_type: mime_type.to_string(),
        bytes: Bytes::from(bytes),
    })
}

/// Turns a client error into the message shown to the user.
/// Expired sessions point back at the login surface.
fn surface(e: ApiError, store_message: Option<&str>) -> anyhow::Error {
    if e.requires_login() {
        return anyhow!(
            "{e}. Sign in again with `client login` (route {})",
            routes::LOGIN_PATH
        );
    }
    let message = match store_message {
        Some(message) => message.to_string(),
        None => e.display_message("Request failed"),
    };
    // Body-less API errors already name their status in the raw message.
    match e.status() {
        Some(status) if store_message.is_some() || e.body().is_some() => {
            anyhow!("{message} (HTTP {status})")
        }
        _ => anyhow!("{message}"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_surface_appends_status_to_store_message() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, Some(json!({"error": "Profile not found"})));
        assert_eq!(
            surface(err, Some("Profile not found")).to_string(),
            "Profile not found (HTTP 404)"
        );

        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(
            surface(err, Some("Failed to fetch roles")).to_string(),
            "Failed to fetch roles (HTTP 500)"
        );
    }

    #[test]
    fn test_surface_without_store_message() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, Some(json!({"detail": "Bad input"})));
        assert_eq!(surface(err, None).to_string(), "Bad input (HTTP 400)");

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, None);
        assert_eq!(surface(err, None).to_string(), "API error (status 502)");

        let err = ApiError::network("connection refused", "http://api.test");
        assert!(surface(err, None).to_string().starts_with("Network Error"));
    }

    #[test]
    fn test_surface_points_expired_sessions_at_login() {
        let err = ApiError::SessionExpired(Box::new(ApiError::MissingRefreshToken));
        let message = surface(err, Some("ignored")).to_string();
        assert!(message.contains("client login"));
        assert!(message.contains(routes::LOGIN_PATH));
    }
}
