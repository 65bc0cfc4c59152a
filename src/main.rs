use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;

use prepmate_lib::auth::{AuthContext, AuthError, AuthGateway, AuthService, LoginRequest, SignupRequest, UserDetails};
use prepmate_lib::interview::{ExperienceLevel, InterviewForm, InterviewSession, RetryOutcome, QUESTIONS_PER_BATCH};
use prepmate_lib::{env, gemini_generator, FileStore, PrepApp, SessionStore, Settings};

/// PrepMate - AI-generated interview preparation sessions
#[derive(Parser, Debug)]
#[command(name = "prepmate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./prepmate.toml when present)
    #[arg(long, global = true, env = "PREPMATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored access token
    Logout,
    /// Verify the stored access token and show the signed-in user
    Whoami,
    /// Generate a new interview session
    Generate {
        #[arg(long)]
        role: String,
        /// One of 0-1, 2-3, 4-6, 7-10, 10+
        #[arg(long)]
        experience: ExperienceLevel,
        #[arg(long)]
        topics: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List sessions, pinned first
    List,
    /// Show every question and answer in a session
    Show { id: String },
    /// Pin or unpin a session
    Pin { id: String },
    /// Delete a session
    Delete { id: String },
    /// Generate another batch of questions for a session
    More { id: String },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    env::log_environment_status();

    let storage = FileStore::open(&settings.data_dir)
        .with_context(|| format!("Failed to open data directory {}", settings.data_dir.display()))?;

    match cli.command {
        Command::Signup { name, email, password } => {
            let auth = auth_service(&settings, &storage)?;
            let user = report_auth(auth.signup(SignupRequest { name, email, password }).await)?;
            println!("✅ Account created successfully!");
            print_user(user.as_ref());
        }
        Command::Login { email, password } => {
            let auth = auth_service(&settings, &storage)?;
            let user = report_auth(auth.login(LoginRequest { account: email, password }).await)?;
            println!("✅ Login successful!");
            print_user(user.as_ref());
        }
        Command::Logout => {
            auth_service(&settings, &storage)?.logout();
            println!("👋 Logged out");
        }
        Command::Whoami => match auth_service(&settings, &storage)?.verify().await? {
            Some(user) => print_user(Some(&user)),
            None => println!("🔒 Not signed in. Run `prepmate login` first."),
        },
        Command::Generate {
            role,
            experience,
            topics,
            description,
        } => {
            let app = PrepApp::new(gemini_generator(&settings)?, SessionStore::open(&storage));
            let form = InterviewForm {
                target_role: role,
                years_of_experience: experience,
                topics_to_focus: topics,
                description,
            };
            let outcome = app.create_session(&form).await?;
            report_outcome(&outcome);
            print_session(outcome.value());
        }
        Command::List => {
            let store = SessionStore::open(&storage);
            if store.sessions().is_empty() {
                println!("No interview sessions yet. Run `prepmate generate` to get started!");
            }
            for session in store.sessions() {
                println!(
                    "{} {:<45} {:<28} {:<6} {:>3} questions  {}",
                    if session.pinned { "📌" } else { "  " },
                    session.id,
                    session.target_role.chars().take(26).collect::<String>(),
                    session.years_of_experience,
                    session.questions.len(),
                    session.created_at.format("%b %-d, %Y")
                );
            }
        }
        Command::Show { id } => {
            let store = SessionStore::open(&storage);
            let session = store
                .get(&id)
                .with_context(|| format!("Session not found: {}", id))?;
            print_session(session);
        }
        Command::Pin { id } => match SessionStore::open(&storage).toggle_pin(&id) {
            Some(true) => println!("📌 Pinned {}", id),
            Some(false) => println!("Unpinned {}", id),
            None => anyhow::bail!("Session not found: {}", id),
        },
        Command::Delete { id } => {
            if SessionStore::open(&storage).delete(&id) {
                println!("🗑️ Deleted {}", id);
            } else {
                anyhow::bail!("Session not found: {}", id);
            }
        }
        Command::More { id } => {
            let app = PrepApp::new(gemini_generator(&settings)?, SessionStore::open(&storage));
            let outcome = app.load_more(&id).await?;
            report_outcome(&outcome);
            println!(
                "✅ More questions loaded! {} now has {} questions.",
                id,
                outcome.value().questions.len()
            );
        }
    }

    Ok(())
}

fn auth_service<'a>(settings: &Settings, storage: &'a FileStore) -> Result<AuthService<AuthGateway, &'a FileStore>> {
    let gateway = AuthGateway::new(&settings.auth_api_url)?;
    Ok(AuthService::new(gateway, storage, AuthContext::new()))
}

/// Prints per-field messages the way the sign-in forms show them.
fn report_auth<T>(result: Result<T, AuthError>) -> Result<T> {
    result.map_err(|e| {
        for (field, message) in e.field_errors() {
            eprintln!("  {}: {}", field, message);
        }
        anyhow::Error::new(e)
    })
}

fn report_outcome(outcome: &RetryOutcome<InterviewSession>) {
    if outcome.is_fallback() {
        println!(
            "⚠️ The AI service did not return usable questions after {} attempts; showing a standard question set.",
            outcome.attempts()
        );
    }
}

fn print_user(user: Option<&UserDetails>) {
    match user {
        Some(user) => println!("👤 {} [{}] <{}>", user.display_name(), user.initials(), user.email),
        None => println!("👤 (no user details returned)"),
    }
}

fn print_session(session: &InterviewSession) {
    println!("\n{} Interview Questions", session.target_role);
    println!(
        "Experience: {}  Topics: {}  Generated: {}",
        session.years_of_experience,
        session.topics_to_focus,
        session.created_at.format("%b %-d, %Y")
    );
    println!("ID: {}", session.id);
    println!("{:-<80}", "");

    if session.questions.is_empty() {
        println!("No questions available.");
    } else if let Some(warning) = question_count_warning(session) {
        println!("⚠️ {}", warning);
    }
    for (index, question) in session.questions.iter().enumerate() {
        println!("\nQ{}. [{}] {}", index + 1, question.category, question.question);
        println!("{}", question.answer);
    }
}

/// A stored session short of a full batch gets flagged on the session page.
fn question_count_warning(session: &InterviewSession) -> Option<String> {
    let found = session.questions.len();
    (found > 0 && found < QUESTIONS_PER_BATCH).then(|| {
        format!(
            "Warning: Expected {} questions, but only {} found.",
            QUESTIONS_PER_BATCH, found
        )
    })
}
