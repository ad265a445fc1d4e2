use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use mail_agent::app::{App, BodySource, SendRequest};
use mail_agent::utils::config_loader;
use mail_agent::utils::logging;
use mail_agent::utils::logging::LogLevel;
use tracing::error;

const EXIT_SEND_FAILED: u8 = 1;
const EXIT_HEALTH_CHECK_FAILED: u8 = 2;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "MAIL_AGENT_CONFIG", default_value = "config.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Only check that a valid access token can be obtained; send nothing
    #[arg(long = "oauth-check", alias = "OAuthcheck")]
    oauth_check: bool,
    /// Recipient address
    #[arg(short, long)]
    to: Option<String>,
    #[arg(short, long)]
    subject: Option<String>,
    /// Body text
    #[arg(short, long, conflicts_with = "file")]
    body: Option<String>,
    /// Template file name inside paths.template_dir (sent as HTML)
    #[arg(short, long)]
    file: Option<String>,
    /// Send the body as HTML
    #[arg(long)]
    html: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // -------------------------------
    // 1. Load config, fail fast
    // -------------------------------

    let service_config = match config_loader::run(&args.config).await {
        Ok(config) => config,
        Err(err) => {
            eprintln!("CRITICAL: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    logging::run(&service_config, args.log_level);

    let app = match App::new(service_config) {
        Ok(app) => app,
        Err(err) => {
            error!("cannot initialize: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    // -------------------------------
    // 2. Secret expiry self-check, before anything else
    // -------------------------------

    app.self_check().await;

    // -------------------------------
    // 3. OAuth health check mode
    // -------------------------------

    if args.oauth_check {
        println!("== OAuth Health Check ==");
        return match app.health_check().await {
            Ok(report) => {
                println!("✔ Access token refresh: OK (expires at {})", report.token_expires_at);
                if let Some(days_left) = report.secret_days_left {
                    println!("  Client secret expires in {} day(s)", days_left);
                }
                println!("✔ OAuth status OK");
                ExitCode::SUCCESS
            }
            Err(err) => {
                println!("✖ OAuth health check failed: {}", err);
                ExitCode::from(EXIT_HEALTH_CHECK_FAILED)
            }
        };
    }

    // -------------------------------
    // 4. Send mode
    // -------------------------------

    let request = send_request(args);
    let mail = match app.compose(request).await {
        Ok(mail) => mail,
        Err(err) => {
            error!("{:#}", err);
            return ExitCode::from(EXIT_SEND_FAILED);
        }
    };

    match app.send(&mail).await {
        Ok(()) => {
            println!("SUCCESS: mail sent to {}", mail.to);
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("FAIL: {}", err);
            ExitCode::from(EXIT_SEND_FAILED)
        }
    }
}

/// Send mode needs recipient, subject and exactly one body source;
/// anything less is a usage error.
fn send_request(args: Args) -> SendRequest {
    let (Some(to), Some(subject)) = (args.to, args.subject) else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following arguments are required: --to <TO>, --subject <SUBJECT>",
            )
            .exit();
    };
    let body = match (args.body, args.file) {
        (Some(text), _) => BodySource::Text(text),
        (None, Some(name)) => BodySource::Template(name),
        (None, None) => Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "one of the arguments --body <BODY> --file <FILE> is required",
            )
            .exit(),
    };
    SendRequest { to, subject, body, html: args.html }
}
