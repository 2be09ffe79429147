// MIT License - free as in freedom; Full license in the LICENSE file
use clap::{Parser, Subcommand};
use smokebench::{
    client::ApiClient,
    configuration::Configuration,
    session::{run_session, SessionPlan},
    SmokebenchError,
};
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about = "Smoke test the local article service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Location of a YAML configuration file [default: built-in settings]
    configuration: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with the configured credentials and post console lines as articles (default)
    Session,
    /// Log in with the configured credentials
    Login,
    /// End the current session
    Logout,
    /// Look up a meter setting result
    SurveyResult { accept_no: String },
    /// Fetch one article by category and id
    Article { category: String, id: String },
    /// Post one article under an existing session
    Post { session_id: String, content: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    smokebench::init_tracing();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.reason);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SmokebenchError> {
    let config = Configuration::load(cli.configuration.as_deref())?;
    let mut client = ApiClient::new(&config)?;
    match cli.command.unwrap_or(Command::Session) {
        Command::Session => {
            let stdin = std::io::stdin();
            run_session(&mut client, &SessionPlan::from(&config), stdin.lock())?;
        }
        Command::Login => {
            client.login(&config.username, &config.password)?;
        }
        Command::Logout => {
            client.logout()?;
        }
        Command::SurveyResult { accept_no } => {
            client.get_survey_result(&accept_no)?;
        }
        Command::Article { category, id } => {
            client.get_article(&category, &id)?;
        }
        Command::Post { session_id, content } => {
            client.post_article(&session_id, &content)?;
        }
    }
    Ok(())
}
