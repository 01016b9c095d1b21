use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use market_brief::{
    run_welcome, BatchRunner, DigestBuilder, DigestConfig, DigestMailer, FinnhubClient,
    GeminiGenerator, GeneratorConfig, ProviderConfig, RecipientProfile, SmtpConfig, SmtpMailer,
    StaticDirectory, Summarizer, WelcomeDetails,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "market-brief", about = "Personalized daily market briefings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build, summarize, and send the daily briefing to every eligible recipient
    Daily {
        /// JSON file with recipients and their watchlists
        #[arg(long)]
        users: PathBuf,
    },
    /// Send the personalized welcome email to a single new user
    Welcome {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long = "goals", default_value = "")]
        investment_goals: String,
        #[arg(long = "risk", default_value = "")]
        risk_tolerance: String,
        #[arg(long = "industry", default_value = "")]
        preferred_industry: String,
    },
}

fn env_or_default(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let provider_config = ProviderConfig {
        token: env_or_default("FINNHUB_API_KEY"),
        ..Default::default()
    };
    let generator_config = GeneratorConfig {
        api_key: env_or_default("GEMINI_API_KEY"),
        ..Default::default()
    };
    let smtp_defaults = SmtpConfig::default();
    let smtp_config = SmtpConfig {
        host: env::var("SMTP_HOST").unwrap_or(smtp_defaults.host),
        username: env_or_default("SMTP_USERNAME"),
        password: env_or_default("SMTP_PASSWORD"),
        from_name: env::var("SMTP_FROM_NAME").unwrap_or(smtp_defaults.from_name),
        from_address: env::var("SMTP_FROM_ADDRESS").unwrap_or(smtp_defaults.from_address),
        timeout_seconds: smtp_defaults.timeout_seconds,
    };

    let generator =
        Arc::new(GeminiGenerator::new(generator_config).context("text generator configuration")?);
    let summarizer = Arc::new(Summarizer::new(generator));
    let delivery = Arc::new(SmtpMailer::new(smtp_config).context("SMTP configuration")?);
    let mailer = Arc::new(DigestMailer::new(delivery));

    match cli.command {
        Command::Daily { users } => {
            let source =
                Arc::new(FinnhubClient::new(provider_config).context("news provider configuration")?);
            let directory = Arc::new(
                StaticDirectory::from_path(&users)
                    .with_context(|| format!("reading user directory {}", users.display()))?,
            );
            let builder = Arc::new(DigestBuilder::new(source, DigestConfig::default()));
            let runner = BatchRunner::new(
                directory.clone(),
                directory,
                builder,
                summarizer,
                mailer,
            );

            let summary = runner.run_daily().await;
            info!("{}", summary.message);
            if !summary.success {
                bail!(summary.message);
            }
        }
        Command::Welcome {
            email,
            name,
            country,
            investment_goals,
            risk_tolerance,
            preferred_industry,
        } => {
            let profile = RecipientProfile {
                id: String::new(),
                email,
                name,
            };
            let details = WelcomeDetails {
                country,
                investment_goals,
                risk_tolerance,
                preferred_industry,
            };

            let summary = run_welcome(&summarizer, &mailer, &profile, &details).await;
            info!("{}", summary.message);
            if !summary.success {
                bail!(summary.message);
            }
        }
    }

    Ok(())
}
