//! Farmer KYC Platform - command-line client
//!
//! Signs farmers and NGOs in, submits KYC applications and lists donations
//! against the platform backend.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmer_kyc_client::{
    BackendClient, Config, DonationFeed, FileStore, LoginInput, RegistrationWizard, SessionStore,
};
use shared::{DocumentFile, DocumentKey, Identity, RegistrationDraft, SessionKind};

#[derive(Parser)]
#[command(name = "kyc-client", version, about = "Farmer KYC platform client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show who is signed in
    Status,
    /// Sign in as a farmer or an NGO
    Login {
        #[arg(value_enum)]
        kind: KindArg,
        /// Phone/KYC id for farmers, email for NGOs
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Refresh the signed-in NGO's profile
    Profile,
    /// Submit a KYC application from a JSON draft
    Register {
        #[arg(long)]
        draft: PathBuf,
        /// Attach a document, e.g. `aadhar=./aadhar.pdf`
        #[arg(long = "document", value_parser = parse_document)]
        documents: Vec<(DocumentKey, PathBuf)>,
    },
    /// Donation feeds
    Donations {
        #[command(subcommand)]
        command: DonationCommand,
    },
}

#[derive(Subcommand)]
enum DonationCommand {
    /// Latest donations on the platform
    Recent {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Donations received by one farmer
    History {
        recipient_id: String,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Farmer,
    Ngo,
}

impl From<KindArg> for SessionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Farmer => SessionKind::Farmer,
            KindArg::Ngo => SessionKind::Ngo,
        }
    }
}

fn parse_document(raw: &str) -> Result<(DocumentKey, PathBuf), String> {
    let (key, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=path, got '{}'", raw))?;
    let key: DocumentKey = key.parse().map_err(|e: shared::ChoiceError| e.to_string())?;
    Ok((key, PathBuf::from(path)))
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

fn read_document(path: &Path) -> anyhow::Result<DocumentFile> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();
    Ok(DocumentFile::new(file_name, content_type(path), data))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kyc_client=info,farmer_kyc_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::debug!(environment = %config.environment, base_url = %config.api.base_url, "Configuration loaded");

    let cli = Cli::parse();
    let api = BackendClient::new(&config.api)?;
    let session = SessionStore::initialize(FileStore::new(&config.storage.path));

    match cli.command {
        Command::Status => match session.identity() {
            Some(Identity::Farmer(farmer)) => {
                println!("Signed in as farmer {} ({})", farmer.name, farmer.id)
            }
            Some(Identity::Ngo(ngo)) => {
                let verified = if ngo.is_verified { "verified" } else { "unverified" };
                println!("Signed in as NGO {} ({}, {})", ngo.ngo_name, ngo.id, verified)
            }
            None => println!("Not signed in"),
        },
        Command::Login {
            kind,
            identifier,
            password,
        } => {
            let input = LoginInput::Credentials {
                kind: kind.into(),
                identifier,
                password,
            };
            session.login(input, &api).await?;
            if let Some(identity) = session.identity() {
                println!("Welcome, {}", identity.display_name());
            }
        }
        Command::Logout => {
            session.logout();
            println!("Signed out");
        }
        Command::Profile => {
            let ngo = session.refresh_ngo_profile(&api).await?;
            println!("{}", serde_json::to_string_pretty(&ngo)?);
        }
        Command::Register { draft, documents } => {
            let raw = std::fs::read_to_string(&draft)
                .with_context(|| format!("reading {}", draft.display()))?;
            let draft: RegistrationDraft = serde_json::from_str(&raw).context("parsing draft")?;

            let wizard = RegistrationWizard::with_draft(draft);
            for (key, path) in &documents {
                wizard.set_document(*key, Some(read_document(path)?));
            }
            for key in wizard.draft().missing_required_documents() {
                eprintln!("note: required document '{}' not attached", key);
            }
            while wizard.step() != shared::WizardStep::Review {
                wizard.next();
            }

            let receipt = wizard.submit(&api).await?;
            println!(
                "Application {} submitted. Review usually takes {}.",
                receipt.application_id, receipt.review_window
            );
        }
        Command::Donations { command } => {
            let feed = DonationFeed::new(&api, config.donations.default_limit);
            match command {
                DonationCommand::Recent { limit } => {
                    for donation in feed.recent(limit).await? {
                        println!(
                            "{}  {:>10}  {} -> {}",
                            donation.created_at.format("%Y-%m-%d"),
                            donation.amount.to_string(),
                            donation.donor_name,
                            donation.recipient_name
                        );
                    }
                }
                DonationCommand::History {
                    recipient_id,
                    limit,
                } => {
                    let history = feed.history(&recipient_id, limit).await?;
                    println!(
                        "{} donations from {} donors, total {}",
                        history.stats.total_donations,
                        history.stats.unique_donors,
                        history.stats.total_amount
                    );
                    for donation in &history.donations {
                        println!(
                            "{}  {:>10}  {}",
                            donation.created_at.format("%Y-%m-%d"),
                            donation.amount.to_string(),
                            donation.donor_name
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
