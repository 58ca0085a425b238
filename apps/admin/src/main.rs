use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    render::{render_admin_page, render_club_listing},
    BodAdminPage, BodField, ClubDataService, ClubListing, HttpDataService, SubmitOutcome,
    ValidationMode,
};
use shared::domain::{Bod, BodId};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Manage club BODs against a running club server")]
struct Cli {
    #[arg(long, env = "CLUB_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[arg(long, default_value_t = ValidationMode::Required)]
    validation: ValidationMode,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every BOD.
    List,
    /// Submit the create form.
    Add(BodFieldArgs),
    /// Submit the edit form for an existing BOD.
    Edit {
        bod_id: i64,
        #[command(flatten)]
        fields: BodFieldArgs,
    },
    /// Print every club.
    Clubs,
    /// Print the BOD management page as HTML.
    RenderAdmin {
        /// Render with the create form open.
        #[arg(long, conflicts_with = "edit")]
        open_create: bool,
        /// Render with the edit form open for this BOD.
        #[arg(long)]
        edit: Option<i64>,
    },
    /// Print the student club listing as HTML.
    RenderClubs,
}

#[derive(Args, Debug, Default)]
struct BodFieldArgs {
    /// Requested id; ignored when editing.
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    phone_no: Option<String>,
    #[arg(long)]
    branch: Option<String>,
    #[arg(long)]
    usn: Option<String>,
    #[arg(long)]
    club_id: Option<String>,
}

impl BodFieldArgs {
    fn provided(&self) -> Vec<(BodField, &str)> {
        [
            (BodField::Id, &self.id),
            (BodField::FirstName, &self.first_name),
            (BodField::LastName, &self.last_name),
            (BodField::Email, &self.email),
            (BodField::Password, &self.password),
            (BodField::PhoneNo, &self.phone_no),
            (BodField::Branch, &self.branch),
            (BodField::Usn, &self.usn),
            (BodField::ClubId, &self.club_id),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let service: Arc<dyn ClubDataService> = Arc::new(HttpDataService::new(&cli.server_url)?);
    info!(server_url = %cli.server_url, validation = %cli.validation, "admin client starting");

    match cli.command {
        Command::List => {
            let mut page = BodAdminPage::new(service, cli.validation);
            if !page.refresh().await {
                bail!("could not fetch BODs from {}", cli.server_url);
            }
            print_bods(page.bods());
        }
        Command::Add(fields) => {
            let mut page = BodAdminPage::new(service, cli.validation);
            page.mount().await;
            page.open_create();
            for (field, value) in fields.provided() {
                page.set_field(field, value)?;
            }
            finish_submit(&mut page).await?;
        }
        Command::Edit { bod_id, fields } => {
            let mut page = BodAdminPage::new(service, cli.validation);
            page.mount().await;
            page.open_edit_by_id(BodId(bod_id))?;
            for (field, value) in fields.provided() {
                if field == BodField::Id {
                    continue;
                }
                page.set_field(field, value)?;
            }
            finish_submit(&mut page).await?;
        }
        Command::Clubs => {
            let mut listing = ClubListing::new(service);
            if !listing.load().await {
                bail!("could not fetch clubs from {}", cli.server_url);
            }
            for club in listing.clubs() {
                println!("{}\t{}\t{}", club.id, club.name, club.tagline);
            }
        }
        Command::RenderAdmin { open_create, edit } => {
            let mut page = BodAdminPage::new(service, cli.validation);
            page.mount().await;
            if open_create {
                page.open_create();
            } else if let Some(bod_id) = edit {
                page.open_edit_by_id(BodId(bod_id))?;
            }
            print!("{}", render_admin_page(&page.view()));
        }
        Command::RenderClubs => {
            let mut listing = ClubListing::new(service);
            listing.load().await;
            print!("{}", render_club_listing(listing.clubs()));
        }
    }

    Ok(())
}

async fn finish_submit(page: &mut BodAdminPage) -> Result<()> {
    let outcome = page.submit().await;
    println!("{}", page.message());
    match outcome {
        SubmitOutcome::Created(bod) | SubmitOutcome::Updated(bod) => {
            print_bods(std::slice::from_ref(&bod));
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => bail!("form rejected: {}", errors.join(", ")),
        SubmitOutcome::Failed => bail!("server rejected the form"),
        SubmitOutcome::NotOpen => bail!("no form is open"),
    }
}

fn print_bods(bods: &[Bod]) {
    println!("ID\tFirst Name\tLast Name\tEmail\tPhone No\tBranch\tUSN\tClub ID");
    for bod in bods {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            bod.id,
            bod.first_name,
            bod.last_name,
            bod.email,
            bod.phone_no,
            bod.branch,
            bod.usn,
            bod.club_id
        );
    }
}
