use anyhow::Result;
use clap::{Parser, Subcommand};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/clubs.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    CreateClub {
        name: String,
        tagline: String,
        #[arg(long)]
        logo_url: Option<String>,
    },
    ListClubs,
    ListBods,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::CreateClub {
            name,
            tagline,
            logo_url,
        } => {
            let club = storage
                .create_club(&name, &tagline, logo_url.as_deref())
                .await?;
            println!("created club_id={}", club.id);
        }
        Command::ListClubs => {
            for club in storage.list_clubs().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    club.id,
                    club.name,
                    club.tagline,
                    club.logo_url.as_deref().unwrap_or("-")
                );
            }
        }
        Command::ListBods => {
            for bod in storage.list_bods().await? {
                println!(
                    "{}\t{} {}\t{}\t{}\tclub={}",
                    bod.id, bod.first_name, bod.last_name, bod.email, bod.usn, bod.club_id
                );
            }
        }
    }

    Ok(())
}
