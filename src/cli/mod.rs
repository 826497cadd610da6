pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dsctl")]
#[command(about = "dsctl - operational CLI for the driving school API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve,

    #[command(about = "Create the database, schema and seed data")]
    Init {
        #[arg(long, help = "Create schema only, skip seed rows")]
        skip_seed: bool,
    },

    #[command(about = "Create or update the admin user")]
    AddAdmin {
        #[arg(long, default_value = "admin")]
        username: String,

        #[arg(long, default_value = "admin@drivingschool.com")]
        email: String,

        #[arg(long)]
        password: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => commands::serve::handle().await,
        Commands::Init { skip_seed } => commands::init::handle(skip_seed).await,
        Commands::AddAdmin {
            username,
            email,
            password,
        } => commands::admin::handle(&username, &email, &password).await,
    }
}
