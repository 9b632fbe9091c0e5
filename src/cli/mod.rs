pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "crux")]
#[command(about = "Crux CLI - gym administration for the Crux climbing backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "User account management")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "Route catalog management")]
    Routes {
        #[command(subcommand)]
        cmd: commands::routes::RouteCommands,
    },

    #[command(about = "Grade scale reference")]
    Grades {
        #[command(subcommand)]
        cmd: commands::reference::GradeCommands,
    },

    #[command(about = "Hold color reference")]
    Colors {
        #[command(subcommand)]
        cmd: commands::reference::ColorCommands,
    },

    #[command(about = "Database maintenance")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Users { cmd } => commands::users::handle(cmd, output_format).await,
        Commands::Routes { cmd } => commands::routes::handle(cmd, output_format).await,
        Commands::Grades { cmd } => commands::reference::handle_grades(cmd, output_format).await,
        Commands::Colors { cmd } => commands::reference::handle_colors(cmd, output_format).await,
        Commands::Db { cmd } => commands::db::handle(cmd).await,
    }
}
