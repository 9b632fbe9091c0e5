use clap::Subcommand;

use crate::database::manager::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema and reference-data migrations")]
    Migrate,
}

pub async fn handle(cmd: DbCommands) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            DatabaseManager::migrate().await?;
            println!("Migrations applied");
            Ok(())
        }
    }
}
