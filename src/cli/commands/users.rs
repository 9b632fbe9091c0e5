use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;
use crate::services::user_service;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Add {
        username: String,
        nickname: String,
        email: String,
        #[arg(long, help = "Password; prompted for interactively if omitted")]
        password: Option<String>,
    },

    #[command(about = "List all users")]
    List,

    #[command(about = "Reset a user's password")]
    SetPassword {
        username: String,
        password: String,
    },

    #[command(about = "Change a user's nickname")]
    SetNickname {
        username: String,
        nickname: String,
    },

    #[command(about = "Reactivate an account")]
    Activate { username: String },

    #[command(about = "Deactivate an account without deleting it")]
    Deactivate { username: String },

    #[command(about = "Delete a user account")]
    Delete {
        username: String,
        #[arg(long, help = "Also delete the user's likes, comments, ticks and projects")]
        force: bool,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    match cmd {
        UserCommands::Add { username, nickname, email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password: ")?,
            };
            let user =
                user_service::register(&pool, &username, &nickname, &email, &password).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                OutputFormat::Text => {
                    println!("Created user {} (id {})", user.username, user.id)
                }
            }
        }
        UserCommands::List => {
            let users = user_service::list(&pool).await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?)
                }
                OutputFormat::Text => {
                    println!("{:<6} {:<20} {:<20} {:<30} {}", "ID", "USERNAME", "NICKNAME", "EMAIL", "ACTIVE");
                    println!("{}", "-".repeat(84));
                    for u in users {
                        println!(
                            "{:<6} {:<20} {:<20} {:<30} {}",
                            u.id, u.username, u.nickname, u.email, u.is_active
                        );
                    }
                }
            }
        }
        UserCommands::SetPassword { username, password } => {
            let user = user_service::get_by_username(&pool, &username).await?;
            user_service::set_password(&pool, user.id, &password).await?;
            println!("Password updated for {}", username);
        }
        UserCommands::SetNickname { username, nickname } => {
            let user = user_service::get_by_username(&pool, &username).await?;
            let user = user_service::set_nickname(&pool, user.id, &nickname).await?;
            println!("Nickname for {} is now {}", user.username, user.nickname);
        }
        UserCommands::Activate { username } => {
            let user = user_service::get_by_username(&pool, &username).await?;
            user_service::set_active(&pool, user.id, true).await?;
            println!("Activated {}", username);
        }
        UserCommands::Deactivate { username } => {
            let user = user_service::get_by_username(&pool, &username).await?;
            user_service::set_active(&pool, user.id, false).await?;
            println!("Deactivated {}", username);
        }
        UserCommands::Delete { username, force } => {
            let user = user_service::get_by_username(&pool, &username).await?;
            user_service::delete(&pool, user.id, force).await?;
            println!("Deleted {}", username);
        }
    }

    Ok(())
}

fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::Write;

    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password cannot be empty");
    }
    Ok(password)
}
