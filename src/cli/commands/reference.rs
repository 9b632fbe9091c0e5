use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;
use crate::services::reference_service;

#[derive(Subcommand)]
pub enum GradeCommands {
    #[command(about = "List the grade scale")]
    List,
}

#[derive(Subcommand)]
pub enum ColorCommands {
    #[command(about = "List available hold colors")]
    List,
}

pub async fn handle_grades(cmd: GradeCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    match cmd {
        GradeCommands::List => {
            let grades = reference_service::grade_definitions(&pool).await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "grades": grades }))?)
                }
                OutputFormat::Text => {
                    println!("{:<8} {:<8} {}", "GRADE", "ORDER", "COLOR");
                    println!("{}", "-".repeat(26));
                    for g in grades {
                        println!("{:<8} {:<8} {}", g.grade, g.difficulty_order, g.color);
                    }
                }
            }
        }
    }

    Ok(())
}

pub async fn handle_colors(cmd: ColorCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    match cmd {
        ColorCommands::List => {
            let colors = reference_service::hold_colors(&pool).await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "hold_colors": colors }))?)
                }
                OutputFormat::Text => {
                    println!("{:<15} {}", "NAME", "HEX");
                    println!("{}", "-".repeat(23));
                    for c in colors {
                        println!("{:<15} {}", c.name, c.hex_code);
                    }
                }
            }
        }
    }

    Ok(())
}
