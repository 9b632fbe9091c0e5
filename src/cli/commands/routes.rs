use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;
use crate::database::models::route::{NewRoute, RoutePatch};
use crate::services::route_service::{self, RouteFilters};

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "Create a route")]
    Add {
        name: String,
        #[arg(long, help = "Grade code, e.g. 6a+")]
        grade: String,
        #[arg(long)]
        route_setter: String,
        #[arg(long)]
        wall_section: String,
        #[arg(long, help = "Lane number")]
        lane: i32,
        #[arg(long, help = "Hold color name")]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "List routes, optionally filtered")]
    List {
        #[arg(long)]
        wall_section: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        lane: Option<i32>,
    },

    #[command(about = "Update route fields; natural keys resolved like add")]
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        route_setter: Option<String>,
        #[arg(long)]
        wall_section: Option<String>,
        #[arg(long)]
        lane: Option<i32>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Clear the hold color")]
        clear_color: bool,
        #[arg(long, help = "Clear the description")]
        clear_description: bool,
    },

    #[command(about = "Delete a route and all engagement rows on it")]
    Delete { id: i64 },
}

pub async fn handle(cmd: RouteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    match cmd {
        RouteCommands::Add { name, grade, route_setter, wall_section, lane, color, description } => {
            let new_route = NewRoute {
                name: Some(name),
                grade: Some(grade),
                route_setter: Some(route_setter),
                wall_section: Some(wall_section),
                lane: Some(lane),
                color,
                description,
            };
            let route = route_service::create(&pool, &new_route).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&route)?),
                OutputFormat::Text => println!("Created route {} (id {})", route.name, route.id),
            }
        }
        RouteCommands::List { wall_section, grade, lane } => {
            let filters = RouteFilters { wall_section, grade, lane };
            let routes = route_service::list(&pool, &filters).await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "routes": routes }))?)
                }
                OutputFormat::Text => {
                    println!("{:<6} {:<25} {:<6} {:<15} {:<6} {}", "ID", "NAME", "GRADE", "SECTION", "LANE", "SETTER");
                    println!("{}", "-".repeat(70));
                    for r in routes {
                        println!(
                            "{:<6} {:<25} {:<6} {:<15} {:<6} {}",
                            r.id, r.name, r.grade, r.wall_section, r.lane, r.route_setter
                        );
                    }
                }
            }
        }
        RouteCommands::Update {
            id,
            name,
            grade,
            route_setter,
            wall_section,
            lane,
            color,
            description,
            clear_color,
            clear_description,
        } => {
            let patch = RoutePatch {
                name,
                grade,
                route_setter,
                wall_section,
                lane,
                color: if clear_color { Some(None) } else { color.map(Some) },
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
            };
            let route = route_service::update(&pool, id, &patch).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&route)?),
                OutputFormat::Text => println!("Updated route {} (id {})", route.name, route.id),
            }
        }
        RouteCommands::Delete { id } => {
            route_service::delete(&pool, id).await?;
            println!("Deleted route {}", id);
        }
    }

    Ok(())
}
