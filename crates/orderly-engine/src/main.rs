//! # Orderly CLI
//!
//! Creates one order from a JSON request file, or prints a stored order.
//!
//! ## Usage
//! ```bash
//! # Seed a menu first
//! cargo run -p orderly-db --bin seed -- --db ./orderly.db
//!
//! # Create an order
//! cargo run -p orderly-engine --bin orderly -- demos/dine_in.json
//!
//! # As another cashier / outlet
//! cargo run -p orderly-engine --bin orderly -- --outlet outlet-2 --user kasir-7 req.json
//!
//! # Read it back
//! cargo run -p orderly-engine --bin orderly -- --show <ORDER_ID>
//! ```
//!
//! The order (or error payload) goes to stdout as JSON; logs go to stderr.
//! Exit code is 1 for rejected requests, 2 for internal failures.

use std::env;
use std::fs;
use std::process::ExitCode;

use tracing::info;

use orderly_core::{Actor, CreateOrderRequest};
use orderly_db::Database;
use orderly_engine::telemetry::init_tracing;
use orderly_engine::{EngineConfig, EngineError, ErrorCode, ErrorResponse, OrderService};

const USAGE: &str = "\
Usage: orderly [OPTIONS] <REQUEST_FILE>
       orderly [OPTIONS] --show <ORDER_ID>

Options:
  -o, --outlet <ID>  Outlet the cashier works at (default: outlet-1)
  -u, --user <ID>    Cashier user ID (default: cashier-1)
  -s, --show <ID>    Print a stored order instead of creating one
  -h, --help         Show this help message

Environment:
  ORDERLY_DB_PATH, ORDERLY_DB_MAX_CONNECTIONS,
  ORDERLY_ORDER_NUMBER_PREFIX, ORDERLY_ORDER_NUMBER_WIDTH, RUST_LOG";

enum Command {
    Create { request_path: String },
    Show { order_id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut outlet_id = String::from("outlet-1");
    let mut user_id = String::from("cashier-1");
    let mut command = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--outlet" | "-o" => {
                if i + 1 < args.len() {
                    outlet_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--user" | "-u" => {
                if i + 1 < args.len() {
                    user_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--show" | "-s" => {
                if i + 1 < args.len() {
                    command = Some(Command::Show {
                        order_id: args[i + 1].clone(),
                    });
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                return Ok(ExitCode::SUCCESS);
            }
            path => {
                command = Some(Command::Create {
                    request_path: path.to_string(),
                });
            }
        }
        i += 1;
    }

    let Some(command) = command else {
        eprintln!("{}", USAGE);
        return Ok(ExitCode::from(64));
    };

    init_tracing();

    let config = EngineConfig::load()?;
    info!(
        db_path = %config.db_path.display(),
        prefix = %config.order_number_prefix,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;
    let service = OrderService::from_database(&db, config.order_number_format());

    let outcome = match command {
        Command::Create { request_path } => {
            let raw = fs::read_to_string(&request_path)?;
            match serde_json::from_str::<CreateOrderRequest>(&raw) {
                Ok(request) => {
                    let actor = Actor::new(user_id, outlet_id);
                    service
                        .create_order(&actor, request)
                        .await
                        .map(|order| serde_json::to_string_pretty(&order))
                }
                Err(err) => {
                    print_error(&ErrorResponse::new(
                        ErrorCode::ValidationError,
                        format!("malformed request: {}", err),
                    ))?;
                    return Ok(ExitCode::from(1));
                }
            }
        }
        Command::Show { order_id } => match service.get_order(&outlet_id, &order_id).await {
            Ok(Some(order)) => Ok(serde_json::to_string_pretty(&order)),
            Ok(None) => {
                eprintln!("order not found: {}", order_id);
                return Ok(ExitCode::from(1));
            }
            Err(err) => Err(err),
        },
    };

    let code = match outcome {
        Ok(json) => {
            println!("{}", json?);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = match err {
                EngineError::Order(_) => ExitCode::from(1),
                EngineError::Internal(_) => ExitCode::from(2),
            };
            print_error(&ErrorResponse::from(err))?;
            code
        }
    };

    db.close().await;
    Ok(code)
}

fn print_error(response: &ErrorResponse) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
