use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentirec::services::serving::NO_RECOMMENDATIONS;
use sentirec::{init_tracing, AppState, Config, RecommendationRequest};
use serde::Serialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known usernames
    Users {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Recommend products for one user
    Recommend {
        username: String,

        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Recommend for every username in FILE (one per line, `-` for stdin)
    Batch {
        file: Option<PathBuf>,

        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Show artifact sizes
    Info,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    message: String,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_usernames(file: Option<&Path>) -> Result<Vec<String>> {
    let lines: Vec<String> = match file {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Cannot open username list {}", path.display()))?;
            std::io::BufReader::new(file).lines().collect::<Result<_, _>>()?
        }
        _ => std::io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::from_file(path)
    } else {
        info!("Config file not found, using default configuration");
        Ok(Config::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(&args.config)?;

    let default_top_n = config.recommendation.top_n;
    let state = AppState::new(config).await.context("Startup failed")?;

    match args.command {
        Command::Users { filter } => {
            let users = state.list_users(filter.as_deref());
            print_json(&ApiResponse::success(users))?;
        }
        Command::Recommend { username, top_n } => {
            let request = RecommendationRequest::new(username, top_n.unwrap_or(default_top_n));
            match state.serving_service.serve(&request) {
                Ok(response) if response.is_empty() => {
                    print_json(&ApiResponse::<()>::error(NO_RECOMMENDATIONS.to_string()))?;
                }
                Ok(response) => print_json(&ApiResponse::success(response))?,
                Err(e) if e.is_client_error() => {
                    print_json(&ApiResponse::<()>::error(e.to_string()))?
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Batch { file, top_n } => {
            let requests: Vec<RecommendationRequest> = read_usernames(file.as_deref())?
                .into_iter()
                .map(|username| RecommendationRequest::new(username, top_n.unwrap_or(default_top_n)))
                .collect();

            let responses: Vec<_> = state
                .serving_service
                .serve_batch(&requests)
                .into_iter()
                .map(|result| match result {
                    Ok(response) if response.is_empty() => {
                        ApiResponse::error(NO_RECOMMENDATIONS.to_string())
                    }
                    Ok(response) => ApiResponse::success(response),
                    Err(e) => ApiResponse::error(e.to_string()),
                })
                .collect();

            print_json(&responses)?;
            info!("Serving stats: {:?}", state.serving_service.stats());
        }
        Command::Info => {
            print_json(&ApiResponse::success(state.store.summary()))?;
        }
    }

    Ok(())
}
