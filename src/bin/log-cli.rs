use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "log-cli")]
#[command(about = "Client for the log endpoint", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Path of the log route on the server.
    #[arg(long, default_value = "/log")]
    log_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a message to the server log (omit MESSAGE to send none)
    Send { message: Option<String> },
    /// Check server liveness
    Health {
        #[arg(long, default_value = "/health")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Send { message } => {
            let mut request = client.get(format!("{}{}", base, cli.log_path));
            if let Some(message) = &message {
                request = request.query(&[("message", message)]);
            }
            let res = request.send().await?;
            println!("{}", read_success(res).await?);
        }
        Commands::Health { path } => {
            let res = client.get(format!("{}{}", base, path)).send().await?;
            let json: Value = serde_json::from_str(&read_success(res).await?)?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("server returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Body of a successful response; any other status is an error.
async fn read_success(res: reqwest::Response) -> Result<String, CliError> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(CliError::Status { status, body });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let body = read_success(response(200, "Log generated: hi")).await.unwrap();
        assert_eq!(body, "Log generated: hi");
    }

    #[tokio::test]
    async fn test_error_status_fails() {
        let err = read_success(response(503, "busy")).await.unwrap_err();
        match err {
            CliError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "busy");
            }
            other => panic!("expected status error, got {other}"),
        }
    }
}
