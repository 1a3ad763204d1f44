use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "send-eth-cli")]
#[command(about = "Client for the send-eth service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status and network mode
    Health,
    /// Submit a transfer
    Send {
        /// Sender address
        #[arg(long)]
        from: String,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in ether
        #[arg(long)]
        amount: String,
        /// Sender private key
        #[arg(long, env = "SEND_ETH_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Send {
            from,
            to,
            amount,
            private_key,
        } => {
            let body = json!({
                "source_address": from,
                "target_address": to,
                "amount": amount,
                "private_key": private_key,
            });
            let res = client
                .post(format!("{}/send_eth", cli.url))
                .json(&body)
                .send()
                .await?;
            let accepted = print_response(res).await?;
            if !accepted {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Print the JSON body; returns whether the call succeeded.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(false);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(json.get("success").and_then(Value::as_bool).unwrap_or(true))
}
