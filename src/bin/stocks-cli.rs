use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "stocks-cli")]
#[command(about = "Query a running stocks-api", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every stock in the catalog
    List,
    /// Look up one stock by oid
    Get {
        oid: String,
        /// Quote range sent alongside the oid
        #[arg(long, default_value = "1d")]
        range: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/stocks", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List => client.get(&endpoint).send().await?,
        Commands::Get { oid, range } => {
            client
                .post(&endpoint)
                .header("X-Requested-With", "XMLHttpRequest")
                .form(&[("oid", oid.as_str()), ("range", range.as_str())])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        let message = json["error"].as_str().unwrap_or("unknown error");
        eprintln!("Error: stocks-api returned status {}: {}", status, message);
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
