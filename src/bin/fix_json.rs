use clap::Parser;
use indeed_etl::core::input::read_text;
use indeed_etl::core::Storage;
use indeed_etl::utils::logger::{self, LogFormat};
use indeed_etl::{repair, EtlError, LocalStorage};

#[derive(Parser)]
#[command(name = "fix-json")]
#[command(about = "Repair a JSON export that fails to parse (comments, trailing commas)")]
struct Args {
    /// JSON file to repair
    #[arg(default_value = "indeed-applications.json")]
    path: String,

    /// Write the result here instead of rewriting the input
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn run(args: &Args, storage: &LocalStorage) -> indeed_etl::Result<String> {
    if !storage.exists(&args.path).await {
        return Err(EtlError::InputNotFound {
            path: args.path.clone(),
        });
    }

    tracing::info!("📖 Reading '{}'", args.path);
    let text = read_text(storage, &args.path).await?;

    let outcome = repair(&text)?;
    if !outcome.repaired {
        tracing::info!("✅ '{}' is already valid JSON, normalising formatting", args.path);
    }

    let output = args.output.clone().unwrap_or_else(|| args.path.clone());
    let json_data = serde_json::to_string_pretty(&outcome.value)?;
    storage.write_file(&output, json_data.as_bytes()).await?;

    tracing::info!("💾 Wrote fixed data to '{}'", output);
    Ok(output)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose, LogFormat::Compact, None)?;
    tracing::info!("🚀 Starting fix-json");

    let storage = LocalStorage::new(".".to_string());

    match run(&args, &storage).await {
        Ok(output) => {
            println!("✅ JSON fixed: {}", output);
            Ok(())
        }
        Err(e) => std::process::exit(logger::report_failure("fix-json", &e)),
    }
}
