use std::io::{self, IsTerminal, Read};
use std::process;

use clap::Parser;
use qr_forge::config::{ConfigOverrides, load_config};
use qr_forge::{ApiRequest, ApiResponse};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qr-forge",
    about = "Generate QR codes as PNG data URLs with metadata",
    long_about = "Generate QR codes. Pass --data, or pipe a JSON request \
                  ({\"data\", \"size\", \"color\", \"error_correction\"}) or an array of them on stdin."
)]
struct Cli {
    /// Path to TOML config file
    #[arg(long = "config")]
    config_path: Option<String>,

    /// Text to encode (otherwise a JSON request is read from stdin)
    #[arg(short, long)]
    data: Option<String>,

    /// Size tier: xs, s, m, l, xl
    #[arg(short, long)]
    size: Option<String>,

    /// Foreground color (#RGB or #RRGGBB)
    #[arg(short, long)]
    color: Option<String>,

    /// Error correction level: L, M, Q, H
    #[arg(short = 'e', long)]
    error_correction: Option<String>,

    /// Encode the input as-is, without mailto:/tel:/https:// detection
    #[arg(long)]
    no_normalize: bool,

    /// Truncate input to this many characters
    #[arg(long)]
    max_length: Option<usize>,

    /// Write the PNG to this path instead of printing JSON
    #[arg(long)]
    png: Option<String>,

    /// Print a liveness report and exit
    #[arg(long)]
    health: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StdinRequest {
    Batch(Vec<ApiRequest>),
    One(ApiRequest),
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            process::exit(1);
        }
    }
}

fn fail(message: String) -> ! {
    print_json(&serde_json::json!({ "error": message }));
    process::exit(1);
}

fn read_stdin_requests() -> Vec<ApiRequest> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        fail("No input provided: pass --data or pipe a JSON request".to_string());
    }
    let mut raw = String::new();
    if let Err(e) = stdin.lock().read_to_string(&mut raw) {
        fail(format!("Failed to read stdin: {e}"));
    }
    parse_requests(&raw).unwrap_or_else(|message| fail(message))
}

fn parse_requests(raw: &str) -> Result<Vec<ApiRequest>, String> {
    match serde_json::from_str::<StdinRequest>(raw) {
        Ok(StdinRequest::One(request)) => Ok(vec![request]),
        Ok(StdinRequest::Batch(requests)) if requests.is_empty() => {
            Err("Empty batch: expected at least one request".to_string())
        }
        Ok(StdinRequest::Batch(requests)) => Ok(requests),
        Err(e) => Err(format!("Invalid JSON request: {e}")),
    }
}

fn main() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let cli = Cli::parse();

    if cli.health {
        print_json(&qr_forge::api::health());
        return;
    }

    let overrides = ConfigOverrides {
        normalize_input: cli.no_normalize.then_some(false),
        max_input_length: cli.max_length,
    };
    let config = load_config(cli.config_path.as_deref(), overrides);

    let requests = match cli.data {
        Some(data) => vec![ApiRequest {
            data,
            size: cli.size,
            color: cli.color,
            error_correction: cli.error_correction,
        }],
        None => read_stdin_requests(),
    };

    if let Some(ref png_path) = cli.png {
        let [request] = requests.as_slice() else {
            fail("--png needs exactly one request".to_string());
        };
        match qr_forge::generate(request, &config) {
            Ok(result) => {
                if let Err(e) = std::fs::write(png_path, &result.png) {
                    fail(format!("Failed to write PNG: {e}"));
                }
                if let Some(warning) = &result.warning {
                    eprintln!("{warning}");
                }
                eprintln!("Wrote {} bytes to {}", result.png.len(), png_path);
            }
            Err(e) => fail(e.to_string()),
        }
        return;
    }

    let responses: Vec<ApiResponse> = qr_forge::generate_many(&requests, &config)
        .into_iter()
        .map(ApiResponse::from)
        .collect();
    let failed = responses.iter().any(|r| !r.is_success());

    for response in &responses {
        print_json(response);
    }
    if failed {
        process::exit(1);
    }
}
