use anyhow::Result;
use boog::{router, AppState};
use boog_local::{config, ChatLog, Config, Orchestrator};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "boog")]
#[command(about = "Boog chat backend (quotes, LLM chat, search-grounded answers)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve `POST /chat` over HTTP.
    Serve(ServeCmd),
    /// Answer one message and print the response.
    Ask(AskCmd),
    /// Diagnose configuration (json; no secrets).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct ServeCmd {
    /// Listen address. Defaults to 0.0.0.0:$PORT (PORT defaults to 5000).
    #[arg(long)]
    addr: Option<String>,
}

#[derive(clap::Args, Debug)]
struct AskCmd {
    /// Mode: wisdom|roast|ai|chat|web|web-search|search
    #[arg(long)]
    mode: Option<String>,
    /// Message text (joined with spaces).
    message: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn listen_addr(arg: Option<String>) -> Result<String> {
    if let Some(addr) = arg {
        return Ok(addr);
    }
    let port = match std::env::var("PORT") {
        Ok(p) if !p.trim().is_empty() => p
            .trim()
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number (got {p:?}): {e}"))?,
        _ => 5000,
    };
    Ok(format!("0.0.0.0:{port}"))
}

/// Checks that `path` could be appended to without creating it or any directory.
fn log_file_writable(path: &std::path::Path) -> Result<()> {
    if path.exists() {
        std::fs::OpenOptions::new().append(true).open(path)?;
        return Ok(());
    }
    // The chat log creates missing directories on first write; probe the nearest existing one.
    let dir = path
        .ancestors()
        .skip(1)
        .find(|d| d.as_os_str().is_empty() || d.is_dir())
        .map(|d| if d.as_os_str().is_empty() { std::path::Path::new(".") } else { d })
        .ok_or_else(|| anyhow::anyhow!("no existing parent directory"))?;
    let probe = dir.join(format!(
        "boog-doctor-{}.probe",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
    ));
    std::fs::write(&probe, b"ok")?;
    let _ = std::fs::remove_file(&probe);
    Ok(())
}

fn doctor_report(cfg: &Config, elapsed_ms: u128) -> serde_json::Value {
    let mut checks: Vec<serde_json::Value> = Vec::new();

    let log_ok = cfg.log_file.as_deref().map(|p| log_file_writable(p).is_ok());
    checks.push(serde_json::json!({
        "name": "log_file_writable",
        "ok": log_ok.unwrap_or(true),
        "skipped": log_ok.is_none(),
        "hint": if log_ok == Some(false) { "Set BOOG_LOG_FILE to a writable path (or off)." } else { "" },
    }));

    let llm_ok = cfg.llm.api_key.is_some();
    checks.push(serde_json::json!({
        "name": "llm_api_key",
        "ok": llm_ok,
        "hint": if llm_ok {
            String::new()
        } else {
            format!("Set BOOG_LLM_API_KEY or {} to enable ai/web modes.", cfg.llm.provider.api_key_var())
        },
    }));

    serde_json::json!({
        "schema_version": 1,
        "kind": "doctor",
        "name": "boog",
        "version": env!("CARGO_PKG_VERSION"),
        "elapsed_ms": elapsed_ms,
        "configured": {
            "search": {
                "endpoints": cfg.search.endpoints.iter().map(|e| e.kind.as_str()).collect::<Vec<_>>(),
                "tavily": cfg.search.tavily_api_key.is_some(),
                "depth": cfg.search.depth.as_str(),
                "timeout_ms": cfg.search.timeout_ms,
            },
            "llm": {
                "provider": cfg.llm.provider.as_str(),
                "model": cfg.llm.model,
                "api_key": llm_ok,
            },
            "default_mode": cfg.default_mode.as_str(),
            "log_file": cfg.log_file.as_ref().map(|p| p.display().to_string()),
        },
        "checks": checks,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Opt-in env file; never overrides the process environment and never logs values.
    // Loaded before tracing so RUST_LOG may come from the file.
    let env_file = std::env::var("BOOG_ENV_FILE")
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(|p| config::load_env_file(std::path::Path::new(&p)));

    init_tracing();

    match env_file {
        Some(Ok(n)) => tracing::debug!(applied = n, "env file loaded"),
        Some(Err(e)) => tracing::warn!(error = %e, "env file ignored"),
        None => {}
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let cfg = Config::from_env()?;
            let client = boog_local::http_client()?;
            let orchestrator = Orchestrator::from_config(&client, &cfg);
            let log = cfg.log_file.clone().map(ChatLog::new);
            let app = router(AppState::new(orchestrator, log));

            let addr = listen_addr(args.addr)?;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(
                addr = %listener.local_addr()?,
                default_mode = cfg.default_mode.as_str(),
                llm_configured = cfg.llm.api_key.is_some(),
                "boog listening"
            );
            axum::serve(listener, app).await?;
        }
        Commands::Ask(args) => {
            let cfg = Config::from_env()?;
            let client = boog_local::http_client()?;
            let orchestrator = Orchestrator::from_config(&client, &cfg);
            let message = args.message.join(" ");
            println!("{}", orchestrator.answer(&message, args.mode.as_deref()).await);
        }
        Commands::Doctor(args) => {
            let t0 = std::time::Instant::now();
            let cfg = Config::from_env()?;
            let v = doctor_report(&cfg, t0.elapsed().as_millis());
            match args.output.to_ascii_lowercase().as_str() {
                "text" => {
                    for c in v["checks"].as_array().into_iter().flatten() {
                        println!(
                            "{}: {}",
                            c["name"].as_str().unwrap_or(""),
                            if c["ok"].as_bool().unwrap_or(false) { "ok" } else { "FAIL" }
                        );
                    }
                }
                _ => println!("{}", v),
            }
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "boog",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("boog {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }

    Ok(())
}
