use anyhow::{bail, Context, Result};
use azurerm_provider::azure::ArmClient;
use azurerm_provider::config::ProviderConfig;
use azurerm_provider::provider::{InstanceState, Provider, Registry};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Drive Azure resource operations from attribute files
#[derive(Parser, Debug)]
#[command(name = "azurerm-provider", version, about, long_about = None)]
struct Args {
    /// Subscription to manage resources in
    #[arg(long, global = true)]
    subscription: Option<String>,

    /// ARM endpoint, e.g. https://management.usgovcloudapi.net
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every resource and data source type
    Types,
    /// Print the schema of a resource or data source type
    Schema { type_name: String },
    /// Create a resource from a configuration file
    Create {
        resource_type: String,
        /// JSON or YAML attribute file
        config: PathBuf,
    },
    /// Refresh a resource from a state file
    Read { resource_type: String, state: PathBuf },
    /// Update a resource in place
    Update {
        resource_type: String,
        state: PathBuf,
        config: PathBuf,
    },
    /// Delete a resource
    Delete { resource_type: String, state: PathBuf },
    /// Adopt an existing resource by its ID
    Import { resource_type: String, id: String },
    /// Show what applying a configuration would do
    Plan {
        resource_type: String,
        config: PathBuf,
        /// Prior state; omitted means the resource does not exist yet
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Look up an existing object through a data source
    Data { data_source_type: String, config: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Log to a file; stdout carries the JSON results.
fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match (std::env::var("RUST_LOG").ok(), level.to_tracing_level()) {
        (Some(directives), _) if !directives.trim().is_empty() => EnvFilter::new(directives),
        (_, Some(level)) => EnvFilter::new(level.as_str().to_ascii_lowercase()),
        _ => return None,
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("logging disabled: cannot open {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        "azurerm-provider {} started with log level: {:?}",
        azurerm_provider::VERSION,
        level
    );
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("azurerm-provider").join("azurerm-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".azurerm-provider").join("azurerm-provider.log");
    }
    PathBuf::from("azurerm-provider.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let result = run(args).await;
    if let Err(err) = &result {
        tracing::error!("{:#}", err);
        if let Some(hint) = err
            .downcast_ref::<azurerm_provider::Error>()
            .and_then(|e| e.hint())
        {
            eprintln!("hint: {}", hint);
        }
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let registry = Registry::new();

    // Offline commands
    match &args.command {
        Command::Types => {
            return print_json(&serde_json::json!({
                "resources": registry.resource_types(),
                "data_sources": registry.data_source_types(),
            }));
        },
        Command::Schema { type_name } => {
            let schema = match registry.resource(type_name) {
                Ok(resource) => resource.schema(),
                Err(_) => registry.data_source(type_name)?.schema(),
            };
            return print_json(&schema);
        },
        _ => {},
    }

    let mut config = ProviderConfig::load();
    if let Some(subscription) = args.subscription {
        config.subscription_id = Some(subscription);
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }
    let client = ArmClient::new(&config)?;
    tracing::info!(
        "Using subscription: {}, endpoint: {}",
        client.subscription_id(),
        config.effective_endpoint()
    );
    let provider = Provider::new(registry, client);

    match args.command {
        Command::Types | Command::Schema { .. } => Ok(()),
        Command::Create {
            resource_type,
            config,
        } => {
            let config = load_attributes(&config)?;
            print_json(&provider.create(&resource_type, config).await?)
        },
        Command::Read {
            resource_type,
            state,
        } => {
            let state = load_state(&state)?;
            let refreshed = provider.read(&resource_type, &state.id, state.attributes).await?;
            if refreshed.is_none() {
                eprintln!("{} {} no longer exists", resource_type, state.id);
            }
            print_json(&refreshed)
        },
        Command::Update {
            resource_type,
            state,
            config,
        } => {
            let state = load_state(&state)?;
            let config = load_attributes(&config)?;
            print_json(
                &provider
                    .update(&resource_type, &state.id, state.attributes, config)
                    .await?,
            )
        },
        Command::Delete {
            resource_type,
            state,
        } => {
            let state = load_state(&state)?;
            provider.delete(&resource_type, &state.id, state.attributes).await?;
            print_json(&serde_json::json!({ "deleted": state.id }))
        },
        Command::Import { resource_type, id } => print_json(&provider.import(&resource_type, &id).await?),
        Command::Plan {
            resource_type,
            config,
            state,
        } => {
            let config = load_attributes(&config)?;
            let prior = state.as_deref().map(load_state).transpose()?;
            let action = provider.plan(&resource_type, prior.as_ref().map(|s| &s.attributes), config)?;
            print_json(&action)
        },
        Command::Data {
            data_source_type,
            config,
        } => {
            let config = load_attributes(&config)?;
            print_json(&provider.read_data_source(&data_source_type, config).await?)
        },
    }
}

/// Read a JSON or YAML document; the extension picks the format.
fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("parsing YAML in {:?}", path))
    } else {
        serde_json::from_str(&content).with_context(|| format!("parsing JSON in {:?}", path))
    }
}

fn load_attributes(path: &Path) -> Result<Map<String, Value>> {
    match load_document(path)? {
        Value::Object(map) => Ok(map),
        other => bail!("{:?} must contain an attribute map, found {}", path, kind(&other)),
    }
}

fn load_state(path: &Path) -> Result<InstanceState> {
    let document = load_document(path)?;
    serde_json::from_value(document).with_context(|| format!("{:?} is not a saved instance state", path))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
