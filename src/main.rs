use snapbase::config::{config_path, DbProfile, LlmSettings, SnapConfig};
use snapbase::db::{self, MySqlExecutor};
use snapbase::llm::{LlmClient, MissingKeyGenerator, SqlGenerator};
use snapbase::repl::{self, Control, Session};
use snapbase::{classify, validate_batch, Pipeline, Verdict};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snapbase")]
#[command(about = "Query MySQL with SQL or plain English, read-only")]
#[command(version)]
struct Args {
    /// Path to the config file (or set SNAPBASE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Connection profile to use (default: first saved profile)
    #[arg(short, long)]
    profile: Option<String>,

    /// Database to open, skipping the selection prompt
    #[arg(short, long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether SQL would be admitted; exits 1 when blocked
    Check {
        /// One or more `;`-separated statements
        sql: String,
    },
    /// Show whether input is treated as direct SQL or natural language
    Classify {
        text: String,
    },
    /// Validate and store the model API key
    SetKey {
        key: String,

        /// Store the key without probing the endpoint
        #[arg(long)]
        skip_probe: bool,
    },
    /// Save a MySQL connection profile
    AddProfile {
        name: String,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(long, default_value_t = 3306)]
        port: u16,

        #[arg(short, long)]
        user: String,

        /// Stored in plain text; leave out to use SNAPBASE_DB_PASSWORD
        #[arg(long)]
        password: Option<String>,

        /// Default database for this profile
        #[arg(long)]
        database: Option<String>,
    },
    /// List saved connection profiles
    Profiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snapbase=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let path = config_path(args.config);

    match args.command {
        Some(Commands::Check { sql }) => check(&sql),
        Some(Commands::Classify { text }) => {
            println!("{}", classify(&text));
            Ok(())
        }
        Some(Commands::SetKey { key, skip_probe }) => set_key(&path, key, skip_probe).await,
        Some(Commands::AddProfile {
            name,
            host,
            port,
            user,
            password,
            database,
        }) => {
            let mut config = SnapConfig::load(&path)?;
            config.upsert_profile(DbProfile {
                name: name.clone(),
                host,
                port,
                user,
                password,
                database,
            });
            config.save(&path)?;
            println!("Saved profile '{}'", name);
            Ok(())
        }
        Some(Commands::Profiles) => {
            let config = SnapConfig::load(&path)?;
            if config.db_profiles.is_empty() {
                println!("No saved profiles. Add one with: snapbase add-profile <NAME> --user <USER>");
            }
            for p in &config.db_profiles {
                println!("{}\t{}@{}:{}", p.name, p.user, p.host, p.port);
            }
            Ok(())
        }
        None => run_shell(&path, args.profile, args.database).await,
    }
}

fn check(sql: &str) -> Result<()> {
    match validate_batch(sql) {
        Verdict::Safe => {
            println!("SAFE");
            Ok(())
        }
        Verdict::Unsafe(rejection) => {
            println!("BLOCKED: {}", rejection);
            std::process::exit(1);
        }
    }
}

async fn set_key(path: &Path, key: String, skip_probe: bool) -> Result<()> {
    if !skip_probe {
        let settings = LlmSettings::from_env();
        let client = LlmClient::new(key.clone(), settings.model, settings.base_url);
        if !client.probe().await {
            return Err(anyhow!("API key was rejected by the model endpoint"));
        }
    }

    let mut config = SnapConfig::load(path)?;
    config.api_key = Some(key);
    config.save(path)?;
    println!("API key saved");
    Ok(())
}

async fn run_shell(path: &Path, profile: Option<String>, database: Option<String>) -> Result<()> {
    let config = SnapConfig::load(path)?;

    let profile = match profile {
        Some(name) => config
            .profile(&name)
            .cloned()
            .ok_or_else(|| anyhow!("No profile named '{}' in {:?}", name, path))?,
        None => config.db_profiles.first().cloned().ok_or_else(|| {
            anyhow!("No connection profiles saved. Add one with: snapbase add-profile <NAME> --user <USER>")
        })?,
    };

    let generator: Arc<dyn SqlGenerator> = match config.resolved_api_key() {
        Some(key) => {
            let settings = LlmSettings::from_env();
            info!("Using model {}", settings.model);
            Arc::new(LlmClient::new(key, settings.model, settings.base_url))
        }
        None => {
            warn!("No API key configured; natural-language input is disabled");
            Arc::new(MissingKeyGenerator)
        }
    };

    println!("{}", repl::banner());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let mut next_database = database.or_else(|| profile.database.clone());
    loop {
        let database = match next_database.take() {
            Some(db) => db,
            None => {
                let server = db::connect_server(&profile)
                    .await
                    .with_context(|| format!("Failed to connect to {}:{}", profile.host, profile.port))?;
                let databases = db::list_databases(&server).await?;
                server.close().await;
                match repl::choose_database(&databases, &mut input, &mut out)? {
                    Some(db) => db,
                    None => return Ok(()),
                }
            }
        };

        let pool = db::connect_database(&profile, &database)
            .await
            .with_context(|| format!("Failed to open database '{}'", database))?;
        let schema = db::database_schema(&pool).await.unwrap_or_else(|e| {
            warn!("Schema introspection failed: {}", e);
            Vec::new()
        });
        writeln!(out, "Connected to '{}' ({} columns described)", database, schema.len())?;

        let session = Session::new(
            Pipeline::new(generator.clone()),
            Arc::new(MySqlExecutor::new(pool.clone())),
            schema,
        );
        let control = session.run(&mut input, &mut out).await?;
        pool.close().await;

        match control {
            Control::SwitchDatabase => continue,
            Control::Exit | Control::Continue => {
                writeln!(out, "Bye")?;
                return Ok(());
            }
        }
    }
}
