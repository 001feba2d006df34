use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use storefront_client::{Method, RequestOptions, StorefrontClient};
use storefront_config::{Config, LogFormat};
use storefront_store::SqliteCredentialStore;
use storefront_types::{CartItemPayload, SignInPayload, SignUpPayload};

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "storefront — authenticated shop API client")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Override the backend origin (default: http://127.0.0.1:8080).
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,
    /// Session database path (default: ~/.storefront/session.db).
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a customer account.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        phone_number: String,
    },
    /// End the session locally and on the backend.
    Logout,
    /// Show the signed-in user.
    Status,
    /// List product categories.
    Categories,
    /// Show the cart contents.
    Cart,
    /// Add a product to the cart.
    CartAdd {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Check out the cart.
    Checkout,
    /// Send an arbitrary authenticated request and print its `data`.
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE).
        method: String,
        /// Path relative to the base URL, e.g. /api/categories.
        path: String,
        /// JSON request body.
        #[arg(long)]
        data: Option<String>,
        /// Query parameter as key=value; repeatable.
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("config error")?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    init_tracing(&config);

    let client = open_client(&config).await?;
    match cli.command {
        Commands::Login { email, password } => cmd_login(&client, email, password).await,
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            address,
            phone_number,
        } => {
            let payload = SignUpPayload {
                first_name,
                last_name,
                email,
                password,
                address,
                phone_number,
            };
            client.auth().sign_up(&payload).await?;
            eprintln!("account created for {}; run `storefront login`", payload.email);
            Ok(())
        }
        Commands::Logout => {
            let result = client.auth().logout().await;
            eprintln!("signed out");
            if let Err(e) = result {
                eprintln!("warning: backend logout failed: {e}");
            }
            Ok(())
        }
        Commands::Status => cmd_status(&client).await,
        Commands::Categories => print_json(&client.categories().list().await?),
        Commands::Cart => print_json(&client.cart().items().await?),
        Commands::CartAdd {
            product_id,
            quantity,
        } => {
            let item = CartItemPayload {
                product_id,
                quantity,
            };
            client.cart().add(&item).await?;
            eprintln!("added {} x {}", item.quantity, item.product_id);
            Ok(())
        }
        Commands::Checkout => {
            client.cart().checkout().await?;
            eprintln!("checked out");
            Ok(())
        }
        Commands::Request {
            method,
            path,
            data,
            params,
        } => cmd_request(&client, &method, path, data.as_deref(), &params).await,
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_client(config: &Config) -> Result<StorefrontClient> {
    let path = config.db_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteCredentialStore::open(&path)
        .await
        .map_err(|e| anyhow::anyhow!("database error: {e}"))?;
    StorefrontClient::from_config(config, Arc::new(store))
        .map_err(|e| anyhow::anyhow!("client error: {e}"))
}

async fn cmd_login(client: &StorefrontClient, email: String, password: String) -> Result<()> {
    let user = client
        .auth()
        .sign_in(&SignInPayload { email, password })
        .await
        .map_err(|e| anyhow::anyhow!("login failed: {e}"))?;
    eprintln!(
        "signed in as {} {} ({}), home: {}",
        user.first_name,
        user.last_name,
        user.role,
        user.home_path()
    );
    Ok(())
}

async fn cmd_status(client: &StorefrontClient) -> Result<()> {
    match client.auth().current_user().await? {
        Some(user) => println!("{}: signed in ({})", user.email, user.role),
        None => println!("not signed in"),
    }
    Ok(())
}

async fn cmd_request(
    client: &StorefrontClient,
    method: &str,
    path: String,
    data: Option<&str>,
    params: &[String],
) -> Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid method '{method}'"))?;
    let mut opts = RequestOptions::new(method, path);
    if let Some(raw) = data {
        let body: Value = serde_json::from_str(raw).context("--data must be valid JSON")?;
        opts = opts.json(body);
    }
    for param in params {
        let (key, value) = param
            .split_once('=')
            .with_context(|| format!("--param '{param}' must be KEY=VALUE"))?;
        opts = opts.param(key, value);
    }
    print_json(&client.request(opts).await?)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
