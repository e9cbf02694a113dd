use std::sync::Arc;

use secrecy::SecretString;
use tokio::io::AsyncBufReadExt;

use eventmart::config::RouterConfig;
use eventmart::identity::RestIdentityProvider;
use eventmart::profile::{RestProfileStore, UserRole};
use eventmart::session::{Registration, SessionManager};
use eventmart::store::LibSqlCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing; EVENTMART_LOG_DIR switches output to a daily file.
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let _log_guard = match std::env::var("EVENTMART_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "eventmart.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .init();
            None
        }
    };

    let auth_url =
        std::env::var("EVENTMART_AUTH_URL").unwrap_or_else(|_| "http://localhost:7070".to_string());
    let api_url = std::env::var("EVENTMART_API_URL")
        .unwrap_or_else(|_| "http://localhost:8081/api".to_string());
    let cache_path = std::env::var("EVENTMART_CACHE_PATH")
        .unwrap_or_else(|_| "./data/eventmart-cache.db".to_string());

    let mut config = RouterConfig::default();
    if let Ok(admin) = std::env::var("EVENTMART_ADMIN_EMAIL") {
        config.admin_email = admin;
    }

    eprintln!("🎪 Eventmart session console v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Identity provider: {auth_url}");
    eprintln!("   Profile API: {api_url}");
    eprintln!("   Commands: login <email> <password>");
    eprintln!("             register <role> <email> <password> [name]");
    eprintln!("             route | whoami | logout | /quit\n");

    let cache = LibSqlCache::new_local(std::path::Path::new(&cache_path)).await?;
    eprintln!("   Session cache: {cache_path}");

    let manager = SessionManager::new(
        Arc::new(RestIdentityProvider::new(auth_url)),
        Arc::new(RestProfileStore::new(api_url)),
        Arc::new(cache),
        config,
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Err(err) = run_command(&manager, line).await {
            eprintln!("   ✗ {err}");
        }
    }

    Ok(())
}

async fn run_command(manager: &SessionManager, line: &str) -> anyhow::Result<()> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("login") => {
            let (email, password) = match (parts.next(), parts.next()) {
                (Some(email), Some(password)) => (email, password),
                _ => anyhow::bail!("usage: login <email> <password>"),
            };
            let decision = manager
                .login(email, &SecretString::from(password.to_string()))
                .await?;
            eprintln!("   → {}", decision.destination.path());
        }
        Some("register") => {
            let (role, email, password) = match (parts.next(), parts.next(), parts.next()) {
                (Some(role), Some(email), Some(password)) => (role, email, password),
                _ => anyhow::bail!("usage: register <role> <email> <password> [name]"),
            };
            let role = UserRole::parse_hint(role)
                .ok_or_else(|| anyhow::anyhow!("unknown role: {role}"))?;
            let name = parts.collect::<Vec<_>>().join(" ");
            let decision = manager
                .register(Registration {
                    email: email.to_string(),
                    password: SecretString::from(password.to_string()),
                    name: if name.is_empty() {
                        email.to_string()
                    } else {
                        name
                    },
                    role,
                    picture: None,
                    profile_data: serde_json::json!({}),
                })
                .await?;
            eprintln!("   → {}", decision.destination.path());
        }
        Some("route") => {
            let decision = manager.bootstrap().await?;
            eprintln!("   → {}", decision.destination.path());
        }
        Some("whoami") => match manager.current_identity() {
            Some(identity) => eprintln!("   {} ({})", identity.email, identity.uid),
            None => eprintln!("   not signed in"),
        },
        Some("logout") => {
            manager.logout();
            eprintln!("   signed out");
        }
        Some(other) => anyhow::bail!("unknown command: {other}"),
        None => {}
    }
    Ok(())
}
