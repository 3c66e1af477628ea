use anyhow::Context;
use safevault::{
    AppState, SafeVaultConfig, SigningKeyProvider,
    api::routes::create_router,
    cli::{Cli, Commands, KeyKind, output::Output},
    db::{InMemoryIdentityStore, InMemoryUserRepository},
    keygen,
    seed::seed_identities,
    utils::telemetry,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Keygen { kind, bits }) => run_keygen(&output, kind, bits),
        Some(Commands::Config { validate }) => run_config(&output, &cli, validate),
        Some(Commands::Serve) | None => serve(&output, &cli).await,
    }
}

async fn serve(output: &Output, cli: &Cli) -> anyhow::Result<()> {
    let config = SafeVaultConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    telemetry::init(&config.server.log_level, config.server.log_format, cli.verbose);
    output.banner();

    let keys = Arc::new(SigningKeyProvider::from_config(&config.jwt)?);
    let identities = Arc::new(InMemoryIdentityStore::new());
    let users = Arc::new(InMemoryUserRepository::new());

    match config.seed_users()? {
        Some(seed) => {
            if let Err(e) = seed_identities(identities.as_ref(), &seed).await {
                warn!(error = %e, "identity seeding failed");
            }
        }
        None => info!("no [seed] section, skipping identity seeding"),
    }

    let state = AppState::new(&config.jwt, keys, identities, users)?;
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "SafeVault listening");
    output.info(&format!("Listening on http://{}", addr));
    axum::serve(listener, app).await?;

    Ok(())
}

fn run_keygen(output: &Output, kind: KeyKind, bits: Option<i64>) -> anyhow::Result<()> {
    match kind {
        KeyKind::Hmac => {
            let key = keygen::generate_hmac_key(bits.unwrap_or(keygen::DEFAULT_HMAC_BITS))?;
            output.header("HMAC key");
            output.kv("algorithm", &key.algorithm);
            output.kv("keySizeBits", &key.key_size_bits.to_string());
            output.kv("keyBase64", &key.key_base64);
            output.hint("Export keyBase64 as the variable named by jwt.key_env to use it for signing");
        }
        KeyKind::Aes => {
            let key = keygen::generate_aes_key(bits.unwrap_or(keygen::DEFAULT_AES_BITS))?;
            output.header("AES key");
            output.kv("algorithm", &key.algorithm);
            output.kv("keySizeBits", &key.key_size_bits.to_string());
            output.kv("keyBase64", &key.key_base64);
            output.kv("ivBase64", &key.iv_base64);
        }
        KeyKind::Rsa => {
            let requested = bits.unwrap_or(keygen::DEFAULT_RSA_BITS);
            let pair = keygen::generate_rsa_key_pair(requested)?;
            if pair.key_size_bits != requested {
                output.warning(&format!(
                    "{} bits is not supported, generated {} bits",
                    requested, pair.key_size_bits
                ));
            }
            output.header("RSA key pair");
            output.kv("keySizeBits", &pair.key_size_bits.to_string());
            output.kv("privateKeyPem", &pair.private_key_pem);
            output.kv("publicKeyPem", &pair.public_key_pem);
        }
    }

    Ok(())
}

fn run_config(output: &Output, cli: &Cli, validate: bool) -> anyhow::Result<()> {
    let config = match SafeVaultConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if validate {
        // Building the provider also checks the key decodes.
        SigningKeyProvider::from_config(&config.jwt)?;
        output.success(&format!("{} is valid", cli.config.display()));
    } else {
        output.info("Run with --validate to also check the signing key");
    }

    output.header("Configuration");
    output.kv("listen", &format!("{}:{}", config.server.host, config.server.port));
    output.kv("log_level", &config.server.log_level);
    output.kv("issuer", &config.jwt.issuer);
    output.kv("audience", &config.jwt.audience);
    output.kv("key_env", &config.jwt.key_env);
    output.kv("expiry_minutes", &config.jwt.expiry_minutes.to_string());
    output.kv(
        "seed",
        if config.seed.is_some() { "enabled" } else { "disabled" },
    );

    Ok(())
}
