//! Shoplist CLI - Main entry point for CLI binary
//!
//! This binary provides the `shoplist` CLI tool for serving the API and
//! checking roles and DTO payloads.

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use std::path::Path;

use shoplist_lib::engine::{
    api::{build_router, AppState},
    cli::formatter::{format_field_error, format_role_line, CliFormatter},
    cli::{Cli, Commands, OutputFormat},
    config::Config,
    dto::{DtoRegistry, DtoSource},
    observability,
    rbac::Role,
    validation::Validator,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli).await {
        CliFormatter::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let project_dir = cli.get_project_dir();
    let json_output = cli.format == OutputFormat::Json;

    match cli.command {
        Commands::Serve { port, host } => {
            cmd_serve(&project_dir, host, port).await?;
        }
        Commands::Roles => {
            cmd_roles(&project_dir, json_output)?;
        }
        Commands::Check { actual, required } => {
            cmd_check(&project_dir, actual, required, json_output)?;
        }
        Commands::Validate { dto, json, query } => {
            cmd_validate(&project_dir, &dto, &json, query, json_output)?;
        }
    }

    Ok(())
}

fn load_config(project_dir: &Path) -> anyhow::Result<Config> {
    let config = Config::load_or_default(project_dir)
        .with_context(|| format!("Failed to load config from {}", project_dir.display()))?;
    config
        .apply_env()
        .context("Invalid SHOPLIST_* environment override")
}

async fn cmd_serve(
    project_dir: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(project_dir)?;
    if let Some(host) = host {
        config.api.host = host;
    }
    if let Some(port) = port {
        config.api.port = port;
    }

    observability::init_tracing(config.runtime.development);
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = config.address();
    tracing::info!(
        addr = %addr,
        development = config.runtime.development,
        "starting shoplist API"
    );
    CliFormatter::header("Shoplist API Server");
    CliFormatter::kv("Listening", &format!("http://{}", addr));
    CliFormatter::kv("OpenAPI", &format!("http://{}/api/openapi.json", addr));
    CliFormatter::info("Press Ctrl+C to stop");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cmd_roles(project_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(project_dir)?;
    let hierarchy = config.role_hierarchy()?;

    if json {
        let roles: serde_json::Map<String, Value> = Role::ALL
            .iter()
            .map(|role| {
                let implied: Vec<&str> = hierarchy.ancestors(*role).map(|r| r.as_str()).collect();
                (role.to_string(), serde_json::json!(implied))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&roles)?);
    } else {
        CliFormatter::header("Role Hierarchy");
        for role in Role::ALL.iter().rev() {
            let mut implied: Vec<Role> = hierarchy.ancestors(*role).collect();
            implied.reverse();
            CliFormatter::item(&format_role_line(*role, &implied));
        }
    }

    Ok(())
}

fn cmd_check(
    project_dir: &Path,
    actual: Role,
    required: Role,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(project_dir)?;
    let hierarchy = config.role_hierarchy()?;
    let result = hierarchy.authorize(actual, required);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "actual": actual,
                "required": required,
                "allowed": result.is_ok()
            })
        );
    } else if result.is_ok() {
        CliFormatter::success(&format!("{} satisfies {}", actual, required));
    }

    result.map_err(Into::into)
}

fn cmd_validate(
    project_dir: &Path,
    dto: &str,
    payload: &str,
    query: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(project_dir)?;
    let registry = DtoRegistry::standard();
    let entry = registry.get(dto).map_err(|e| {
        let known: Vec<&str> = registry.names().collect();
        format!("{} (known: {})", e, known.join(", "))
    })?;

    let input = match serde_json::from_str::<Value>(payload)? {
        Value::Object(map) => map,
        _ => return Err("Input must be a JSON object".into()),
    };

    let validator = Validator::new(config.validation);
    let outcome = if query || entry.source == DtoSource::Query {
        validator.validate_query(&entry.schema, input)
    } else {
        validator.validate(&entry.schema, input)
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "valid": outcome.is_valid(),
                "errors": outcome.errors,
                "dtoIn": outcome.input
            })
        );
    } else if outcome.is_valid() {
        CliFormatter::success(&format!("{} is valid", dto));
        CliFormatter::code_block(&serde_json::to_string_pretty(&outcome.input)?, "json");
    } else {
        CliFormatter::header(&format!("{} failed validation", dto));
        for error in &outcome.errors {
            CliFormatter::item(&format_field_error(error));
        }
    }

    if outcome.is_valid() {
        Ok(())
    } else {
        Err(format!("{} error(s)", outcome.errors.len()).into())
    }
}
