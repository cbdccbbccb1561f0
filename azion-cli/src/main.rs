use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use azion_core::provider::Provider;
use azion_core::resource::{
    Attributes, Resource, ResourceId, State, attributes_from_json, attributes_to_json,
};
use azion_core::schema::{AttributeSchema, ResourceSchema};
use azion_provider::{AzionProvider, ProviderConfig, data_sources, resources};

#[derive(Parser)]
#[command(name = "azion")]
#[command(about = "Drive Azion provider lifecycle operations", long_about = None)]
struct Cli {
    /// Provider block as a JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API token (defaults to AZION_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Base URL of the control API (defaults to AZION_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log requests and lifecycle calls
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List types, or show the schema of one type
    Schema {
        /// Resource or data source type
        resource_type: Option<String>,
    },
    /// Validate attributes in a JSON file against a schema
    Validate {
        resource_type: String,
        /// JSON object of attributes
        file: PathBuf,
    },
    /// Create a resource
    Create {
        resource_type: String,
        name: String,
        file: PathBuf,
    },
    /// Read a resource by identifier
    Read {
        resource_type: String,
        name: String,
        identifier: String,
    },
    /// Update a resource by identifier
    Update {
        resource_type: String,
        name: String,
        identifier: String,
        file: PathBuf,
    },
    /// Delete a resource by identifier
    Delete {
        resource_type: String,
        identifier: String,
    },
    /// Adopt an existing object by import ID
    Import {
        resource_type: String,
        name: String,
        import_id: String,
    },
    /// Read a data source
    Data {
        data_source_type: String,
        /// JSON object of inputs
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let result = match &cli.command {
        Commands::Schema { resource_type } => run_schema(resource_type.as_deref()),
        Commands::Validate {
            resource_type,
            file,
        } => run_validate(resource_type, file),
        Commands::Create {
            resource_type,
            name,
            file,
        } => run_create(&cli, resource_type, name, file).await,
        Commands::Read {
            resource_type,
            name,
            identifier,
        } => run_read(&cli, resource_type, name, identifier).await,
        Commands::Update {
            resource_type,
            name,
            identifier,
            file,
        } => run_update(&cli, resource_type, name, identifier, file).await,
        Commands::Delete {
            resource_type,
            identifier,
        } => run_delete(&cli, resource_type, identifier).await,
        Commands::Import {
            resource_type,
            name,
            import_id,
        } => run_import(&cli, resource_type, name, import_id).await,
        Commands::Data {
            data_source_type,
            file,
        } => run_data(&cli, data_source_type, file).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_provider(cli: &Cli) -> Result<AzionProvider, String> {
    let config = load_config(cli)?;
    AzionProvider::new(&config).map_err(|e| e.to_string())
}

/// Provider block from `--config` or the environment, with flags taking precedence
fn load_config(cli: &Cli) -> Result<ProviderConfig, String> {
    let mut config = match &cli.config {
        Some(file) => {
            let content = fs::read_to_string(file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            ProviderConfig::from_json(&content)
                .map_err(|e| format!("{}: {}", file.display(), e))?
        }
        None => ProviderConfig::from_env(),
    };
    if let Some(token) = &cli.token {
        config = config.with_token(token.as_str());
    }
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.as_str());
    }
    Ok(config)
}

fn load_attributes(file: &Path) -> Result<Attributes, String> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    parse_attributes(&content).map_err(|e| format!("{}: {}", file.display(), e))
}

fn parse_attributes(content: &str) -> Result<Attributes, String> {
    let json: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {}", e))?;
    match json {
        serde_json::Value::Object(map) => Ok(attributes_from_json(&map)),
        _ => Err("Expected a JSON object of attributes".to_string()),
    }
}

fn find_schema(type_name: &str) -> Option<ResourceSchema> {
    resources::handlers()
        .into_iter()
        .find(|h| h.type_name() == type_name)
        .map(|h| h.schema())
        .or_else(|| {
            data_sources::handlers()
                .into_iter()
                .find(|h| h.type_name() == type_name)
                .map(|h| h.schema())
        })
}

fn state_json(state: &State) -> serde_json::Value {
    serde_json::json!({
        "resource_type": state.id.resource_type,
        "name": state.id.name,
        "identifier": state.identifier,
        "attributes": attributes_to_json(&state.attributes),
    })
}

fn print_state(state: &State) -> Result<(), String> {
    if !state.exists {
        println!(
            "{}",
            format!("{} does not exist.", state.id).yellow()
        );
        return Ok(());
    }
    let json = serde_json::to_string_pretty(&state_json(state)).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Commands
// =============================================================================

fn run_schema(type_name: Option<&str>) -> Result<(), String> {
    let Some(type_name) = type_name else {
        println!("{}", "Resources:".bold());
        for handler in resources::handlers() {
            println!("  • {}", handler.type_name());
        }
        println!("{}", "Data sources:".bold());
        for handler in data_sources::handlers() {
            println!("  • {}", handler.type_name());
        }
        return Ok(());
    };

    let schema = find_schema(type_name).ok_or_else(|| format!("Unknown type: {}", type_name))?;
    println!("{}", schema.resource_type.cyan().bold());
    if let Some(description) = &schema.description {
        println!("{}", description);
    }
    let mut attributes: Vec<&AttributeSchema> = schema.attributes.values().collect();
    attributes.sort_by(|a, b| a.name.cmp(&b.name));
    for attr in attributes {
        println!("  {} {} {}", attr.name, attr.attr_type, attribute_flags(attr).dimmed());
    }
    Ok(())
}

fn attribute_flags(attr: &AttributeSchema) -> String {
    let mut flags = Vec::new();
    if attr.required {
        flags.push("required");
    } else if attr.is_read_only() {
        flags.push("computed");
    } else {
        flags.push("optional");
    }
    if attr.sensitive {
        flags.push("sensitive");
    }
    if attr.requires_replace {
        flags.push("forces replacement");
    }
    format!("({})", flags.join(", "))
}

fn run_validate(type_name: &str, file: &Path) -> Result<(), String> {
    let schema = find_schema(type_name).ok_or_else(|| format!("Unknown type: {}", type_name))?;
    let attributes = load_attributes(file)?;

    println!("{}", "Validating...".cyan());
    schema.validate(&attributes).map_err(|errors| {
        errors
            .iter()
            .map(|e| format!("{}: {}", type_name, e))
            .collect::<Vec<_>>()
            .join("\n")
    })?;

    println!(
        "{}",
        format!("✓ {} attributes validated successfully.", attributes.len())
            .green()
            .bold()
    );
    Ok(())
}

async fn run_create(cli: &Cli, type_name: &str, name: &str, file: &Path) -> Result<(), String> {
    let provider = build_provider(cli)?;
    let resource = Resource::new(type_name, name).with_attributes(load_attributes(file)?);
    let state = provider.create(&resource).await.map_err(|e| e.to_string())?;
    print_state(&state)
}

async fn run_read(cli: &Cli, type_name: &str, name: &str, identifier: &str) -> Result<(), String> {
    let provider = build_provider(cli)?;
    let id = ResourceId::new(type_name, name);
    let state = provider
        .read(&id, Some(identifier))
        .await
        .map_err(|e| e.to_string())?;
    print_state(&state)
}

async fn run_update(
    cli: &Cli,
    type_name: &str,
    name: &str,
    identifier: &str,
    file: &Path,
) -> Result<(), String> {
    let provider = build_provider(cli)?;
    let to = Resource::new(type_name, name).with_attributes(load_attributes(file)?);
    let from = provider
        .read(&to.id, Some(identifier))
        .await
        .map_err(|e| e.to_string())?;
    if !from.exists {
        return Err(format!("{} ({}) does not exist", to.id, identifier));
    }
    let state = provider
        .update(&to.id, identifier, &from, &to)
        .await
        .map_err(|e| e.to_string())?;
    print_state(&state)
}

async fn run_delete(cli: &Cli, type_name: &str, identifier: &str) -> Result<(), String> {
    let provider = build_provider(cli)?;
    let id = ResourceId::new(type_name, identifier);
    provider
        .delete(&id, identifier)
        .await
        .map_err(|e| e.to_string())?;
    println!("  {} {} {}", "✓".green(), type_name, identifier);
    Ok(())
}

async fn run_import(cli: &Cli, type_name: &str, name: &str, import_id: &str) -> Result<(), String> {
    let provider = build_provider(cli)?;
    let id = ResourceId::new(type_name, name);
    let state = provider
        .import(&id, import_id)
        .await
        .map_err(|e| e.to_string())?;
    print_state(&state)
}

async fn run_data(cli: &Cli, type_name: &str, file: &Path) -> Result<(), String> {
    let provider = build_provider(cli)?;
    let resource = Resource::new(type_name, "data")
        .with_attributes(load_attributes(file)?)
        .with_read_only(true);
    let state = provider
        .read_data_source(&resource)
        .await
        .map_err(|e| e.to_string())?;
    print_state(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use azion_core::resource::Value;

    #[test]
    fn parse_attributes_requires_object() {
        let attrs = parse_attributes(r#"{"name": "example", "ttl": 300, "unused": null}"#).unwrap();
        assert_eq!(attrs["name"], Value::from("example"));
        assert_eq!(attrs["ttl"], Value::Int(300));
        assert!(!attrs.contains_key("unused"));

        assert!(parse_attributes("[1, 2]").is_err());
        assert!(parse_attributes("{").is_err());
    }

    #[test]
    fn find_schema_covers_resources_and_data_sources() {
        assert!(find_schema("azion_intelligent_dns_zone").is_some());
        assert!(find_schema("azion_intelligent_dns_zones").is_some());
        assert!(find_schema("azion_unknown").is_none());
    }

    #[test]
    fn state_json_shape() {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), Value::from("example"));
        let state = State::existing(ResourceId::new("azion_intelligent_dns_zone", "main"), attributes)
            .with_identifier("12");

        assert_eq!(
            state_json(&state),
            serde_json::json!({
                "resource_type": "azion_intelligent_dns_zone",
                "name": "main",
                "identifier": "12",
                "attributes": {"name": "example"}
            })
        );
    }

    #[test]
    fn config_file_is_overridden_by_flags() {
        let file = std::env::temp_dir().join(format!("azion-cli-config-{}.json", std::process::id()));
        fs::write(
            &file,
            r#"{"api_token": "from-file", "base_url": "http://127.0.0.1:9", "max_retries": 1}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "azion",
            "--config",
            file.to_str().unwrap(),
            "--token",
            "from-flag",
            "schema",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        fs::remove_file(&file).unwrap();

        assert_eq!(config.api_token, "from-flag");
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["azion", "--config", "/nonexistent/azion.json", "schema"])
            .unwrap();
        assert!(load_config(&cli).unwrap_err().contains("Failed to read"));
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "azion",
            "read",
            "azion_domain",
            "www",
            "900",
            "--token",
            "abc",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Read { .. }));
    }
}
