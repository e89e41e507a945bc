use anyhow::bail;
use clap::{Parser, Subcommand};
use lingo_core::{
    config::{self, SourceConfig},
    engine::TranslationEngine,
    message::{PlaceholderValue, Placeholders},
    traits::TranslationSource,
};
use lingo_sources::{ForgeSource, JsonSource};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "lingo",
    version,
    about = "Client-side translation cache with live push updates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and list languages with their entry counts.
    Languages,
    /// Look up one message, with optional `name=value` placeholders.
    Get {
        language: String,
        key: String,
        /// Placeholder arguments as `name=value` pairs.
        #[arg(trailing_var_arg = true)]
        placeholders: Vec<String>,
    },
    /// Load the catalog and print live-update events as they arrive.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::load(&cli.config)?;
    let source = build_source(&config.source)?;
    let engine = TranslationEngine::new(source, config.cache);

    match cli.command {
        Commands::Languages => {
            let counts = engine.load_translations().await;
            let mut languages: Vec<_> = counts.into_iter().collect();
            languages.sort();
            for (language, count) in languages {
                println!("{language}: {count} entries");
            }
        }
        Commands::Get {
            language,
            key,
            placeholders,
        } => {
            engine.load_translations().await;
            let placeholders = parse_placeholders(&placeholders)?;
            match engine.get(&language, &key, &placeholders) {
                Some(entry) => println!("{}", entry.value),
                None => bail!("no translation found for {language}:{key}"),
            }
        }
        Commands::Watch => {
            engine.register_observer(Arc::new(|event| {
                println!("{}", format_event(event));
            }));
            engine.load_translations().await;
            info!("watching for live updates, press Ctrl+C to stop");
            tokio::signal::ctrl_c().await?;
        }
    }

    Ok(())
}

fn build_source(config: &SourceConfig) -> anyhow::Result<Arc<dyn TranslationSource>> {
    match config.kind.as_str() {
        "json" => Ok(Arc::new(JsonSource::new(&config.directory))),
        "forge" => {
            if config.base_url.is_empty() || config.translation_id.is_empty() {
                bail!("forge source requires base_url and translation_id");
            }
            Ok(Arc::new(ForgeSource::new(
                &config.base_url,
                &config.translation_id,
                config.api_key.clone(),
            )))
        }
        other => bail!("unknown source kind '{other}' (expected \"json\" or \"forge\")"),
    }
}

/// Parse `name=value` pairs into placeholders, keeping argument order.
fn parse_placeholders(args: &[String]) -> anyhow::Result<Placeholders> {
    let mut placeholders = Placeholders::new();
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("invalid placeholder '{arg}' (expected name=value)");
        };
        placeholders = placeholders.set(name, PlaceholderValue::Text(value.to_string()));
    }
    Ok(placeholders)
}

fn format_event(event: &lingo_core::event::LiveEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| format!("{event:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placeholders() {
        let args = vec!["name=World".to_string(), "count=3".to_string()];
        let ph = parse_placeholders(&args).unwrap();
        assert_eq!(ph.type_summary(), "name::String|count::String");
        assert_eq!(
            ph.get("name"),
            Some(&PlaceholderValue::Text("World".to_string()))
        );
    }

    #[test]
    fn test_parse_placeholders_rejects_bare_arg() {
        assert!(parse_placeholders(&["oops".to_string()]).is_err());
    }

    #[test]
    fn test_build_source_unknown_kind() {
        let config = SourceConfig {
            kind: "csv".into(),
            ..SourceConfig::default()
        };
        assert!(build_source(&config).is_err());
    }

    #[test]
    fn test_build_source_forge_requires_url() {
        let config = SourceConfig {
            kind: "forge".into(),
            ..SourceConfig::default()
        };
        assert!(build_source(&config).is_err());
    }
}
