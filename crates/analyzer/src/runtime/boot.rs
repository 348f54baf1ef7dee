//! Boot — logging init and config load.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{AnalyzerConfig, ConfigError};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config and let the first positional argument name the input file.
pub fn boot<I>(args: I) -> Result<AnalyzerConfig, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    info!("Starting log analyzer v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AnalyzerConfig::load()?;
    apply_args(&mut config, args);

    if config.input_path.is_none() {
        return Err(ConfigError::Invalid(
            "no input file: pass a path or set ANALYZER_INPUT".to_string(),
        ));
    }

    info!(
        input = config.input_path.as_deref().unwrap_or_default(),
        output = ?config.output,
        channel_capacity = config.channel_capacity,
        "configuration loaded"
    );
    Ok(config)
}

fn apply_args<I>(config: &mut AnalyzerConfig, args: I)
where
    I: IntoIterator<Item = String>,
{
    if let Some(path) = args.into_iter().find(|arg| !arg.starts_with('-')) {
        config.input_path = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_argument_wins() {
        let mut config = AnalyzerConfig {
            input_path: Some("from-env.log".to_string()),
            ..Default::default()
        };
        apply_args(&mut config, vec!["-v".to_string(), "teams.log".to_string()]);
        assert_eq!(config.input_path.as_deref(), Some("teams.log"));
    }

    #[test]
    fn test_no_arguments_keeps_config() {
        let mut config = AnalyzerConfig {
            input_path: Some("from-env.log".to_string()),
            ..Default::default()
        };
        apply_args(&mut config, Vec::new());
        assert_eq!(config.input_path.as_deref(), Some("from-env.log"));
    }
}
