//! Source factory - builds the configured content source binding.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use waypoint_config::{AppConfig, Binding, ConfigError};
use waypoint_core::{ContentSource, FetchError};

use crate::catalog::StaticContentSource;
use crate::http::HttpContentSource;
use crate::sdk::{EmbeddedSdk, SdkConfig, SdkContentSource, TargetedContentSdk};

/// Errors while building a content source.
#[derive(Debug, thiserror::Error)]
pub enum SourceBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to set up {binding} source: {source}")]
    Setup {
        binding: &'static str,
        #[source]
        source: FetchError,
    },
}

/// Build the content source selected by `config.binding`.
pub async fn build_from_config(
    config: &AppConfig,
) -> Result<Arc<dyn ContentSource>, SourceBuildError> {
    let source: Arc<dyn ContentSource> = match config.binding {
        Binding::Http => {
            let http = HttpContentSource::new(
                &config.api_base_url,
                config.organization_code()?,
                Duration::from_secs(config.request_timeout_secs),
            )
            .map_err(|source| SourceBuildError::Setup { binding: "http", source })?;
            Arc::new(http)
        }
        Binding::Sdk => {
            let sdk = EmbeddedSdk::new();
            sdk.initialize(SdkConfig::from_app_config(config)?)
                .await
                .map_err(|source| SourceBuildError::Setup { binding: "sdk", source })?;
            Arc::new(SdkContentSource::new(sdk))
        }
        Binding::Static => {
            let catalog = match &config.static_catalog.path {
                Some(path) => StaticContentSource::from_json_file(path)
                    .map_err(|source| SourceBuildError::Setup { binding: "static", source })?,
                None => StaticContentSource::new(),
            };
            Arc::new(catalog.with_delay(Duration::from_millis(config.static_catalog.delay_ms)))
        }
    };

    info!(binding = source.name(), "Content source ready");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn http_binding_requires_organization_code() {
        let config = AppConfig::default();
        let result = build_from_config(&config).await;
        assert!(matches!(result, Err(SourceBuildError::Config(_))));
    }

    #[tokio::test]
    async fn builds_each_binding() {
        let base = AppConfig {
            organization_code: Some("acme".into()),
            ..AppConfig::default()
        };

        let http = build_from_config(&base).await.unwrap();
        assert_eq!(http.name(), "http");

        let sdk = build_from_config(&AppConfig { binding: Binding::Sdk, ..base.clone() })
            .await
            .unwrap();
        assert_eq!(sdk.name(), "sdk");

        let stat = build_from_config(&AppConfig { binding: Binding::Static, ..base })
            .await
            .unwrap();
        assert_eq!(stat.name(), "static");
    }

    #[tokio::test]
    async fn static_binding_needs_no_organization_code() {
        let config = AppConfig {
            binding: Binding::Static,
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).await.is_ok());
    }

    #[tokio::test]
    async fn missing_catalog_file_is_setup_error() {
        let mut config = AppConfig {
            binding: Binding::Static,
            ..AppConfig::default()
        };
        config.static_catalog.path = Some("/nonexistent/catalog.json".into());
        let result = build_from_config(&config).await;
        assert!(matches!(result, Err(SourceBuildError::Setup { binding: "static", .. })));
    }
}
