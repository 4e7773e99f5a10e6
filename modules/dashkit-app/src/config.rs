use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dashkit_router::{PageRegistry, RouteDef, RouterOptions};
use serde::Deserialize;

const BUNDLED_CONFIG: &str = include_str!("../config/dashkit.toml");

/// TOML-backed configuration: application identity, routes and mock data
/// behaviour. Per-machine overrides come from the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub app: RouterOptions,
    #[serde(default)]
    pub mock: MockConfig,
    pub routes: Vec<RouteDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MockConfig {
    pub latency_ms: u64,
    /// Failure keys, e.g. `project:2` or `activity:1`.
    pub fail: Vec<String>,
    /// JSON fixtures; the bundled set when absent.
    pub fixtures: Option<PathBuf>,
}

impl FileConfig {
    /// The config shipped with the binary.
    pub fn bundled() -> Result<Self> {
        toml::from_str(BUNDLED_CONFIG).context("Failed to parse bundled config")
    }

    pub fn registry(&self) -> Result<PageRegistry> {
        PageRegistry::from_defs(self.routes.iter().cloned()).context("Invalid [[routes]] table")
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Settings taken from the environment (and `.env`).
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config_path: Option<PathBuf>,
    pub mock_latency_ms: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mock_latency_ms = match std::env::var("DASHKIT_MOCK_LATENCY_MS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("DASHKIT_MOCK_LATENCY_MS is not a number: {raw:?}"))?,
            ),
            Err(_) => None,
        };
        let config = Self {
            config_path: std::env::var("DASHKIT_CONFIG").ok().map(PathBuf::from),
            mock_latency_ms,
        };

        config.log_summary();
        Ok(config)
    }

    fn log_summary(&self) {
        fn or_unset<T: std::fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "<not set>".to_string(), |v| v.to_string())
        }

        tracing::info!("Environment loaded:");
        tracing::info!(
            "  DASHKIT_CONFIG: {}",
            or_unset(self.config_path.as_ref().map(|p| p.display()))
        );
        tracing::info!("  DASHKIT_MOCK_LATENCY_MS: {}", or_unset(self.mock_latency_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashkit_router::Layout;

    #[test]
    fn bundled_config_builds_a_registry() {
        let config = FileConfig::bundled().unwrap();
        assert_eq!(config.app.app_name, "Acme Console");
        assert_eq!(config.app.default_route, "dashboard");

        let registry = config.registry().unwrap();
        assert_eq!(registry.get("login").unwrap().layout, Layout::Standalone);
        assert!(!registry.get("project-detail").unwrap().nav);
        assert!(registry.contains(&config.app.not_found_route));
    }

    #[test]
    fn mock_section_is_optional() {
        let config: FileConfig = toml::from_str(
            r#"
            [app]
            name = "Tiny"

            [[routes]]
            key = "dashboard"
            title = "Dashboard"
            layout = "dashboard"
            "#,
        )
        .unwrap();
        assert_eq!(config.mock.latency_ms, 0);
        assert!(config.mock.fail.is_empty());
        assert_eq!(config.app.root_selector, "#app");
    }

    const MINIMAL: &str = r#"
        [app]
        name = "Tiny"

        [[routes]]
        key = "dashboard"
        title = "Dashboard"
        layout = "dashboard"
    "#;

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(toml::from_str::<FileConfig>(MINIMAL).is_ok());

        let with_server = format!("{MINIMAL}\n[server]\nport = 80\n");
        let err = toml::from_str::<FileConfig>(&with_server).unwrap_err();
        assert!(err.to_string().contains("server"));
    }

    #[test]
    fn bad_route_keys_fail_registry_construction() {
        let config: FileConfig = toml::from_str(
            r#"
            [app]
            name = "Tiny"

            [[routes]]
            key = "Project_Detail"
            title = "Project"
            layout = "dashboard"
            "#,
        )
        .unwrap();
        let err = config.registry().unwrap_err();
        assert!(format!("{err:#}").contains("kebab-case"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_config(Path::new("/nonexistent/dashkit.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dashkit.toml"));
    }
}
