use anyhow::{Context, Result, bail};
use ipinfo_shared::Schema;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const CONFIG_PATHS: [&str; 2] = ["/etc/ipinfo-web/config.toml", "./ipinfo-web.toml"];

/// How `/html` and `/` present a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlMode {
    /// Server-side accordion report.
    #[default]
    Report,
    /// Static shell with the record embedded as a JSON script block.
    DataIsland,
}

impl HtmlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HtmlMode::Report => "report",
            HtmlMode::DataIsland => "data_island",
        }
    }
}

impl fmt::Display for HtmlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HtmlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "report" => Ok(HtmlMode::Report),
            "data_island" => Ok(HtmlMode::DataIsland),
            other => Err(format!("unknown html mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub listen_port: u16,
    pub html_mode: HtmlMode,
    /// Fetch once at startup and serve that record for the process lifetime.
    pub snapshot: bool,
    pub upstream: UpstreamConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_port: 8080,
            html_mode: HtmlMode::default(),
            snapshot: false,
            upstream: UpstreamConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub schema: Schema,
    /// Falls back to the schema's public endpoint.
    pub base_url: Option<String>,
    /// Empty string disables the selector.
    pub fields: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            base_url: None,
            fields: None,
            timeout_secs: 10,
        }
    }
}

impl UpstreamConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.schema.default_base_url())
    }

    pub fn fields(&self) -> Option<&str> {
        match self.fields.as_deref() {
            Some(fields) if fields.trim().is_empty() => None,
            Some(fields) => Some(fields.trim()),
            None => self.schema.default_fields(),
        }
    }

    /// Full lookup URL, selector included.
    pub fn request_url(&self) -> Result<Url> {
        let base = self.base_url();
        let url = match self.fields() {
            Some(fields) => Url::parse_with_params(base, &[("fields", fields)]),
            None => Url::parse(base),
        };
        url.with_context(|| format!("Invalid upstream base URL '{}'", base))
    }
}

impl WebConfig {
    /// Explicit path, then the well-known paths, then the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                tracing::info!("Loading config from {}", path.display());
                Self::from_toml(&contents)?
            }
            None => Self::load_default()?,
        };
        config.validate()?;
        Ok(config)
    }

    fn load_default() -> Result<Self> {
        for path in CONFIG_PATHS {
            if let Ok(contents) = fs::read_to_string(path) {
                tracing::info!("Loading config from {}", path);
                return Self::from_toml(&contents);
            }
        }

        tracing::info!("Loading config from environment");
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let schema = match var("UPSTREAM_SCHEMA") {
            Some(s) => s.parse::<Schema>().map_err(anyhow::Error::msg)?,
            None => defaults.upstream.schema,
        };
        let html_mode = match var("HTML_MODE") {
            Some(s) => s.parse::<HtmlMode>().map_err(anyhow::Error::msg)?,
            None => defaults.html_mode,
        };
        let listen_port = match var("LISTEN_PORT") {
            Some(p) => p.trim().parse().context("LISTEN_PORT is not a port number")?,
            None => defaults.listen_port,
        };
        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(t) => t
                .trim()
                .parse()
                .context("UPSTREAM_TIMEOUT_SECS is not a number")?,
            None => defaults.upstream.timeout_secs,
        };
        let snapshot = var("SNAPSHOT")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.snapshot);

        Ok(Self {
            listen_port,
            html_mode,
            snapshot,
            upstream: UpstreamConfig {
                schema,
                base_url: var("UPSTREAM_URL"),
                fields: var("UPSTREAM_FIELDS"),
                timeout_secs,
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.upstream.timeout_secs == 0 {
            bail!("upstream.timeout_secs must be greater than zero");
        }
        self.upstream.request_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_public_flat_api() {
        let config = WebConfig::default();
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.html_mode, HtmlMode::Report);
        assert!(!config.snapshot);

        let url = config.upstream.request_url().unwrap();
        assert_eq!(url.host_str(), Some("ip-api.com"));
        let fields = url
            .query_pairs()
            .find(|(k, _)| k == "fields")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(fields.starts_with("status,message,"));
    }

    #[test]
    fn widget_schema_uses_fixed_endpoint_without_selector() {
        let config = WebConfig::from_toml(
            r#"
            [upstream]
            schema = "widget"
            "#,
        )
        .unwrap();
        let url = config.upstream.request_url().unwrap();
        assert_eq!(url.as_str(), "https://ipinfo.io/widget");
    }

    #[test]
    fn toml_overrides_are_applied() {
        let config = WebConfig::from_toml(
            r#"
            listen_port = 9090
            html_mode = "data_island"
            snapshot = true

            [upstream]
            base_url = "http://localhost:4000/json/"
            fields = "query,city"
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_port, 9090);
        assert_eq!(config.html_mode, HtmlMode::DataIsland);
        assert!(config.snapshot);
        assert_eq!(config.upstream.timeout_secs, 3);
        assert_eq!(
            config.upstream.request_url().unwrap().as_str(),
            "http://localhost:4000/json/?fields=query%2Ccity"
        );
    }

    #[test]
    fn empty_fields_disable_the_selector() {
        let upstream = UpstreamConfig {
            fields: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(upstream.fields(), None);
        assert_eq!(upstream.request_url().unwrap().query(), None);
    }

    #[test]
    fn environment_variables_are_read() {
        let config = WebConfig::from_vars(vars(&[
            ("LISTEN_PORT", "8181"),
            ("UPSTREAM_SCHEMA", "widget"),
            ("HTML_MODE", "data-island"),
            ("SNAPSHOT", "yes"),
            ("UPSTREAM_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.listen_port, 8181);
        assert_eq!(config.upstream.schema, Schema::Widget);
        assert_eq!(config.html_mode, HtmlMode::DataIsland);
        assert!(config.snapshot);
        assert_eq!(config.upstream.timeout_secs, 2);
        assert_eq!(config.upstream.base_url(), "https://ipinfo.io/widget");
    }

    #[test]
    fn bad_environment_values_are_errors() {
        assert!(WebConfig::from_vars(vars(&[("LISTEN_PORT", "eighty")])).is_err());
        assert!(WebConfig::from_vars(vars(&[("UPSTREAM_SCHEMA", "xml")])).is_err());
        assert!(WebConfig::from_vars(vars(&[("HTML_MODE", "pdf")])).is_err());
    }

    #[test]
    fn validate_rejects_bad_url_and_zero_timeout() {
        let mut config = WebConfig::default();
        config.upstream.base_url = Some("not a url".into());
        assert!(config.validate().is_err());

        let mut config = WebConfig::default();
        config.upstream.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_an_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_port = 7070").unwrap();
        let config = WebConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.listen_port, 7070);
    }

    #[test]
    fn load_fails_on_missing_explicit_file() {
        assert!(WebConfig::load(Some(Path::new("/nonexistent/ipinfo-web.toml"))).is_err());
    }
}
