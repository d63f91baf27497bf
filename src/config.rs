//! Configuration parsing and validation for the shim
//!
//! Every setting can come from the command line, and the backend settings also
//! fall back to the environment, so the shim drops into the same deployments as
//! a plain Ollama client.
use anyhow::anyhow;
use clap::Parser;
use ollama_shim::backend::Backend;
use ollama_shim::client::PoolSettings;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the Ollama backend.
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: Url,

    /// Model used when a chat request doesn't name one, and the only model
    /// listed when the backend can't be reached.
    #[arg(long, env = "OLLAMA_MODEL", default_value = "qwen2.5-coder:32b")]
    pub model: String,

    /// The address on which the shim will listen.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// The port on which the shim will listen.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Whether to enable the metrics endpoint.
    #[arg(short = 'm', long, default_value_t = false)]
    pub metrics: bool,

    /// The port on which the metrics server will listen.
    #[arg(long, default_value_t = 9090)]
    pub metrics_port: u16,

    /// The prefix to use for metrics.
    #[arg(long, default_value = "ollama_shim")]
    pub metrics_prefix: String,

    /// Maximum number of idle HTTP connections to keep alive to the backend.
    #[arg(long, default_value_t = 100)]
    pub pool_max_idle_per_host: usize,

    /// How long (in seconds) to keep idle HTTP connections alive.
    #[arg(long, default_value_t = 90)]
    pub pool_idle_timeout_secs: u64,
}

impl Config {
    pub fn validate(self) -> Result<Self, anyhow::Error> {
        if !matches!(self.ollama_url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Ollama URL '{}' must use http or https",
                self.ollama_url
            ));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("Default model must not be empty"));
        }
        Ok(self)
    }

    pub fn backend(&self) -> Backend {
        Backend::builder()
            .base_url(self.ollama_url.clone())
            .default_model(self.model.clone())
            .build()
    }

    pub fn pool(&self) -> PoolSettings {
        PoolSettings {
            max_idle_per_host: self.pool_max_idle_per_host,
            idle_timeout: Duration::from_secs(self.pool_idle_timeout_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("ollama-shim").chain(args.iter().copied());
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        let config = parse(&[
            "--ollama-url",
            "http://gpu-box:11434",
            "--model",
            "llama3:8b",
            "--host",
            "127.0.0.1",
            "-p",
            "8080",
        ])
        .validate()
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        let backend = config.backend();
        assert_eq!(backend.default_model, "llama3:8b");
        assert_eq!(backend.endpoint("api/tags"), "http://gpu-box:11434/api/tags");
        assert_eq!(config.pool().idle_timeout, Duration::from_secs(90));
        assert!(!config.metrics);
    }

    #[test]
    fn test_rejects_non_http_backend() {
        let config = parse(&["--ollama-url", "ftp://gpu-box", "--model", "llama3"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_model() {
        let config = parse(&["--ollama-url", "http://gpu-box", "--model", "  "]);
        assert!(config.validate().is_err());
    }
}
