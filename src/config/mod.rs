use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Highest number of decimals the API rounds distances to.
pub const MAX_DISPLAY_PRECISION: u32 = 6;

/// Slowest average speed accepted for ETA projection.
pub const MIN_AVERAGE_SPEED_KMH: f64 = 0.1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub display_precision: u32,
    pub average_speed_kmh: f64,
    pub request_timeout_secs: u64,
    pub allow_seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            display_precision: 2,
            average_speed_kmh: 60.0,
            request_timeout_secs: 30,
            allow_seed: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with `SHIPTRACK_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("display_precision", i64::from(defaults.display_precision))?
            .set_default("average_speed_kmh", defaults.average_speed_kmh)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("allow_seed", defaults.allow_seed)?
            .add_source(config::Environment::with_prefix("SHIPTRACK"))
            .build()?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        config.validated()
    }

    fn validated(mut self) -> anyhow::Result<Self> {
        let speed = self.average_speed_kmh;
        if !(speed.is_finite() && speed >= MIN_AVERAGE_SPEED_KMH) {
            anyhow::bail!(
                "Invalid average_speed_kmh value: {} (must be at least {})",
                self.average_speed_kmh,
                MIN_AVERAGE_SPEED_KMH
            );
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("Invalid request_timeout_secs value: must be at least 1");
        }
        self.display_precision = self.display_precision.min(MAX_DISPLAY_PRECISION);
        Ok(self)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}:{}: {}", self.host, self.port, e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
