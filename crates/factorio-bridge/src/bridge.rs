//! Live Factorio world access over RCON

use crate::rcon::RconClient;
use crate::snapshot::{WorldSnapshot, snapshot_lua};
use connect_core::{ConnectError, Position, Result};
use tokio::time::{Duration, timeout};
use tracing::{debug, info};

/// Configuration for the Factorio connection
#[derive(Debug, Clone)]
pub struct FactorioConfig {
    /// RCON server address (host:port)
    pub rcon_address: String,
    /// RCON password
    pub rcon_password: String,
    /// Surface queried for entities
    pub surface: String,
    /// Timeout for a single query
    pub timeout: Duration,
}

impl Default for FactorioConfig {
    fn default() -> Self {
        Self {
            rcon_address: "127.0.0.1:27015".to_string(),
            rcon_password: "factorio".to_string(),
            surface: "nauvis".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl FactorioConfig {
    /// Defaults overridden by `FACTORIO_RCON_ADDR`, `FACTORIO_RCON_PASSWORD`
    /// and `FACTORIO_SURFACE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            rcon_address: lookup("FACTORIO_RCON_ADDR").unwrap_or(defaults.rcon_address),
            rcon_password: lookup("FACTORIO_RCON_PASSWORD").unwrap_or(defaults.rcon_password),
            surface: lookup("FACTORIO_SURFACE").unwrap_or(defaults.surface),
            timeout: defaults.timeout,
        }
    }

    /// Create config with custom RCON settings
    pub fn with_rcon(address: String, password: String) -> Self {
        Self {
            rcon_address: address,
            rcon_password: password,
            ..Default::default()
        }
    }
}

/// Read-only view of a running Factorio game
pub struct FactorioWorld {
    config: FactorioConfig,
    rcon: RconClient,
    game_version: Option<String>,
}

impl FactorioWorld {
    pub fn new() -> Self {
        Self::with_config(FactorioConfig::default())
    }

    pub fn with_config(config: FactorioConfig) -> Self {
        let rcon = RconClient::new(&config.rcon_address, &config.rcon_password);
        Self {
            config,
            rcon,
            game_version: None,
        }
    }

    pub fn config(&self) -> &FactorioConfig {
        &self.config
    }

    /// Connect, authenticate and check the surface exists
    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to Factorio at {}", self.config.rcon_address);
        self.rcon.connect().await?;

        let version = self
            .query("rcon.print(script.active_mods['base'])")
            .await?;
        if !version.trim().is_empty() {
            self.game_version = Some(version.trim().to_string());
        }

        let surface = self
            .query(&format!(
                "rcon.print(game.surfaces['{}'] and 'ok' or 'missing')",
                self.config.surface
            ))
            .await?;
        if !surface.contains("ok") {
            return Err(ConnectError::GameError(format!(
                "surface '{}' not found",
                self.config.surface
            )));
        }

        info!(
            "Connected to Factorio v{}",
            self.game_version.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.rcon.is_connected()
    }

    pub fn game_version(&self) -> Option<&str> {
        self.game_version.as_deref()
    }

    /// Freeze every entity within `radius` tiles of `center`
    pub async fn snapshot(&self, center: Position, radius: f64) -> Result<WorldSnapshot> {
        let lua = snapshot_lua(&self.config.surface, center, radius);
        let response = self.query(&lua).await?;
        let snapshot = WorldSnapshot::from_rcon_json(&response)?;
        debug!(
            "Snapshot around {} (r={}): {} entities",
            center,
            radius,
            snapshot.len()
        );
        Ok(snapshot)
    }

    async fn query(&self, lua: &str) -> Result<String> {
        timeout(self.config.timeout, self.rcon.lua(lua))
            .await
            .map_err(|_| {
                ConnectError::IpcError(format!(
                    "RCON query timed out after {:?}",
                    self.config.timeout
                ))
            })?
    }

    pub async fn disconnect(&self) {
        self.rcon.disconnect().await;
    }
}

impl Default for FactorioWorld {
    fn default() -> Self {
        Self::new()
    }
}
