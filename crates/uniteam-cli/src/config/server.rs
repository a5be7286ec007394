//! HTTP server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;
use crate::server::{ServerError, ServerResult};

/// Network binding and lifecycle of the HTTP server.
///
/// - `HOST`: address to bind (default `127.0.0.1`)
/// - `PORT`: TCP port, 1024-65535 (default `3000`)
/// - `SHUTDOWN_TIMEOUT`: seconds to drain connections on shutdown, 1-300
#[derive(Debug, Clone, PartialEq, Eq, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    ///
    /// Use "127.0.0.1" for localhost only, "0.0.0.0" for all interfaces.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Maximum time in seconds to wait for in-flight requests on shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    /// Rejects privileged ports and out-of-range shutdown timeouts.
    pub fn validate(&self) -> ServerResult<()> {
        if self.port < 1024 {
            return Err(ServerError::InvalidConfig(format!(
                "port {} is below 1024, use ports 1024-65535",
                self.port
            )));
        }

        if !(1..=300).contains(&self.shutdown_timeout) {
            return Err(ServerError::InvalidConfig(format!(
                "shutdown timeout {}s must be between 1 and 300 seconds",
                self.shutdown_timeout
            )));
        }

        Ok(())
    }

    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns whether the host is `0.0.0.0` or `::`.
    #[must_use]
    pub const fn binds_to_all_interfaces(&self) -> bool {
        match self.host {
            IpAddr::V4(addr) => addr.is_unspecified(),
            IpAddr::V6(addr) => addr.is_unspecified(),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = %self.host,
            port = self.port,
            shutdown_timeout_secs = self.shutdown_timeout,
            "Server configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.binds_to_all_interfaces());
        assert_eq!(config.server_addr().port(), 3000);
    }

    #[test]
    fn rejects_privileged_ports() {
        let config = ServerConfig {
            port: 80,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_out_of_range_shutdown_timeouts() {
        for shutdown_timeout in [0, 301] {
            let config = ServerConfig {
                shutdown_timeout,
                ..ServerConfig::default()
            };
            assert!(config.validate().is_err());
        }

        let config = ServerConfig {
            shutdown_timeout: 300,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn detects_unspecified_hosts() {
        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..ServerConfig::default()
        };
        assert!(config.binds_to_all_interfaces());
    }
}
