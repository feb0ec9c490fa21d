//! Configuration for relief-gateway
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;

/// relief-gateway - HTTP API for the relief supplies and donations platform
#[derive(Parser, Debug, Clone)]
#[command(name = "relief-gateway")]
#[command(about = "HTTP API gateway for relief supplies and donations")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "relief")]
    pub mongodb_db: String,

    /// JWT secret for token signing
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Get the configured JWT secret
    ///
    /// Only meaningful after `validate()` has passed.
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or("")
    }

    /// Validate configuration before the server starts
    pub fn validate(&self) -> Result<(), String> {
        match &self.jwt_secret {
            None => return Err("JWT_SECRET is required".to_string()),
            Some(s) if s.is_empty() => return Err("JWT_SECRET must not be empty".to_string()),
            Some(_) => {}
        }

        if self.jwt_expiry_seconds == 0 {
            return Err("JWT_EXPIRY_SECONDS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            listen: "0.0.0.0:5000".parse().unwrap(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db: "relief".to_string(),
            jwt_secret: Some("test-secret".to_string()),
            jwt_expiry_seconds: 3600,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_args().validate().is_ok());
    }

    #[test]
    fn missing_jwt_secret_rejected() {
        let mut args = base_args();
        args.jwt_secret = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn empty_jwt_secret_rejected() {
        let mut args = base_args();
        args.jwt_secret = Some(String::new());
        assert!(args.validate().is_err());
    }

    #[test]
    fn zero_expiry_rejected() {
        let mut args = base_args();
        args.jwt_expiry_seconds = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn default_port_is_5000() {
        let args = Args::parse_from(["relief-gateway", "--jwt-secret", "s"]);
        assert_eq!(args.listen.port(), 5000);
    }
}
