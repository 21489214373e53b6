use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::kyc::payload::{
    PayloadProfile, DEFAULT_DOCUMENT_TYPE, DEFAULT_EXTERNAL_ID_PREFIX, DEFAULT_ORIGIN_LABEL,
};
use crate::workflows::kyc::reasoning::ReasoningVerbosity;
use crate::workflows::kyc::scoring::ScoringMode;

pub const DEFAULT_NETWORK: &str = "polygon-amoy";
pub const DEFAULT_GAS_LIMIT: u64 = 1_200_000;
pub const DEFAULT_IDENTITY_CONTRACT: &str = "0x8b9b5D3f698BE53Ae98162f6e013Bc9214bc7AF0";
pub const DEFAULT_ATTESTATION_CONTRACT: &str = "0x4c92d3305e7F1417f718827B819E285325a823d3";
pub const DEFAULT_REPUTATION_CONTRACT: &str = "0xd1F37B4be48FC4B8287059C92F9A2450D4b0990B";
pub const DEFAULT_CERTIFICATE_BASE_URL: &str = "https://annaprotocol.com/verify";
pub const DEFAULT_DASHBOARD_URL: &str = "https://dashboard.annaprotocol.online";
pub const DEFAULT_CONTENT_GATEWAY_URL: &str = "https://gateway.pinata.cloud/ipfs";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub kyc: KycConfig,
    pub attestation: AttestationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match non_empty_var("APP_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: "APP_LOG_FORMAT",
                value: raw,
            })?,
            None => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            kyc: KycConfig::from_env()?,
            attestation: AttestationConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Knobs for the scoring, reasoning and payload pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct KycConfig {
    pub scoring_mode: ScoringMode,
    pub verbosity: ReasoningVerbosity,
    pub payload_profile: PayloadProfile,
    pub external_id_prefix: String,
    pub document_type: String,
    pub origin_label: String,
    pub certificate_base_url: String,
    pub dashboard_url: String,
    /// Public gateway prefix for archived evidence (`<base>/<cid>`).
    pub content_gateway_url: String,
}

impl Default for KycConfig {
    fn default() -> Self {
        Self {
            scoring_mode: ScoringMode::Fixed,
            verbosity: ReasoningVerbosity::Brief,
            payload_profile: PayloadProfile::OnChain,
            external_id_prefix: DEFAULT_EXTERNAL_ID_PREFIX.to_string(),
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            origin_label: DEFAULT_ORIGIN_LABEL.to_string(),
            certificate_base_url: DEFAULT_CERTIFICATE_BASE_URL.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            content_gateway_url: DEFAULT_CONTENT_GATEWAY_URL.to_string(),
        }
    }
}

impl KycConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let scoring_mode = match non_empty_var("KYC_SCORING_MODE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KYC_SCORING_MODE",
                value: raw,
            })?,
            None => defaults.scoring_mode,
        };
        let verbosity = match non_empty_var("KYC_REASONING_VERBOSITY") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KYC_REASONING_VERBOSITY",
                value: raw,
            })?,
            None => defaults.verbosity,
        };
        let payload_profile = match non_empty_var("KYC_PAYLOAD_PROFILE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "KYC_PAYLOAD_PROFILE",
                value: raw,
            })?,
            None => defaults.payload_profile,
        };

        Ok(Self {
            scoring_mode,
            verbosity,
            payload_profile,
            external_id_prefix: non_empty_var("KYC_EXTERNAL_ID_PREFIX")
                .unwrap_or(defaults.external_id_prefix),
            document_type: non_empty_var("KYC_DOCUMENT_TYPE").unwrap_or(defaults.document_type),
            origin_label: non_empty_var("KYC_ORIGIN_LABEL").unwrap_or(defaults.origin_label),
            certificate_base_url: non_empty_var("KYC_CERTIFICATE_BASE_URL")
                .unwrap_or(defaults.certificate_base_url),
            dashboard_url: non_empty_var("KYC_DASHBOARD_URL").unwrap_or(defaults.dashboard_url),
            content_gateway_url: non_empty_var("KYC_CONTENT_GATEWAY_URL")
                .unwrap_or(defaults.content_gateway_url),
        })
    }
}

/// Content-addressed storage credentials forwarded to the attestation gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .finish()
    }
}

/// Pass-through settings for the attestation collaborator.
///
/// Nothing here is validated at startup; the client reports missing credentials when a
/// request first needs them.
#[derive(Clone, PartialEq)]
pub struct AttestationConfig {
    pub private_key: Option<String>,
    pub network: String,
    pub gateway_url: Option<String>,
    pub identity_contract: Option<String>,
    pub attestation_contract: Option<String>,
    pub reputation_contract: Option<String>,
    pub gas_limit: u64,
    pub wait_for_confirmation: bool,
    pub timeout: Option<Duration>,
    pub storage: Option<StorageCredentials>,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            network: DEFAULT_NETWORK.to_string(),
            gateway_url: None,
            identity_contract: Some(DEFAULT_IDENTITY_CONTRACT.to_string()),
            attestation_contract: Some(DEFAULT_ATTESTATION_CONTRACT.to_string()),
            reputation_contract: Some(DEFAULT_REPUTATION_CONTRACT.to_string()),
            gas_limit: DEFAULT_GAS_LIMIT,
            wait_for_confirmation: true,
            timeout: None,
            storage: None,
        }
    }
}

impl fmt::Debug for AttestationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttestationConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "***"))
            .field("network", &self.network)
            .field("gateway_url", &self.gateway_url)
            .field("identity_contract", &self.identity_contract)
            .field("attestation_contract", &self.attestation_contract)
            .field("reputation_contract", &self.reputation_contract)
            .field("gas_limit", &self.gas_limit)
            .field("wait_for_confirmation", &self.wait_for_confirmation)
            .field("timeout", &self.timeout)
            .field("storage", &self.storage)
            .finish()
    }
}

impl AttestationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let gas_limit = match non_empty_var("ATTESTATION_GAS_LIMIT") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "ATTESTATION_GAS_LIMIT",
                value: raw,
            })?,
            None => defaults.gas_limit,
        };
        let wait_for_confirmation = match non_empty_var("ATTESTATION_WAIT_FOR_CONFIRMATION") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: "ATTESTATION_WAIT_FOR_CONFIRMATION",
                value: raw,
            })?,
            None => defaults.wait_for_confirmation,
        };
        let timeout = match non_empty_var("ATTESTATION_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "ATTESTATION_TIMEOUT_SECS",
                    value: raw,
                }
            })?)),
            None => None,
        };
        let storage = match (non_empty_var("IPFS_API_KEY"), non_empty_var("IPFS_API_SECRET")) {
            (Some(api_key), Some(api_secret)) => Some(StorageCredentials {
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            private_key: non_empty_var("ATTESTATION_PRIVATE_KEY"),
            network: non_empty_var("ATTESTATION_NETWORK").unwrap_or(defaults.network),
            gateway_url: non_empty_var("ATTESTATION_GATEWAY_URL"),
            identity_contract: non_empty_var("ATTESTATION_IDENTITY_CONTRACT")
                .or(defaults.identity_contract),
            attestation_contract: non_empty_var("ATTESTATION_ATTESTATION_CONTRACT")
                .or(defaults.attestation_contract),
            reputation_contract: non_empty_var("ATTESTATION_REPUTATION_CONTRACT")
                .or(defaults.reputation_contract),
            gas_limit,
            wait_for_confirmation,
            timeout,
            storage,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    const KEYS: &[&str] = &[
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_FORMAT",
        "KYC_SCORING_MODE",
        "KYC_REASONING_VERBOSITY",
        "KYC_PAYLOAD_PROFILE",
        "KYC_EXTERNAL_ID_PREFIX",
        "KYC_DOCUMENT_TYPE",
        "KYC_ORIGIN_LABEL",
        "KYC_CERTIFICATE_BASE_URL",
        "KYC_DASHBOARD_URL",
        "KYC_CONTENT_GATEWAY_URL",
        "ATTESTATION_PRIVATE_KEY",
        "ATTESTATION_NETWORK",
        "ATTESTATION_GATEWAY_URL",
        "ATTESTATION_IDENTITY_CONTRACT",
        "ATTESTATION_ATTESTATION_CONTRACT",
        "ATTESTATION_REPUTATION_CONTRACT",
        "ATTESTATION_GAS_LIMIT",
        "ATTESTATION_WAIT_FOR_CONFIRMATION",
        "ATTESTATION_TIMEOUT_SECS",
        "IPFS_API_KEY",
        "IPFS_API_SECRET",
    ];

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.kyc, KycConfig::default());
        assert_eq!(config.attestation.network, DEFAULT_NETWORK);
        assert_eq!(config.attestation.gas_limit, DEFAULT_GAS_LIMIT);
        assert!(config.attestation.private_key.is_none());
        assert!(config.attestation.timeout.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn missing_attestation_credentials_do_not_fail_startup() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("IPFS_API_KEY", "key-only");
        let config = AppConfig::load().expect("config loads without credentials");
        assert!(config.attestation.gateway_url.is_none());
        assert!(config.attestation.storage.is_none());
        reset_env();
    }

    #[test]
    fn reads_workflow_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KYC_SCORING_MODE", "weighted");
        env::set_var("KYC_REASONING_VERBOSITY", "detailed");
        env::set_var("KYC_PAYLOAD_PROFILE", "archival");
        env::set_var("ATTESTATION_TIMEOUT_SECS", "45");
        env::set_var("ATTESTATION_WAIT_FOR_CONFIRMATION", "no");
        env::set_var("KYC_CONTENT_GATEWAY_URL", "https://ipfs.example/ipfs");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.kyc.scoring_mode, ScoringMode::Weighted);
        assert_eq!(config.kyc.verbosity, ReasoningVerbosity::Detailed);
        assert_eq!(config.kyc.payload_profile, PayloadProfile::Archival);
        assert_eq!(config.attestation.timeout, Some(Duration::from_secs(45)));
        assert!(!config.attestation.wait_for_confirmation);
        assert_eq!(config.kyc.content_gateway_url, "https://ipfs.example/ipfs");
        reset_env();
    }

    #[test]
    fn rejects_unknown_verbosity() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KYC_REASONING_VERBOSITY", "chatty");
        match AppConfig::load() {
            Err(ConfigError::InvalidValue { key, .. }) => {
                assert_eq!(key, "KYC_REASONING_VERBOSITY")
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn debug_output_hides_signing_key() {
        let config = AttestationConfig {
            private_key: Some("super-secret".to_string()),
            ..AttestationConfig::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
