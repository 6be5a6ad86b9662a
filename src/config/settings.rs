//! Runtime settings, loaded once from environment variables.
//!
//! Integrations are optional: without carrier credentials the tracking loop does not run, and
//! without a payment server key checkout returns no payment token.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REVIEW_BASE_URL: &str = "https://sparkloreofficial.com";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    #[error("environment variable {key} has an invalid value: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("could not read .env file: {0}")]
    DotEnv(String),
}

/// Sender details printed on every shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipperProfile {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub address: String,
    /// Carrier origin code of the pickup site.
    pub origin_code: String,
    /// Carrier site code used for tariff lookups.
    pub send_site_code: String,
}

impl Default for ShipperProfile {
    fn default() -> Self {
        Self {
            name: "Sparklore".to_string(),
            contact: "SPARKLORE ADMIN".to_string(),
            phone: String::new(),
            address: String::new(),
            origin_code: "BKI".to_string(),
            send_site_code: "BEKASI".to_string(),
        }
    }
}

/// J&T Express credentials and endpoints.
#[derive(Clone)]
pub struct CarrierSettings {
    pub order_base_url: String,
    pub general_base_url: String,
    pub order_key: String,
    pub order_username: String,
    pub order_api_key: String,
    pub tariff_key: String,
    pub track_password: String,
    pub ecompany_id: String,
    pub timeout: Duration,
    pub shipper: ShipperProfile,
}

impl std::fmt::Debug for CarrierSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierSettings")
            .field("order_base_url", &self.order_base_url)
            .field("general_base_url", &self.general_base_url)
            .field("order_key", &"[REDACTED]")
            .field("order_username", &self.order_username)
            .field("order_api_key", &"[REDACTED]")
            .field("tariff_key", &"[REDACTED]")
            .field("track_password", &"[REDACTED]")
            .field("ecompany_id", &self.ecompany_id)
            .field("timeout", &self.timeout)
            .field("shipper", &self.shipper)
            .finish()
    }
}

/// Midtrans Snap credentials.
#[derive(Clone)]
pub struct PaymentSettings {
    pub server_key: String,
    pub production: bool,
    /// Replaces the Snap transactions URL; used against local stubs.
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for PaymentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentSettings")
            .field("server_key", &"[REDACTED]")
            .field("production", &self.production)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingSettings {
    /// Time between two synchronization runs.
    pub interval: Duration,
    /// Carrier calls in flight at once.
    pub concurrency: usize,
    /// Upper bound for one carrier call.
    pub request_timeout: Duration,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            concurrency: 4,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub carrier: Option<CarrierSettings>,
    pub payment: Option<PaymentSettings>,
    pub tracking: TrackingSettings,
    pub review_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            carrier: None,
            payment: None,
            tracking: TrackingSettings::default(),
            review_base_url: DEFAULT_REVIEW_BASE_URL.to_string(),
        }
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        match (self.lookup)(key) {
            None => Err(ConfigError::MissingEnvVar(key.to_string())),
            Some(v) if v.trim().is_empty() => Err(ConfigError::EmptyValue(key.to_string())),
            Some(v) => Ok(v.trim().to_string()),
        }
    }

    fn or_default(&self, key: &str) -> String {
        self.optional(key).unwrap_or_default()
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            None => Ok(default),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }),
        }
    }

    /// Like `parsed`, but zero is an invalid value.
    fn positive<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + Default + PartialEq + ToString,
    {
        let value = self.parsed(key, default)?;
        if value == T::default() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    fn secs(&self, key: &str, default: Duration) -> Result<Duration, ConfigError> {
        self.positive(key, default.as_secs()).map(Duration::from_secs)
    }

    fn flag(&self, key: &str) -> bool {
        self.optional(key)
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::DotEnv(e.to_string()));
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let env = Env { lookup };

        let carrier = match env.optional("JNT_EXPRESS_GENERAL_BASE_URL") {
            None => None,
            Some(general_base_url) => {
                let defaults = ShipperProfile::default();
                Some(CarrierSettings {
                    order_base_url: env.or_default("JNT_EXPRESS_ORDER_BASE_URL"),
                    general_base_url,
                    order_key: env.or_default("JNT_EXPRESS_ORDER_KEY"),
                    order_username: env.or_default("JNT_EXPRESS_ORDER_USERNAME"),
                    order_api_key: env.or_default("JNT_EXPRESS_ORDER_API_KEY"),
                    tariff_key: env.or_default("JNT_EXPRESS_TARIF_KEY"),
                    track_password: env.required("JNT_EXPRESS_TRACK_PASSWORD")?,
                    ecompany_id: env.required("JNT_EXPRESS_ECOMPANY_ID")?,
                    timeout: env.secs("JNT_EXPRESS_TIMEOUT_SECS", Duration::from_secs(30))?,
                    shipper: ShipperProfile {
                        name: env.optional("JNT_EXPRESS_SHIPPER_NAME").unwrap_or(defaults.name),
                        contact: env
                            .optional("JNT_EXPRESS_SHIPPER_CONTACT")
                            .unwrap_or(defaults.contact),
                        phone: env.or_default("JNT_EXPRESS_SHIPPER_PHONE"),
                        address: env.or_default("JNT_EXPRESS_SHIPPER_ADDR"),
                        origin_code: env
                            .optional("JNT_EXPRESS_ORIGIN_CODE")
                            .unwrap_or(defaults.origin_code),
                        send_site_code: env
                            .optional("JNT_EXPRESS_SEND_SITE_CODE")
                            .unwrap_or(defaults.send_site_code),
                    },
                })
            }
        };

        let payment = env.optional("MIDTRANS_SERVER_KEY").map(|server_key| PaymentSettings {
            server_key,
            production: env.flag("MIDTRANS_IS_PRODUCTION"),
            endpoint: env.optional("MIDTRANS_SNAP_URL"),
        });

        let defaults = TrackingSettings::default();
        let tracking = TrackingSettings {
            interval: env.secs("TRACKING_INTERVAL_SECS", defaults.interval)?,
            concurrency: env.positive("TRACKING_CONCURRENCY", defaults.concurrency)?,
            request_timeout: env.secs("TRACKING_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
        };

        Ok(Self {
            carrier,
            payment,
            tracking,
            review_base_url: env
                .optional("REVIEW_BASE_URL")
                .unwrap_or_else(|| DEFAULT_REVIEW_BASE_URL.to_string()),
        })
    }
}
