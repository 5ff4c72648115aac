//! Credentials and connection settings, read from the environment.

use std::fmt;
use std::time::Duration;

use crate::error::{IbmError, IbmResult};

/// Interval between job status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How to authenticate against IBM Quantum.
#[derive(Clone)]
pub enum IbmCredentials {
    /// IBM Cloud API key, exchanged for an IAM bearer token.
    ApiKey {
        /// The API key.
        api_key: String,
        /// Cloud resource name of the Qiskit Runtime instance.
        service_crn: String,
    },
    /// A bearer token used as-is against the legacy endpoint.
    Token(String),
}

impl IbmCredentials {
    /// Read credentials from the environment.
    ///
    /// `IBM_API_KEY` (with `IBM_SERVICE_CRN`) takes precedence over
    /// `IBM_QUANTUM_TOKEN`.
    pub fn from_env() -> IbmResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> IbmResult<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = non_empty("IBM_API_KEY") {
            let service_crn = non_empty("IBM_SERVICE_CRN").ok_or(IbmError::MissingServiceCrn)?;
            return Ok(Self::ApiKey {
                api_key,
                service_crn,
            });
        }
        non_empty("IBM_QUANTUM_TOKEN")
            .map(Self::Token)
            .ok_or(IbmError::MissingToken)
    }
}

impl fmt::Debug for IbmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey { service_crn, .. } => f
                .debug_struct("ApiKey")
                .field("api_key", &"[REDACTED]")
                .field("service_crn", service_crn)
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
        }
    }
}

/// Connection settings for [`IbmBackend::connect`](crate::IbmBackend::connect).
#[derive(Debug, Clone)]
pub struct IbmConfig {
    /// Credentials.
    pub credentials: IbmCredentials,
    /// Device to use; `None` selects the least busy operational device.
    pub device: Option<String>,
    /// Smallest device accepted by least-busy selection.
    pub min_qubits: u32,
    /// Interval between job status polls.
    pub poll_interval: Duration,
}

impl IbmConfig {
    /// Settings from the environment, with `IBM_QUANTUM_BACKEND` pinning a device.
    pub fn from_env(min_qubits: u32) -> IbmResult<Self> {
        Ok(Self {
            credentials: IbmCredentials::from_env()?,
            device: std::env::var("IBM_QUANTUM_BACKEND")
                .ok()
                .filter(|d| !d.trim().is_empty()),
            min_qubits,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_api_key_takes_precedence() {
        let creds = IbmCredentials::from_lookup(lookup(&[
            ("IBM_API_KEY", "key"),
            ("IBM_SERVICE_CRN", "crn:v1:abc"),
            ("IBM_QUANTUM_TOKEN", "tok"),
        ]))
        .unwrap();
        assert!(matches!(creds, IbmCredentials::ApiKey { .. }));
    }

    #[test]
    fn test_api_key_requires_crn() {
        let err = IbmCredentials::from_lookup(lookup(&[("IBM_API_KEY", "key")])).unwrap_err();
        assert!(matches!(err, IbmError::MissingServiceCrn));
    }

    #[test]
    fn test_token_fallback() {
        let creds = IbmCredentials::from_lookup(lookup(&[("IBM_QUANTUM_TOKEN", "tok")])).unwrap();
        assert!(matches!(creds, IbmCredentials::Token(t) if t == "tok"));
    }

    #[test]
    fn test_blank_values_are_missing() {
        let err = IbmCredentials::from_lookup(lookup(&[("IBM_QUANTUM_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, IbmError::MissingToken));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = IbmCredentials::ApiKey {
            api_key: "super-secret".into(),
            service_crn: "crn:v1:abc".into(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("REDACTED"));

        let shown = format!("{:?}", IbmCredentials::Token("tok-123".into()));
        assert!(!shown.contains("tok-123"));
    }
}
