//! IBM Quantum Platform API client.
//!
//! Covers the REST calls a sampling run needs:
//! - Authentication via IAM token exchange, or a direct bearer token
//! - Listing devices with their configuration and queue length
//! - Submitting a Sampler V2 job with one PUB per circuit
//! - Polling job status and retrieving per-PUB results

use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use qcanvas_hal::Counts;

use crate::config::IbmCredentials;
use crate::error::{IbmError, IbmResult};

/// IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Legacy IBM Quantum API endpoint, used with direct tokens.
pub const LEGACY_ENDPOINT: &str = "https://api.quantum-computing.ibm.com";

/// IBM Cloud IAM token endpoint.
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// IBM API version header value.
const IBM_API_VERSION: &str = "2026-02-01";

/// User-Agent sent with requests (Cloudflare blocks the default reqwest UA).
const USER_AGENT: &str = concat!("qcanvas/", env!("CARGO_PKG_VERSION"));

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
    /// Whether using the Cloud API (vs legacy).
    cloud_api: bool,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("cloud_api", &self.cloud_api)
            .finish()
    }
}

/// IAM token response from `iam.cloud.ibm.com`.
#[derive(Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

fn default_headers(bearer: &str) -> IbmResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {bearer}"))
            .map_err(|_| IbmError::InvalidToken)?,
    );
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(headers)
}

fn http_client(headers: header::HeaderMap) -> IbmResult<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

/// Turn a non-success response into an API error, keeping the body text.
async fn api_error(response: reqwest::Response, context: &str) -> IbmError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    let (code, message) = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(err) if !err.message.is_empty() => (err.code, err.message),
        _ => (None, body),
    };
    IbmError::Api {
        code,
        message: format!("{context} ({status}): {message}"),
    }
}

impl IbmClient {
    /// Client for the legacy endpoint using a bearer token as-is.
    pub fn new(endpoint: impl Into<String>, token: &str) -> IbmResult<Self> {
        Ok(Self {
            client: http_client(default_headers(token)?)?,
            endpoint: endpoint.into(),
            cloud_api: false,
        })
    }

    /// Client for the IBM Cloud API.
    ///
    /// Exchanges the API key for an IAM bearer token and configures the
    /// Service-CRN header the Cloud API requires on every request.
    pub async fn connect(api_key: &str, service_crn: &str) -> IbmResult<Self> {
        let iam_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let iam_response = iam_client
            .post(IAM_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

        if !iam_response.status().is_success() {
            let status = iam_response.status();
            let body = iam_response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(IbmError::IamTokenExchange(format!(
                "IAM returned {status}: {body}"
            )));
        }

        let iam_token: IamTokenResponse = iam_response.json().await.map_err(|e| {
            IbmError::IamTokenExchange(format!("failed to parse IAM response: {e}"))
        })?;

        let mut headers = default_headers(&iam_token.access_token)?;
        headers.insert(
            header::HeaderName::from_static("service-crn"),
            header::HeaderValue::from_str(service_crn)
                .map_err(|_| IbmError::Api {
                    code: None,
                    message: "invalid Service-CRN value".into(),
                })?,
        );
        headers.insert(
            header::HeaderName::from_static("ibm-api-version"),
            header::HeaderValue::from_static(IBM_API_VERSION),
        );

        Ok(Self {
            client: http_client(headers)?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cloud_api: true,
        })
    }

    /// Client for whichever flow the credentials call for.
    pub async fn from_credentials(credentials: &IbmCredentials) -> IbmResult<Self> {
        match credentials {
            IbmCredentials::ApiKey {
                api_key,
                service_crn,
            } => {
                tracing::info!("connecting to IBM Cloud API (IAM key exchange)");
                Self::connect(api_key, service_crn).await
            }
            IbmCredentials::Token(token) => {
                tracing::info!("connecting with IBM Quantum token (legacy endpoint)");
                Self::new(LEGACY_ENDPOINT, token)
            }
        }
    }

    /// Whether this client uses the Cloud API.
    pub fn is_cloud_api(&self) -> bool {
        self.cloud_api
    }

    /// Get available devices with their status.
    pub async fn list_backends(&self) -> IbmResult<Vec<BackendInfo>> {
        let url = format!("{}/v1/backends", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response, "list backends failed").await);
        }

        if !self.cloud_api {
            let backends: LegacyBackendsResponse = response.json().await?;
            return Ok(backends.backends);
        }

        // The Cloud API lists names only; configuration and status are per device.
        let devices: DevicesResponse = response.json().await?;
        let mut backends = Vec::with_capacity(devices.devices.len());
        for device in &devices.devices {
            match self.get_backend(&device.name).await {
                Ok(info) => backends.push(info),
                Err(e) => tracing::warn!(device = %device.name, "skipping device: {e}"),
            }
        }
        Ok(backends)
    }

    /// Get details for one device.
    pub async fn get_backend(&self, name: &str) -> IbmResult<BackendInfo> {
        if !self.cloud_api {
            let url = format!("{}/v1/backends/{name}", self.endpoint);
            let response = self.client.get(&url).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(IbmError::BackendUnavailable(name.to_string()));
            }
            if !response.status().is_success() {
                return Err(api_error(response, "get backend failed").await);
            }
            return Ok(response.json().await?);
        }

        let config_url = format!("{}/v1/backends/{name}/configuration", self.endpoint);
        let config_response = self.client.get(&config_url).send().await?;
        if config_response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::BackendUnavailable(name.to_string()));
        }
        if !config_response.status().is_success() {
            return Err(api_error(config_response, "backend configuration failed").await);
        }
        let config: BackendConfigResponse = config_response.json().await?;

        let status_url = format!("{}/v1/backends/{name}/status", self.endpoint);
        let status_response = self.client.get(&status_url).send().await?;
        let status = if status_response.status().is_success() {
            let s: BackendStatusResponse = status_response.json().await?;
            BackendStatus {
                operational: s.state,
                status_msg: Some(s.status),
                pending_jobs: Some(u32::try_from(s.length_queue).unwrap_or(u32::MAX)),
            }
        } else {
            // Configuration succeeded; a missing status is not fatal.
            BackendStatus {
                operational: true,
                status_msg: None,
                pending_jobs: None,
            }
        };

        Ok(BackendInfo {
            name: config.backend_name,
            num_qubits: config.n_qubits,
            status,
            basis_gates: config.basis_gates,
            coupling_map: config.coupling_map.unwrap_or_default(),
            simulator: config.simulator.unwrap_or(false),
            max_shots: config.max_shots,
        })
    }

    /// Submit a Sampler V2 job with one PUB `[circuit, {}, shots]` per circuit.
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        circuits: &[String],
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let url = format!("{}/v1/jobs", self.endpoint);
        let body = sampler_request(backend, circuits, shots);

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response, "job submission failed").await);
        }
        Ok(response.json().await?)
    }

    /// Get job status.
    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{job_id}", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response, "job status failed").await);
        }
        Ok(response.json().await?)
    }

    /// Get job results.
    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{job_id}/results", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response, "job results failed").await);
        }
        Ok(response.json().await?)
    }
}

/// Sampler V2 request body.
fn sampler_request(backend: &str, circuits: &[String], shots: u32) -> serde_json::Value {
    let pubs: Vec<serde_json::Value> = circuits
        .iter()
        .map(|c| serde_json::json!([c, {}, shots]))
        .collect();
    serde_json::json!({
        "program_id": "sampler",
        "backend": backend,
        "params": {
            "version": 2,
            "pubs": pubs
        }
    })
}

// ============================================================================
// Response types
// ============================================================================

/// API error response.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

/// Cloud API device list (`{"devices": [...]}`).
#[derive(Debug, Deserialize)]
struct DevicesResponse {
    devices: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    name: String,
}

/// Legacy API backend list (`{"backends": [...]}`).
#[derive(Debug, Deserialize)]
struct LegacyBackendsResponse {
    backends: Vec<BackendInfo>,
}

/// Cloud API `/backends/{name}/configuration`.
#[derive(Debug, Deserialize)]
struct BackendConfigResponse {
    backend_name: String,
    n_qubits: u32,
    #[serde(default)]
    basis_gates: Vec<String>,
    #[serde(default)]
    coupling_map: Option<Vec<[u32; 2]>>,
    #[serde(default)]
    simulator: Option<bool>,
    #[serde(default)]
    max_shots: Option<u32>,
}

/// Cloud API `/backends/{name}/status`.
#[derive(Debug, Deserialize)]
struct BackendStatusResponse {
    state: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    length_queue: u64,
}

/// A device as seen by selection and capability discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendInfo {
    /// Device name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Operational status.
    pub status: BackendStatus,
    /// Native gate names.
    #[serde(default)]
    pub basis_gates: Vec<String>,
    /// Directed coupling pairs as reported.
    #[serde(default)]
    pub coupling_map: Vec<[u32; 2]>,
    /// Whether this is a simulator.
    #[serde(default)]
    pub simulator: bool,
    /// Maximum number of shots.
    #[serde(default)]
    pub max_shots: Option<u32>,
}

/// Device status.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendStatus {
    /// Whether the device accepts jobs.
    pub operational: bool,
    /// Status message.
    #[serde(default)]
    pub status_msg: Option<String>,
    /// Queue length.
    #[serde(default)]
    pub pending_jobs: Option<u32>,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Job ID.
    pub id: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: String,
    /// Status (mixed case on the Cloud API).
    pub status: String,
    /// Error information (legacy API).
    #[serde(default)]
    pub error: Option<JobError>,
    /// State with failure reason (Cloud API).
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Job error information (legacy API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    /// Error message.
    pub message: String,
}

/// Job state with reason (Cloud API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// Reason for failure.
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    /// The failure reason, if the service gave one.
    pub fn error_message(&self) -> Option<String> {
        self.state
            .as_ref()
            .and_then(|s| s.reason.clone())
            .or_else(|| self.error.as_ref().map(|e| e.message.clone()))
    }
}

/// Job result response: one entry per submitted PUB, in submission order.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    /// Per-PUB results.
    pub results: Vec<PubResult>,
}

/// Sampler result for one PUB.
#[derive(Debug, Deserialize)]
pub struct PubResult {
    /// Classical register name to its samples.
    #[serde(default)]
    pub data: BTreeMap<String, ClassicalRegisterData>,
}

/// Classical register data from a Sampler V2 result.
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    /// One hex string per shot (e.g. `["0x0", "0x3", ...]`).
    pub samples: Vec<String>,
}

impl PubResult {
    /// Fold the samples of the measurement register into counts.
    ///
    /// Uses register `c` when present, otherwise the only register.
    pub fn to_counts(&self, width: usize) -> IbmResult<Counts> {
        let register = self
            .data
            .get("c")
            .or_else(|| match self.data.len() {
                1 => self.data.values().next(),
                _ => None,
            })
            .ok_or_else(|| {
                IbmError::MalformedResults(format!(
                    "expected one classical register, found {}",
                    self.data.len()
                ))
            })?;

        let mut counts = Counts::new();
        for sample in &register.samples {
            counts.insert(hex_to_binary(sample, width)?, 1);
        }
        Ok(counts)
    }
}

/// Convert a hex sample to a binary string of exactly `width` bits.
pub(crate) fn hex_to_binary(hex: &str, width: usize) -> IbmResult<String> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    let value = u64::from_str_radix(digits, 16)
        .map_err(|_| IbmError::MalformedResults(format!("sample '{hex}' is not hex")))?;
    let binary = format!("{value:0width$b}");
    if binary.len() > width {
        return Err(IbmError::MalformedResults(format!(
            "sample '{hex}' does not fit in {width} bits"
        )));
    }
    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_binary_pads_to_width() {
        assert_eq!(hex_to_binary("0x0", 4).unwrap(), "0000");
        assert_eq!(hex_to_binary("0x1", 5).unwrap(), "00001");
        assert_eq!(hex_to_binary("0x3", 8).unwrap(), "00000011");
        assert_eq!(hex_to_binary("1f", 5).unwrap(), "11111");
    }

    #[test]
    fn test_hex_to_binary_rejects_bad_samples() {
        assert!(hex_to_binary("0xzz", 4).is_err());
        assert!(hex_to_binary("0x10", 4).is_err());
    }

    #[test]
    fn test_pub_result_to_counts() {
        let json = r#"{"data": {"c": {"samples": ["0x0", "0x3", "0x3", "0x1"], "num_bits": 2}}}"#;
        let result: PubResult = serde_json::from_str(json).unwrap();
        let counts = result.to_counts(2).unwrap();
        assert_eq!(counts.get("00"), 1);
        assert_eq!(counts.get("11"), 2);
        assert_eq!(counts.get("01"), 1);
        assert_eq!(counts.total_shots(), 4);
    }

    #[test]
    fn test_pub_result_single_foreign_register() {
        let json = r#"{"data": {"meas": {"samples": ["0x2"]}}}"#;
        let result: PubResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.to_counts(3).unwrap().get("010"), 1);
    }

    #[test]
    fn test_pub_result_without_registers() {
        let result: PubResult = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(matches!(
            result.to_counts(2),
            Err(IbmError::MalformedResults(_))
        ));
    }

    #[test]
    fn test_sampler_request_has_one_pub_per_circuit() {
        let circuits = vec!["OPENQASM 3.0;".to_string(), "OPENQASM 3.0;".to_string()];
        let body = sampler_request("ibm_torino", &circuits, 100);
        assert_eq!(body["program_id"], "sampler");
        assert_eq!(body["backend"], "ibm_torino");
        assert_eq!(body["params"]["version"], 2);
        let pubs = body["params"]["pubs"].as_array().unwrap();
        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0][2], 100);
    }

    #[test]
    fn test_job_status_error_message() {
        let json = r#"{"id": "j1", "status": "Failed", "state": {"status": "Failed", "reason": "circuit too deep"}}"#;
        let status: JobStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(status.error_message().unwrap(), "circuit too deep");

        let json = r#"{"id": "j1", "status": "ERROR", "error": {"message": "legacy"}}"#;
        let status: JobStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(status.error_message().unwrap(), "legacy");
    }

    #[test]
    fn test_backend_config_response_deserialization() {
        let json = r#"{
            "backend_name": "ibm_torino",
            "n_qubits": 133,
            "basis_gates": ["cz", "id", "rx", "rz", "rzz", "sx", "x"],
            "coupling_map": [[0, 1], [1, 0], [1, 2]],
            "simulator": false
        }"#;
        let config: BackendConfigResponse = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend_name, "ibm_torino");
        assert_eq!(config.n_qubits, 133);
        assert_eq!(config.coupling_map.unwrap().len(), 3);
        assert_eq!(config.simulator, Some(false));
    }

    #[test]
    fn test_legacy_client_is_not_cloud() {
        let client = IbmClient::new("https://example.com", "test-token").unwrap();
        assert!(!client.is_cloud_api());
        assert!(!format!("{client:?}").contains("test-token"));
    }
}
