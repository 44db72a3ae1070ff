//! Outcome logging
//!
//! Appends `(user_name, stress_level_label)` to an external spreadsheet.
//! Strictly best-effort: one attempt, bounded timeout, and any failure
//! becomes an operational log line instead of a user-facing error. The
//! caller fires this after the result block has already been rendered.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SinkError;
use crate::present::StressLevel;
use crate::{PRODUCER_NAME, VERSION};

/// Default network timeout for the single append attempt
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(5);

/// One prediction outcome, created at prediction time and appended once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub user_name: String,
    pub stress_level: StressLevel,
    pub predicted_at: DateTime<Utc>,
    pub session_id: Uuid,
}

impl OutcomeRecord {
    pub fn new(user_name: impl Into<String>, stress_level: StressLevel) -> Self {
        Self {
            user_name: user_name.into(),
            stress_level,
            predicted_at: Utc::now(),
            session_id: Uuid::new_v4(),
        }
    }

    /// The spreadsheet row: `[user_name, label]`
    pub fn row(&self) -> [String; 2] {
        [
            self.user_name.clone(),
            self.stress_level.label().to_string(),
        ]
    }
}

/// Append-only outcome sink
pub trait OutcomeSink {
    fn append(&self, record: &OutcomeRecord) -> Result<(), SinkError>;
}

/// Where the sink's service credential comes from
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Token read from a file
    File(PathBuf),
    /// Token read from an environment variable
    Env(String),
}

impl CredentialSource {
    fn resolve(&self) -> Result<String, SinkError> {
        match self {
            CredentialSource::File(path) => fs::read_to_string(path)
                .map(|s| s.trim().to_string())
                .map_err(|e| {
                    SinkError::Credential(format!("cannot read {}: {}", path.display(), e))
                }),
            CredentialSource::Env(var) => env::var(var)
                .map_err(|_| SinkError::Credential(format!("env var {} is not set", var))),
        }
    }
}

/// Spreadsheet sink appending rows over HTTP with a bearer credential
pub struct SheetsSink {
    endpoint: String,
    spreadsheet: String,
    credential: CredentialSource,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct AppendPayload<'a> {
    spreadsheet: &'a str,
    row: [String; 2],
    provenance: Provenance<'a>,
}

#[derive(Serialize)]
struct Provenance<'a> {
    producer: &'a str,
    version: &'a str,
    session_id: Uuid,
    predicted_at: DateTime<Utc>,
}

impl SheetsSink {
    /// Build a sink with the default timeout
    pub fn new(
        endpoint: impl Into<String>,
        spreadsheet: impl Into<String>,
        credential: CredentialSource,
    ) -> Result<Self, SinkError> {
        Self::with_timeout(endpoint, spreadsheet, credential, DEFAULT_SINK_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        spreadsheet: impl Into<String>,
        credential: CredentialSource,
        timeout: Duration,
    ) -> Result<Self, SinkError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            spreadsheet: spreadsheet.into(),
            credential,
            client,
        })
    }
}

impl OutcomeSink for SheetsSink {
    fn append(&self, record: &OutcomeRecord) -> Result<(), SinkError> {
        let token = self.credential.resolve()?;
        let payload = AppendPayload {
            spreadsheet: &self.spreadsheet,
            row: record.row(),
            provenance: Provenance {
                producer: PRODUCER_NAME,
                version: VERSION,
                session_id: record.session_id,
                predicted_at: record.predicted_at,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Fire the sink once, swallowing any failure into the operational log.
///
/// Returns whether the append landed; the caller's user-facing flow must
/// not depend on the answer.
pub fn log_outcome(sink: &dyn OutcomeSink, record: &OutcomeRecord) -> bool {
    match sink.append(record) {
        Ok(()) => {
            tracing::info!(
                user = %record.user_name,
                label = record.stress_level.label(),
                session = %record.session_id,
                "outcome appended to spreadsheet"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                user = %record.user_name,
                session = %record.session_id,
                error = %e,
                "outcome logging failed; prediction already shown"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    struct MemorySink {
        rows: Mutex<Vec<[String; 2]>>,
        fail: bool,
    }

    impl MemorySink {
        fn new(fail: bool) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    impl OutcomeSink for MemorySink {
        fn append(&self, record: &OutcomeRecord) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Transport("simulated network error".to_string()));
            }
            self.rows.lock().unwrap().push(record.row());
            Ok(())
        }
    }

    #[test]
    fn record_row_is_name_and_label() {
        let record = OutcomeRecord::new("Jackbar", StressLevel::Sedang);
        assert_eq!(record.row(), ["Jackbar".to_string(), "Sedang".to_string()]);
    }

    #[test]
    fn log_outcome_reports_success() {
        let sink = MemorySink::new(false);
        let record = OutcomeRecord::new("Jackbar", StressLevel::Ringan);

        assert!(log_outcome(&sink, &record));
        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.as_slice(), &[["Jackbar".to_string(), "Ringan".to_string()]]);
    }

    #[test]
    fn log_outcome_swallows_failures() {
        let sink = MemorySink::new(true);
        let record = OutcomeRecord::new("Jackbar", StressLevel::Berat);

        // failure surfaces as a false return, never a panic or an Err
        assert!(!log_outcome(&sink, &record));
    }

    #[test]
    fn sheets_sink_appends_over_http() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/append")
            .match_header("authorization", "Bearer sekrit")
            .with_status(200)
            .create();

        let mut cred = tempfile::NamedTempFile::new().unwrap();
        cred.write_all(b"sekrit\n").unwrap();

        let sink = SheetsSink::new(
            format!("{}/append", server.url()),
            "StressPredictResults",
            CredentialSource::File(cred.path().to_path_buf()),
        )
        .unwrap();

        let record = OutcomeRecord::new("Jackbar", StressLevel::Ringan);
        sink.append(&record).unwrap();
        mock.assert();
    }

    #[test]
    fn sheets_sink_reports_rejection() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/append")
            .with_status(503)
            .with_body("overloaded")
            .create();

        let sink = SheetsSink::new(
            format!("{}/append", server.url()),
            "StressPredictResults",
            CredentialSource::Env("STRESS_PREDICT_TEST_TOKEN_REJECT".to_string()),
        )
        .unwrap();
        std::env::set_var("STRESS_PREDICT_TEST_TOKEN_REJECT", "sekrit");

        let record = OutcomeRecord::new("Jackbar", StressLevel::Sedang);
        let err = sink.append(&record).unwrap_err();
        assert!(matches!(err, SinkError::Rejected { status: 503, .. }));
    }

    #[test]
    fn missing_credential_is_a_sink_error() {
        let sink = SheetsSink::new(
            "http://localhost:1/append",
            "StressPredictResults",
            CredentialSource::Env("STRESS_PREDICT_TEST_TOKEN_MISSING".to_string()),
        )
        .unwrap();

        let record = OutcomeRecord::new("Jackbar", StressLevel::Ringan);
        assert!(matches!(
            sink.append(&record),
            Err(SinkError::Credential(_))
        ));
    }
}
