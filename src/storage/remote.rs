//! HTTP client for the hosted record API
//!
//! Every table lives under `{base_url}/projects/{project_id}/tables/{table}`
//! and answers with the envelope `{ success, message, data | results }`.
//! Calls are blocking and never retried.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::record::{FetchParams, FieldSelector, Record, RecordOutcome, RecordStore};
use crate::error::{FinanceError, FinanceResult};

const UA: &str = concat!("fintrack/", env!("CARGO_PKG_VERSION"));
pub const PUBLIC_KEY_HEADER: &str = "X-Public-Key";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    success: bool,
    message: Option<String>,
    data: Option<Value>,
    results: Option<Vec<RecordOutcome>>,
}

/// Record store backed by the remote record API
pub struct RemoteStore {
    client: Client,
    base_url: String,
    project_id: String,
    public_key: String,
}

impl RemoteStore {
    pub fn new(
        base_url: &str,
        project_id: &str,
        public_key: &str,
        timeout: Duration,
    ) -> FinanceResult<Self> {
        if base_url.trim().is_empty() {
            return Err(FinanceError::Config("Remote base URL is not set".into()));
        }
        if project_id.trim().is_empty() {
            return Err(FinanceError::Config("Remote project id is not set".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(UA)
            .build()
            .map_err(|e| FinanceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            public_key: public_key.to_string(),
        })
    }

    fn url(&self, table: &str, action: &str) -> String {
        table_url(&self.base_url, &self.project_id, table, action)
    }

    fn call(&self, method: Method, table: &str, action: &str, body: Value) -> FinanceResult<Envelope> {
        let url = self.url(table, action);
        debug!(%method, %url, "record API request");

        let response = self
            .client
            .request(method, &url)
            .header(PUBLIC_KEY_HEADER, &self.public_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        interpret(status, &text)
    }

    fn outcomes(envelope: Envelope) -> Vec<RecordOutcome> {
        envelope.results.unwrap_or_default()
    }
}

fn table_url(base_url: &str, project_id: &str, table: &str, action: &str) -> String {
    format!(
        "{}/projects/{}/tables/{}/{}",
        base_url, project_id, table, action
    )
}

/// Turn a raw HTTP answer into an envelope or the error it stands for
fn interpret(status: StatusCode, body: &str) -> FinanceResult<Envelope> {
    let envelope: Option<Envelope> = serde_json::from_str(body).ok();
    let message = envelope.as_ref().and_then(|e| e.message.clone());

    if status == StatusCode::NOT_FOUND {
        return Err(FinanceError::not_found(
            "Record",
            message.unwrap_or_else(|| status.to_string()),
        ));
    }
    if !status.is_success() {
        return Err(FinanceError::Transport(
            message.unwrap_or_else(|| status.to_string()),
        ));
    }

    let envelope = envelope.ok_or_else(|| {
        FinanceError::Transport(format!("Malformed response from record API ({})", status))
    })?;
    if !envelope.success {
        return Err(FinanceError::Transport(
            message.unwrap_or_else(|| "Record API request failed".into()),
        ));
    }
    Ok(envelope)
}

fn fields_body(fields: &[FieldSelector]) -> Value {
    Value::Array(
        fields
            .iter()
            .map(|f| {
                if f.reference {
                    json!({
                        "field": { "name": f.name },
                        "referenceField": { "field": { "Name": "Name" } }
                    })
                } else {
                    json!({ "field": { "Name": f.name } })
                }
            })
            .collect(),
    )
}

fn fetch_body(params: &FetchParams) -> Value {
    let mut body = json!({ "fields": fields_body(&params.fields) });
    if !params.order_by.is_empty() {
        body["orderBy"] = json!(params.order_by);
    }
    body
}

fn into_records(data: Option<Value>) -> FinanceResult<Vec<Record>> {
    match data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => rows
            .into_iter()
            .map(|row| match row {
                Value::Object(record) => Ok(record),
                other => Err(FinanceError::Storage(format!(
                    "Expected a record object, got {}",
                    other
                ))),
            })
            .collect(),
        Some(other) => Err(FinanceError::Storage(format!(
            "Expected a list of records, got {}",
            other
        ))),
    }
}

impl RecordStore for RemoteStore {
    fn fetch_records(&self, table: &str, params: &FetchParams) -> FinanceResult<Vec<Record>> {
        let envelope = self.call(Method::POST, table, "fetch", fetch_body(params))?;
        into_records(envelope.data)
    }

    fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> FinanceResult<Record> {
        let body = json!({ "Id": id, "fields": fields_body(&params.fields) });
        let envelope = self.call(Method::POST, table, "get", body)?;
        match envelope.data {
            Some(Value::Object(record)) => Ok(record),
            _ => Err(FinanceError::not_found("Record", id.to_string())),
        }
    }

    fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> FinanceResult<Vec<RecordOutcome>> {
        let envelope = self.call(Method::POST, table, "records", json!({ "records": records }))?;
        Ok(Self::outcomes(envelope))
    }

    fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> FinanceResult<Vec<RecordOutcome>> {
        let envelope = self.call(Method::PUT, table, "records", json!({ "records": records }))?;
        Ok(Self::outcomes(envelope))
    }

    fn delete_records(&self, table: &str, ids: &[i64]) -> FinanceResult<Vec<RecordOutcome>> {
        let envelope = self.call(Method::DELETE, table, "records", json!({ "RecordIds": ids }))?;
        Ok(Self::outcomes(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountId, AccountPatch};
    use crate::storage::record::OrderBy;
    use crate::storage::Repository;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};

    /// Serve one canned reply per connection, in order, and hand back the
    /// raw requests once every reply has gone out
    fn responder(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            replies
                .into_iter()
                .map(|(status, body)| {
                    let (mut stream, _) = listener.accept().unwrap();
                    let request = read_request(&mut stream);
                    let reply = format!(
                        "HTTP/1.1 {} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    stream.write_all(reply.as_bytes()).unwrap();
                    request
                })
                .collect()
        });
        (base_url, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_lowercase();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn remote(base_url: &str) -> RemoteStore {
        RemoteStore::new(base_url, "p1", "secret-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_new_requires_project() {
        let err = RemoteStore::new("https://api.example.com", "", "key", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, FinanceError::Config(_)));
    }

    #[test]
    fn test_url_layout() {
        let store = RemoteStore::new(
            "https://api.example.com/v1/",
            "proj42",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            store.url("goal_c", "fetch"),
            "https://api.example.com/v1/projects/proj42/tables/goal_c/fetch"
        );
    }

    #[test]
    fn test_fetch_body_shape() {
        let params = FetchParams {
            fields: vec![
                FieldSelector {
                    name: "Name".into(),
                    reference: false,
                },
                FieldSelector {
                    name: "category_id_c".into(),
                    reference: true,
                },
            ],
            order_by: vec![OrderBy::descending("date_c")],
        };
        assert_eq!(
            fetch_body(&params),
            json!({
                "fields": [
                    { "field": { "Name": "Name" } },
                    { "field": { "name": "category_id_c" },
                      "referenceField": { "field": { "Name": "Name" } } }
                ],
                "orderBy": [{ "fieldName": "date_c", "sorttype": "DESC" }]
            })
        );
    }

    #[test]
    fn test_interpret_success() {
        let envelope = interpret(
            StatusCode::OK,
            r#"{"success":true,"data":[{"Id":1,"Name":"Food"}]}"#,
        )
        .unwrap();
        let rows = into_records(envelope.data).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_interpret_unsuccessful_envelope_surfaces_message() {
        let err = interpret(StatusCode::OK, r#"{"success":false,"message":"Invalid table"}"#)
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Invalid table");
    }

    #[test]
    fn test_interpret_http_errors() {
        let err = interpret(StatusCode::INTERNAL_SERVER_ERROR, "oops").unwrap_err();
        assert_eq!(err.to_string(), "500 Internal Server Error");

        let err = interpret(StatusCode::UNAUTHORIZED, r#"{"message":"Bad key"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Bad key");

        let err = interpret(StatusCode::NOT_FOUND, "").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_batch_results_parse() {
        let envelope = interpret(
            StatusCode::OK,
            r#"{"success":true,"results":[{"success":true,"data":{"Id":9}},{"success":false,"message":"Name is required"}]}"#,
        )
        .unwrap();
        let outcomes = RemoteStore::outcomes(envelope);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[1].message.as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_fetch_over_http_sends_public_key() {
        let (base_url, server) = responder(vec![(
            200,
            r#"{"success":true,"data":[{"Id":3,"Name":"Japan Trip"}]}"#,
        )]);

        let rows = remote(&base_url)
            .fetch_records("goal_c", &FetchParams::default())
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Name"], json!("Japan Trip"));

        let requests = server.join().unwrap();
        let request = requests[0].to_lowercase();
        assert!(request.starts_with("post /projects/p1/tables/goal_c/fetch"));
        assert!(request.contains("x-public-key: secret-key"));
    }

    #[test]
    fn test_update_of_missing_record_over_http_is_not_found() {
        let (base_url, server) = responder(vec![(
            200,
            r#"{"success":true,"results":[{"success":false,"message":"Not Found"}]}"#,
        )]);
        let repo: Repository<Account> = Repository::new(Arc::new(remote(&base_url)));

        let err = repo
            .update(AccountId::new(7), AccountPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Account not found: 7");

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("PUT "));
    }

    #[test]
    fn test_delete_failure_checks_the_record_exists() {
        let (base_url, server) = responder(vec![
            (
                200,
                r#"{"success":true,"results":[{"success":false,"message":"Rejected"}]}"#,
            ),
            (404, r#"{"success":false,"message":"No such record"}"#),
        ]);
        let repo: Repository<Account> = Repository::new(Arc::new(remote(&base_url)));

        let err = repo.delete(AccountId::new(7)).unwrap_err();
        assert!(err.is_not_found());

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("DELETE "));
        assert!(requests[1].to_lowercase().starts_with("post /projects/p1/tables/app_account_c/get"));
    }

    #[test]
    fn test_unreachable_host_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = remote(&base_url)
            .fetch_records("goal_c", &FetchParams::default())
            .unwrap_err();
        assert!(err.is_transport());
    }
}
