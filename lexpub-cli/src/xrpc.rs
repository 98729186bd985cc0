//! Blocking XRPC transport over `ureq`.
//!
//! Implements [`Transport`] with three endpoints:
//! `com.atproto.server.createSession`, `com.atproto.repo.listRecords` and
//! `com.atproto.repo.applyWrites`. Requests after login carry the session's
//! access token as a bearer token.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lexpub_sync::transport::{ApplyWritesInput, ListRecordsOutput, ListRecordsParams};
use lexpub_sync::{Session, Transport, TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct CreateSessionInput<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionOutput {
    access_jwt: String,
    did: String,
    handle: String,
}

#[derive(Deserialize, Default)]
struct XrpcErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// XRPC client bound to one service endpoint.
pub struct XrpcClient {
    agent: ureq::Agent,
    service: String,
    access_jwt: Option<String>,
}

impl XrpcClient {
    pub fn new(service: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("publish-lexicons/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            service: service.trim_end_matches('/').to_string(),
            access_jwt: None,
        }
    }

    fn url(&self, nsid: &str) -> String {
        format!("{}/xrpc/{nsid}", self.service)
    }

    fn authorization(&self) -> Result<String, TransportError> {
        self.access_jwt
            .as_ref()
            .map(|jwt| format!("Bearer {jwt}"))
            .ok_or(TransportError::NotAuthenticated)
    }
}

impl Transport for XrpcClient {
    fn login(&mut self, identifier: &str, password: &str) -> Result<Session, TransportError> {
        let response = self
            .agent
            .post(&self.url("com.atproto.server.createSession"))
            .send_json(CreateSessionInput {
                identifier,
                password,
            })
            .map_err(map_error)?;
        let output: CreateSessionOutput = response.into_json().map_err(decode_error)?;
        self.access_jwt = Some(output.access_jwt);
        Ok(Session {
            did: output.did,
            handle: output.handle,
        })
    }

    fn list_records(
        &mut self,
        params: &ListRecordsParams,
    ) -> Result<ListRecordsOutput, TransportError> {
        let mut request = self
            .agent
            .get(&self.url("com.atproto.repo.listRecords"))
            .set("Authorization", &self.authorization()?)
            .query("repo", &params.repo)
            .query("collection", &params.collection)
            .query("limit", &params.limit.to_string());
        if let Some(cursor) = &params.cursor {
            request = request.query("cursor", cursor);
        }
        let response = request.call().map_err(map_error)?;
        response.into_json().map_err(decode_error)
    }

    fn apply_writes(&mut self, input: &ApplyWritesInput) -> Result<(), TransportError> {
        self.agent
            .post(&self.url("com.atproto.repo.applyWrites"))
            .set("Authorization", &self.authorization()?)
            .send_json(input)
            .map_err(map_error)?;
        Ok(())
    }
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            xrpc_error(status, &body)
        }
        ureq::Error::Transport(transport) => TransportError::Network(transport.to_string()),
    }
}

fn decode_error(err: std::io::Error) -> TransportError {
    TransportError::Decode(format!("invalid XRPC response: {err}"))
}

/// Turn a non-2xx response body into a structured error.
fn xrpc_error(status: u16, body: &str) -> TransportError {
    let parsed: XrpcErrorBody = serde_json::from_str(body).unwrap_or_default();
    TransportError::Xrpc {
        status,
        error: parsed.error.unwrap_or_else(|| "UnknownError".to_string()),
        message: parsed.message.unwrap_or_else(|| body.trim().to_string()),
    }
}
