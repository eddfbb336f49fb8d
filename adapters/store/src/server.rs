//! Blocking HTTP server exposing the level store API.

use std::{
    io::{Cursor, Read},
    net::SocketAddr,
};

use log::{debug, info, warn};
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};

use crate::{
    repository::LevelRepository,
    routes::{route, ApiResponse},
};

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Errors raised while starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind level store on {addr}: {reason}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying failure reported by the HTTP layer.
        reason: String,
    },
}

/// Level store server that handles requests sequentially on the calling thread.
pub struct StoreServer {
    server: Server,
    repository: Box<dyn LevelRepository>,
    api_prefix: String,
}

impl StoreServer {
    /// Binds the server to `addr` (e.g. `127.0.0.1:5000`; port 0 picks a free port).
    pub fn bind(
        addr: &str,
        repository: Box<dyn LevelRepository>,
        api_prefix: impl Into<String>,
    ) -> Result<Self, ServerError> {
        let server = Server::http(addr).map_err(|reason| ServerError::Bind {
            addr: addr.to_owned(),
            reason: reason.to_string(),
        })?;
        Ok(Self {
            server,
            repository,
            api_prefix: api_prefix.into(),
        })
    }

    /// Address the server is listening on.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serves requests until the listening socket is closed.
    pub fn run(mut self) {
        match self.local_addr() {
            Some(addr) => info!("level store listening on http://{addr}{}", self.api_prefix),
            None => info!("level store listening"),
        }

        while let Ok(request) = self.server.recv() {
            self.handle(request);
        }
    }

    fn handle(&mut self, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_owned();

        let mut body = String::new();
        let response = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => route(
                self.repository.as_mut(),
                &self.api_prefix,
                &method,
                &url,
                &body,
            ),
            Err(reason) => {
                warn!("failed to read {method} {url} body: {reason}");
                ApiResponse {
                    status: 400,
                    body: Some(serde_json::json!({ "error": "Unreadable request body" })),
                }
            }
        };
        debug!("{method} {url} -> {}", response.status);

        if let Err(reason) = request.respond(into_http(response)) {
            warn!("failed to respond to {method} {url}: {reason}");
        }
    }
}

fn into_http(response: ApiResponse) -> Response<Cursor<Vec<u8>>> {
    let is_json = response.body.is_some();
    let payload = response
        .body
        .map(|body| body.to_string())
        .unwrap_or_default();
    response_headers(is_json).into_iter().fold(
        Response::from_string(payload).with_status_code(StatusCode(response.status)),
        |http, header| http.with_header(header),
    )
}

fn response_headers(is_json: bool) -> Vec<Header> {
    let content_type = is_json.then_some(("Content-Type", "application/json"));
    content_type
        .into_iter()
        .chain(CORS_HEADERS)
        .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
        .collect()
}
