//! REST layer over the study service.
//!
//! A single `tiny_http` accept loop runs on a background thread and handles
//! requests one at a time. Routing is a plain function from method, path and
//! body to an [`ApiResponse`], so it can be exercised without a socket.
//!
//! ## Routes
//!
//! - `GET  /api/plots`
//! - `GET  /api/plots/:id`
//! - `GET  /api/plots/:id/studies`
//! - `POST /api/hbu-studies` with `{"plotId": "..."}`
//! - `GET  /api/hbu-studies/:id`
//! - `GET  /api/hbu-studies/:id/report.pdf`
//! - `GET  /api/hbu-studies/:id/report.txt`
//! - `GET  /health`

use crate::service::StudyService;
use crate::store::Repository;
use hbu_common::{Error, PlotId, StudyId};
use hbu_report::{MemorySink, ReportExporter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::{debug, error, info, warn};

/// Errors starting the server.
#[derive(Debug, ThisError)]
pub enum ServerError {
    #[error("invalid bind address '{addr}': {reason}")]
    InvalidAddr { addr: String, reason: String },

    #[error("failed to start server on {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("failed to spawn server thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<ServerError> for Error {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidAddr { .. } => Error::InvalidConfig(err.to_string()),
            ServerError::Spawn(e) => Error::Io(e),
            ServerError::Bind { .. } => Error::Io(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                err.to_string(),
            )),
        }
    }
}

/// A finished response, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub attachment: Option<String>,
}

impl ApiResponse {
    fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
                attachment: None,
            },
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                Self::error(500, "Internal server error")
            }
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: json!({ "error": message }).to_string().into_bytes(),
            attachment: None,
        }
    }

    fn error_with_details(status: u16, message: &str, details: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: json!({ "error": message, "details": details })
                .to_string()
                .into_bytes(),
            attachment: None,
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into().into_bytes(),
            attachment: None,
        }
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStudyRequest {
    plot_id: String,
}

/// Shared state behind the routes.
pub struct ApiState<R: Repository> {
    service: StudyService<R>,
    exporter: ReportExporter,
}

impl<R: Repository> ApiState<R> {
    pub fn new(service: StudyService<R>, exporter: ReportExporter) -> Self {
        Self { service, exporter }
    }

    pub fn service(&self) -> &StudyService<R> {
        &self.service
    }

    /// Route one request.
    pub fn handle(&self, method: &str, url: &str, body: &str) -> ApiResponse {
        let path = url.split('?').next().unwrap_or("");
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (method, segments.as_slice()) {
            ("GET", ["health"]) => ApiResponse::text(200, "ok"),
            ("GET", ["api", "plots"]) => ApiResponse::json(200, &self.service.list_plots()),
            ("GET", ["api", "plots", id]) => self.plot(id),
            ("GET", ["api", "plots", id, "studies"]) => self.plot_studies(id),
            ("POST", ["api", "hbu-studies"]) => self.create_study(body),
            ("GET", ["api", "hbu-studies", id]) => self.study(id),
            ("GET", ["api", "hbu-studies", id, "report.pdf"]) => self.pdf_report(id),
            ("GET", ["api", "hbu-studies", id, "report.txt"]) => self.text_report(id),
            (_, ["health"])
            | (_, ["api", "plots", ..])
            | (_, ["api", "hbu-studies", ..]) => ApiResponse::error(405, "Method not allowed"),
            _ => ApiResponse::error(404, "Not found"),
        }
    }

    fn plot(&self, id: &str) -> ApiResponse {
        match self.service.get_plot(&PlotId::from(id)) {
            Ok(plot) => ApiResponse::json(200, &plot),
            Err(_) => ApiResponse::error(404, "Plot not found"),
        }
    }

    fn plot_studies(&self, id: &str) -> ApiResponse {
        match self.service.studies_for_plot(&PlotId::from(id)) {
            Ok(studies) => ApiResponse::json(200, &studies),
            Err(Error::PlotNotFound { .. }) => ApiResponse::error(404, "Plot not found"),
            Err(e) => {
                error!(plot_id = id, error = %e, "failed to fetch studies");
                ApiResponse::error(500, "Failed to fetch studies")
            }
        }
    }

    fn create_study(&self, body: &str) -> ApiResponse {
        let request: CreateStudyRequest = match serde_json::from_str(body) {
            Ok(r) => r,
            Err(e) => {
                return ApiResponse::error_with_details(400, "Invalid request body", &e.to_string())
            }
        };
        if request.plot_id.trim().is_empty() {
            return ApiResponse::error_with_details(
                400,
                "Invalid request body",
                "plotId must not be empty",
            );
        }

        match self.service.generate_study(&PlotId::from(request.plot_id)) {
            Ok(study) => ApiResponse::json(200, &json!({ "study": study })),
            Err(Error::PlotNotFound { .. }) => ApiResponse::error(404, "Plot not found"),
            Err(e) => {
                error!(error = %e, "study generation failed");
                ApiResponse::error_with_details(500, "Failed to generate HBU study", &e.to_string())
            }
        }
    }

    fn study(&self, id: &str) -> ApiResponse {
        match self.service.get_study(&StudyId::from(id)) {
            Ok(study) => ApiResponse::json(200, &study),
            Err(_) => ApiResponse::error(404, "Study not found"),
        }
    }

    fn pdf_report(&self, id: &str) -> ApiResponse {
        let (study, plot) = match self.service.report_inputs(&StudyId::from(id)) {
            Ok(inputs) => inputs,
            Err(e) => return lookup_failure(&e),
        };

        let mut sink = MemorySink::new();
        let delivered = self
            .exporter
            .export_pdf(Some(&study), Some(&plot), &mut sink)
            .map(|_| sink.last_document().cloned());
        match delivered {
            Ok(Some((filename, bytes))) => ApiResponse {
                status: 200,
                content_type: "application/pdf",
                body: bytes,
                attachment: Some(filename),
            },
            Ok(None) => ApiResponse::error(500, "Failed to render report"),
            Err(e) => {
                error!(study_id = id, error = %e, "pdf export failed");
                ApiResponse::error_with_details(500, "Failed to render report", &e.to_string())
            }
        }
    }

    fn text_report(&self, id: &str) -> ApiResponse {
        let (study, plot) = match self.service.report_inputs(&StudyId::from(id)) {
            Ok(inputs) => inputs,
            Err(e) => return lookup_failure(&e),
        };

        let mut sink = MemorySink::new();
        let delivered = self
            .exporter
            .export_text(Some(&study), Some(&plot), &mut sink)
            .map(|_| sink.last_text().map(str::to_string));
        match delivered {
            Ok(Some(text)) => ApiResponse::text(200, text),
            Ok(None) => ApiResponse::error(500, "Failed to render report"),
            Err(e) => {
                error!(study_id = id, error = %e, "text export failed");
                ApiResponse::error_with_details(500, "Failed to render report", &e.to_string())
            }
        }
    }
}

fn lookup_failure(err: &Error) -> ApiResponse {
    match err {
        Error::PlotNotFound { .. } => ApiResponse::error(404, "Plot not found"),
        Error::StudyNotFound { .. } => ApiResponse::error(404, "Study not found"),
        _ => {
            error!(error = %err, "failed to fetch study");
            ApiResponse::error(500, "Failed to fetch study")
        }
    }
}

/// Handle to the running HTTP server.
pub struct ApiServer {
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    addr: SocketAddr,
}

impl ApiServer {
    /// Bind `bind` and start serving on a background thread.
    ///
    /// Port 0 picks a free port; see [`addr`](Self::addr).
    pub fn start<R: Repository + 'static>(
        bind: &str,
        state: ApiState<R>,
    ) -> Result<Self, ServerError> {
        let requested: SocketAddr = bind.parse().map_err(|e: std::net::AddrParseError| {
            ServerError::InvalidAddr {
                addr: bind.to_string(),
                reason: e.to_string(),
            }
        })?;

        let server = tiny_http::Server::http(requested).map_err(|e| ServerError::Bind {
            addr: requested.to_string(),
            reason: e.to_string(),
        })?;
        let addr = server.server_addr().to_ip().unwrap_or(requested);

        info!(addr = %addr, analyzer = state.service.analyzer_name(), "api server started");

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let thread = thread::Builder::new()
            .name("hbu-api".to_string())
            .spawn(move || serve_loop(server, &state, &shutdown_clone))?;

        Ok(Self {
            shutdown,
            thread: Some(thread),
            addr,
        })
    }

    /// The bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the accept loop exits.
    pub fn wait(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Stop accepting and join the server thread.
    pub fn shutdown(mut self) {
        self.stop();
        info!("api server stopped");
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve_loop<R: Repository>(server: tiny_http::Server, state: &ApiState<R>, shutdown: &AtomicBool) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        // Poll so the shutdown flag is noticed
        let mut request = match server.recv_timeout(Duration::from_millis(250)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(e) => {
                if !shutdown.load(Ordering::SeqCst) {
                    error!(error = %e, "api server accept error");
                }
                break;
            }
        };

        let method = request.method().to_string().to_uppercase();
        let url = request.url().to_string();

        let mut body = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut body) {
            warn!(url = %url, error = %e, "failed to read request body");
            let _ = request.respond(to_tiny(ApiResponse::error(400, "Invalid request body")));
            continue;
        }

        let response = state.handle(&method, &url, &body);
        debug!(method = %method, url = %url, status = response.status, "request handled");

        if let Err(e) = request.respond(to_tiny(response)) {
            warn!(url = %url, error = %e, "failed to send response");
        }
    }
}

fn header(name: &str, value: &str) -> Option<tiny_http::Header> {
    tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn to_tiny(response: ApiResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut out = tiny_http::Response::from_data(response.body).with_status_code(response.status);
    if let Some(h) = header("Content-Type", response.content_type) {
        out = out.with_header(h);
    }
    if let Some(filename) = response.attachment {
        let value = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
        if let Some(h) = header("Content-Disposition", &value) {
            out = out.with_header(h);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StaticAnalyzer;
    use crate::store::MemoryRepository;
    use chrono::NaiveDate;
    use hbu_report::ReportConfig;

    fn state() -> ApiState<MemoryRepository> {
        let service = StudyService::new(
            Arc::new(MemoryRepository::seeded()),
            Box::new(StaticAnalyzer::new()),
        );
        let exporter = ReportExporter::new(
            ReportConfig::new().with_export_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        );
        ApiState::new(service, exporter)
    }

    fn body_json(response: &ApiResponse) -> serde_json::Value {
        serde_json::from_slice(&response.body).unwrap()
    }

    fn create(state: &ApiState<MemoryRepository>, plot_id: &str) -> String {
        let response = state.handle(
            "POST",
            "/api/hbu-studies",
            &json!({ "plotId": plot_id }).to_string(),
        );
        assert_eq!(response.status, 200, "{}", response.body_str());
        body_json(&response)["study"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_health() {
        let response = state().handle("GET", "/health", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body_str(), "ok");
    }

    #[test]
    fn test_list_and_get_plots() {
        let state = state();
        let list = state.handle("GET", "/api/plots", "");
        assert_eq!(list.status, 200);
        assert_eq!(body_json(&list).as_array().unwrap().len(), 8);

        let one = state.handle("GET", "/api/plots/plot-001?fields=all", "");
        assert_eq!(one.status, 200);
        assert!(body_json(&one)["parcelNumber"].is_string());

        let missing = state.handle("GET", "/api/plots/plot-999", "");
        assert_eq!(missing.status, 404);
        assert_eq!(body_json(&missing), json!({ "error": "Plot not found" }));
    }

    #[test]
    fn test_create_study_validation() {
        let state = state();
        let bad = state.handle("POST", "/api/hbu-studies", "{\"plot\":1}");
        assert_eq!(bad.status, 400);
        assert_eq!(body_json(&bad)["error"], "Invalid request body");

        let empty = state.handle("POST", "/api/hbu-studies", "{\"plotId\":\"\"}");
        assert_eq!(empty.status, 400);

        let unknown = state.handle("POST", "/api/hbu-studies", "{\"plotId\":\"plot-999\"}");
        assert_eq!(unknown.status, 404);
        assert_eq!(body_json(&unknown)["error"], "Plot not found");
    }

    #[test]
    fn test_create_then_fetch_study() {
        let state = state();
        let id = create(&state, "plot-002");

        let study = state.handle("GET", &format!("/api/hbu-studies/{id}"), "");
        assert_eq!(study.status, 200);
        assert_eq!(body_json(&study)["plotId"], "plot-002");

        let studies = state.handle("GET", "/api/plots/plot-002/studies", "");
        assert_eq!(body_json(&studies).as_array().unwrap().len(), 1);

        let missing = state.handle("GET", "/api/hbu-studies/study-nope", "");
        assert_eq!(missing.status, 404);
        assert_eq!(body_json(&missing), json!({ "error": "Study not found" }));
    }

    #[test]
    fn test_reports() {
        let state = state();
        let id = create(&state, "plot-001");

        let pdf = state.handle("GET", &format!("/api/hbu-studies/{id}/report.pdf"), "");
        assert_eq!(pdf.status, 200);
        assert_eq!(pdf.content_type, "application/pdf");
        assert!(pdf.body.starts_with(b"%PDF"));
        let filename = pdf.attachment.as_deref().unwrap();
        assert!(filename.starts_with("HBU-Study-"));
        assert!(filename.ends_with("-2025-03-01.pdf"));

        let text = state.handle("GET", &format!("/api/hbu-studies/{id}/report.txt"), "");
        assert_eq!(text.status, 200);
        assert!(text.body_str().contains("1. DEVELOPMENT SCENARIOS"));
        assert!(text.body_str().contains("7. CONCLUSION & NEXT STEPS"));
    }

    #[test]
    fn test_unknown_routes() {
        let state = state();
        assert_eq!(state.handle("GET", "/api/unknown", "").status, 404);
        assert_eq!(state.handle("DELETE", "/api/plots/plot-001", "").status, 405);
    }

    #[test]
    fn test_bad_bind_address() {
        let err = ApiServer::start("not-an-address", state()).err().unwrap();
        assert!(matches!(err, ServerError::InvalidAddr { .. }));
    }
}
