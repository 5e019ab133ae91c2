use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::orchestrator::error::PipelineError;
use crate::platform::detector::ElementInfo;

// ============================================================================
// Page-state snapshot
// ============================================================================

/// Structured snapshot of the application's current UI state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageState {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    /// Raw page content (HTML or equivalent)
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub elements: Vec<ElementInfo>,

    #[serde(default)]
    pub resources: Vec<String>,

    #[serde(default)]
    pub console_logs: Vec<String>,
}

// ============================================================================
// Platform trait — the external application-driver collaborator
// ============================================================================

/// Drives the application under test. Implementations are thin wrappers
/// around external tools; retry policy, if any, lives behind this trait.
pub trait Platform {
    fn navigate(&mut self, url: &str) -> Result<(), PipelineError>;
    fn click(&mut self, selector: &str) -> Result<(), PipelineError>;
    fn fill(&mut self, selector: &str, value: &str) -> Result<(), PipelineError>;
    fn submit(&mut self, selector: &str) -> Result<(), PipelineError>;
    fn screenshot(&mut self, path: &str) -> Result<(), PipelineError>;
    fn start_recording(&mut self) -> Result<(), PipelineError>;
    fn stop_recording(&mut self) -> Result<(), PipelineError>;
    fn get_metrics(&mut self) -> Result<HashMap<String, f64>, PipelineError>;
    fn page_state(&mut self) -> Result<PageState, PipelineError>;
}

// ============================================================================
// ProcessPlatform — NDJSON driver process (browser / device bridge)
// ============================================================================

/// Request sent to the driver process over stdin (one JSON line).
#[derive(Debug, Serialize)]
pub struct PlatformRequest {
    pub cmd: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl PlatformRequest {
    fn bare(cmd: &'static str) -> Self {
        Self {
            cmd,
            url: None,
            selector: None,
            value: None,
            path: None,
        }
    }
}

/// Response read from the driver process over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct PlatformResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub metrics: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub state: Option<PageState>,
}

/// A persistent driver session backed by a long-lived helper process.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct ProcessPlatform {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    script: String,
}

impl ProcessPlatform {
    /// Launch the driver process and wait for its ready signal.
    pub fn launch(script: &str) -> Result<Self, PipelineError> {
        let mut child = Command::new(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PipelineError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            PipelineError::SessionIo(format!("Failed to capture stdin of {}", script))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            PipelineError::SessionIo(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| PipelineError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: PlatformResponse =
            serde_json::from_str(line.trim()).map_err(|e| PipelineError::JsonCodec {
                context: format!("{} ready signal", script),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(PipelineError::PlatformAction {
                action: "launch".to_string(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        Ok(Self {
            child,
            stdin,
            reader,
            script: script.to_string(),
        })
    }

    fn send(&mut self, request: &PlatformRequest) -> Result<PlatformResponse, PipelineError> {
        let json = serde_json::to_string(request).map_err(|e| PipelineError::JsonCodec {
            context: "PlatformRequest".to_string(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            PipelineError::SessionIo(format!("Failed to write to {} stdin: {}", self.script, e))
        })?;
        self.stdin.flush().map_err(|e| {
            PipelineError::SessionIo(format!("Failed to flush {} stdin: {}", self.script, e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            PipelineError::SessionIo(format!("Failed to read from {} stdout: {}", self.script, e))
        })?;

        if line.trim().is_empty() {
            return Err(PipelineError::SessionIo(format!(
                "Empty response from {} (process may have died)",
                self.script
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| PipelineError::JsonCodec {
            context: format!("{} response", self.script),
            source: e,
        })
    }

    fn send_ok(
        &mut self,
        request: &PlatformRequest,
        action: &str,
    ) -> Result<PlatformResponse, PipelineError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(PipelineError::PlatformAction {
                action: action.to_string(),
                error: response.error.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        Ok(response)
    }

    /// Quit the driver session. Best-effort: the process may already be gone.
    pub fn quit(&mut self) {
        let _ = self.send(&PlatformRequest::bare("quit"));
        let _ = self.child.wait();
    }
}

impl Platform for ProcessPlatform {
    fn navigate(&mut self, url: &str) -> Result<(), PipelineError> {
        let mut request = PlatformRequest::bare("navigate");
        request.url = Some(url.to_string());
        self.send_ok(&request, "navigate")?;
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), PipelineError> {
        let mut request = PlatformRequest::bare("click");
        request.selector = Some(selector.to_string());
        self.send_ok(&request, "click")?;
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), PipelineError> {
        let mut request = PlatformRequest::bare("fill");
        request.selector = Some(selector.to_string());
        request.value = Some(value.to_string());
        self.send_ok(&request, "fill")?;
        Ok(())
    }

    fn submit(&mut self, selector: &str) -> Result<(), PipelineError> {
        let mut request = PlatformRequest::bare("submit");
        request.selector = Some(selector.to_string());
        self.send_ok(&request, "submit")?;
        Ok(())
    }

    fn screenshot(&mut self, path: &str) -> Result<(), PipelineError> {
        let mut request = PlatformRequest::bare("screenshot");
        request.path = Some(path.to_string());
        self.send_ok(&request, "screenshot")?;
        Ok(())
    }

    fn start_recording(&mut self) -> Result<(), PipelineError> {
        self.send_ok(&PlatformRequest::bare("start_recording"), "start_recording")?;
        Ok(())
    }

    fn stop_recording(&mut self) -> Result<(), PipelineError> {
        self.send_ok(&PlatformRequest::bare("stop_recording"), "stop_recording")?;
        Ok(())
    }

    fn get_metrics(&mut self) -> Result<HashMap<String, f64>, PipelineError> {
        let response = self.send_ok(&PlatformRequest::bare("get_metrics"), "get_metrics")?;
        Ok(response.metrics.unwrap_or_default())
    }

    fn page_state(&mut self) -> Result<PageState, PipelineError> {
        let response = self.send_ok(&PlatformRequest::bare("page_state"), "page_state")?;
        response.state.ok_or_else(|| PipelineError::PlatformAction {
            action: "page_state".to_string(),
            error: "No state in page_state response".to_string(),
        })
    }
}

impl Drop for ProcessPlatform {
    fn drop(&mut self) {
        // Best-effort cleanup
        self.quit();
    }
}

// ============================================================================
// MockPlatform — scriptable, call-recording (tests and offline runs)
// ============================================================================

/// In-memory platform. Records every call, serves configured console logs
/// and metrics, and can be told to fail specific actions.
#[derive(Default)]
pub struct MockPlatform {
    pub calls: Vec<String>,
    pub console_logs: Vec<String>,
    pub metrics: HashMap<String, f64>,
    pub page: PageState,
    /// Actions (by name) that should report failure
    pub failing_actions: Vec<String>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_console_logs(mut self, logs: Vec<String>) -> Self {
        self.console_logs = logs.clone();
        self.page.console_logs = logs;
        self
    }

    pub fn with_metrics(mut self, metrics: HashMap<String, f64>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn failing_on(mut self, action: &str) -> Self {
        self.failing_actions.push(action.to_string());
        self
    }

    fn record(&mut self, call: String, action: &str) -> Result<(), PipelineError> {
        self.calls.push(call);
        if self.failing_actions.iter().any(|a| a == action) {
            return Err(PipelineError::PlatformAction {
                action: action.to_string(),
                error: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Platform for MockPlatform {
    fn navigate(&mut self, url: &str) -> Result<(), PipelineError> {
        self.record(format!("navigate {}", url), "navigate")
    }

    fn click(&mut self, selector: &str) -> Result<(), PipelineError> {
        self.record(format!("click {}", selector), "click")
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), PipelineError> {
        self.record(format!("fill {} = {}", selector, value), "fill")
    }

    fn submit(&mut self, selector: &str) -> Result<(), PipelineError> {
        self.record(format!("submit {}", selector), "submit")
    }

    fn screenshot(&mut self, path: &str) -> Result<(), PipelineError> {
        self.record(format!("screenshot {}", path), "screenshot")
    }

    fn start_recording(&mut self) -> Result<(), PipelineError> {
        self.record("start_recording".to_string(), "start_recording")
    }

    fn stop_recording(&mut self) -> Result<(), PipelineError> {
        self.record("stop_recording".to_string(), "stop_recording")
    }

    fn get_metrics(&mut self) -> Result<HashMap<String, f64>, PipelineError> {
        self.record("get_metrics".to_string(), "get_metrics")?;
        Ok(self.metrics.clone())
    }

    fn page_state(&mut self) -> Result<PageState, PipelineError> {
        self.record("page_state".to_string(), "page_state")?;
        Ok(self.page.clone())
    }
}
