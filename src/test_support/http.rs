use std::panic::{self, AssertUnwindSafe};

use httpmock::MockServer;

/// Start a fresh `httpmock::MockServer` instance for use in unit tests.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}

/// Like [`start_mock_server`], but returns `None` where the sandbox forbids binding a port
/// so callers can skip instead of failing.
pub fn try_start_mock_server() -> Option<MockServer> {
    panic::catch_unwind(AssertUnwindSafe(start_mock_server)).ok()
}
