//! Transport trait and the drain loop

use crate::error::{GameCtlError, Result};
use async_trait::async_trait;
use tracing::debug;

/// Receives lines relayed from the remote, in the order they arrive
pub trait Relay: Send + Sync {
    fn line(&self, line: &str);
}

impl<F> Relay for F
where
    F: Fn(&str) + Send + Sync,
{
    fn line(&self, line: &str) {
        self(line)
    }
}

/// Result of a single read of a progress resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// 200: new progress text
    Lines(String),
    /// 204: nothing new yet
    Empty,
    /// 404: the resource is gone, the tracked work has finished
    Gone,
}

/// Trait for talking to the management service
///
/// Implement this trait to back the pipeline with a session. Calls are
/// issued one at a time; implementations need not support concurrency.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a path. `None` on 204, the body on 200.
    async fn get(&self, path: &str) -> Result<Option<String>>;

    /// POST a path with an optional JSON body. Same status mapping as `get`.
    async fn post(&self, path: &str, body: Option<serde_json::Value>) -> Result<Option<String>>;

    /// Read a progress resource once
    async fn poll(&self, path: &str) -> Result<Poll>;

    /// Follow a progress resource until it disappears, relaying every line.
    ///
    /// There is no iteration cap and no timeout: only a 404 ends the loop.
    async fn drain(&self, locator: &str, relay: &dyn Relay) -> Result<()> {
        let path = locator_path(locator)?;
        debug!("Draining {}", path);
        loop {
            match self.poll(&path).await? {
                Poll::Lines(body) => {
                    for line in body.lines() {
                        relay.line(line);
                    }
                }
                Poll::Empty => {}
                Poll::Gone => {
                    debug!("Drain of {} complete", path);
                    return Ok(());
                }
            }
        }
    }
}

/// Path component of a resource locator: everything from the third `/`.
///
/// `http://host:8080/deployment/backup/7` yields `/deployment/backup/7`.
pub fn locator_path(locator: &str) -> Result<String> {
    locator
        .splitn(4, '/')
        .nth(3)
        .map(|rest| format!("/{}", rest))
        .ok_or_else(|| GameCtlError::Protocol(format!("Invalid resource locator: {}", locator)))
}
