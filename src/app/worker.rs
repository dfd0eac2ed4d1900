//! Background thread that owns the `ServiceApi` and runs requests in order.
//!
//! The UI thread submits requests and polls for responses between input
//! events, so it never blocks on the network.
//!
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use super::sync::{Request, Response, execute};
use crate::api::ServiceApi;

pub struct Worker {
    requests: Option<Sender<Request>>,
    responses: Receiver<Response>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn the worker thread. It exits once the `Worker` is dropped.
    pub fn spawn(api: Box<dyn ServiceApi>) -> std::io::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();
        let handle = std::thread::Builder::new()
            .name("svcpkg-requests".to_string())
            .spawn(move || {
                for request in req_rx {
                    tracing::debug!(?request, "executing");
                    let response = execute(api.as_ref(), request);
                    if resp_tx.send(response).is_err() {
                        // UI is gone; late responses are dropped
                        break;
                    }
                }
            })?;
        Ok(Self {
            requests: Some(req_tx),
            responses: resp_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, request: Request) {
        if let Some(tx) = &self.requests {
            if tx.send(request).is_err() {
                tracing::error!("request worker has stopped");
            }
        }
    }

    /// Next finished response, if one is ready.
    pub fn try_next(&self) -> Option<Response> {
        match self.responses.try_recv() {
            Ok(r) => Some(r),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next response.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Response> {
        self.responses.recv_timeout(timeout).ok()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // closing the request channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            // a request still in flight is not waited for
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}
