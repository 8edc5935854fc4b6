use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::api::{Gateway, Transport};
use crate::app::{Reply, Request};

/// Run remote requests one at a time off the UI thread.
///
/// The worker exits when the request channel closes or the UI stops
/// listening for replies.
pub fn spawn_gateway_worker<T>(
    gateway: Gateway<T>,
    requests: Receiver<Request>,
    replies: Sender<Reply>,
) -> JoinHandle<()>
where
    T: Transport + 'static,
{
    thread::spawn(move || {
        for Request { id, op } in requests {
            tracing::debug!(request = id.0, op = op.name(), "request started");
            let outcome = op.perform(&gateway);
            if let Some(e) = outcome.error() {
                tracing::debug!(request = id.0, "request failed: {}", e.detail());
            }
            if replies.send(Reply { id, outcome }).is_err() {
                break;
            }
        }
        tracing::debug!("gateway worker stopped");
    })
}
