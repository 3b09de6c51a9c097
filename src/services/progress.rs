use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::models::ProgressEvent;

/// Receives best-effort progress notifications during an audit.
///
/// Implementations must not fail the audit: a lost event is acceptable.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Forwards events into a channel; a closed receiver is ignored.
pub struct ChannelProgress(pub UnboundedSender<ProgressEvent>);

impl ProgressSink for ChannelProgress {
    fn emit(&self, event: ProgressEvent) {
        if let Err(e) = self.0.send(event) {
            trace!("Progress receiver gone, dropping {:?}", e.0);
        }
    }
}
