//! The platform boundary.

use std::sync::Arc;

use extwin_protocol::PlatformRequest;

use crate::notify::NotifyHandle;
use crate::pending::PendingOperation;

/// The host application side of the windowing subsystem.
///
/// Every primitive is fire-and-forget-with-callback: `submit` must not
/// block, and the implementation must later invoke exactly one notify
/// method matching the request kind on `notify`, exactly once. Results
/// arrive out-of-band; ordering between unrelated requests is unspecified.
pub trait Platform: Send + Sync {
    fn submit(&self, request: PlatformRequest, notify: NotifyHandle);
}

/// Issues one request and returns the operation to suspend on.
pub(crate) fn issue(platform: &Arc<dyn Platform>, request: PlatformRequest) -> PendingOperation {
    let (op, shared) = PendingOperation::new();
    platform.submit(request, NotifyHandle::new(shared));
    op
}
