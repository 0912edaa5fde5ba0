//! Fake platform for unit testing drivers and notification plumbing.
//!
//! Records every submitted request and either hands it to a test-provided
//! responder (which plays the platform's callback role by invoking notify
//! methods) or parks it for manual resolution from the test body.

use std::sync::Arc;

use extwin_protocol::PlatformRequest;
use parking_lot::Mutex;

use crate::notify::NotifyHandle;
use crate::platform::Platform;

type Responder = Box<dyn FnMut(&PlatformRequest, NotifyHandle) + Send>;

/// In-memory [`Platform`] double.
#[derive(Default)]
pub struct FakePlatform {
    requests: Mutex<Vec<PlatformRequest>>,
    responder: Mutex<Option<Responder>>,
    parked: Mutex<Vec<(PlatformRequest, NotifyHandle)>>,
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Installs the callback side of the platform: invoked synchronously for
    /// each submitted request. A responder that does not notify leaves the
    /// operation suspended, which tests can use to observe in-flight state.
    pub fn respond_with(&self, responder: impl FnMut(&PlatformRequest, NotifyHandle) + Send + 'static) {
        *self.responder.lock() = Some(Box::new(responder));
    }

    /// All requests submitted so far, in order.
    pub fn requests(&self) -> Vec<PlatformRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Takes requests parked because no responder was installed, so the test
    /// can resolve them out-of-band.
    pub fn take_parked(&self) -> Vec<(PlatformRequest, NotifyHandle)> {
        std::mem::take(&mut *self.parked.lock())
    }
}

impl Platform for FakePlatform {
    fn submit(&self, request: PlatformRequest, notify: NotifyHandle) {
        self.requests.lock().push(request.clone());
        let mut responder = self.responder.lock();
        match responder.as_mut() {
            Some(respond) => respond(&request, notify),
            None => self.parked.lock().push((request, notify)),
        }
    }
}
