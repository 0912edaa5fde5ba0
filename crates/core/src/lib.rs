// extwin-core: mechanism for script-driven control of the host application's
// windows, tabs, and tab-groups.
//
// Scripts see a synchronous-looking call surface; the platform works
// asynchronously and reports results through per-request callbacks. This
// crate reconciles the two with owned result envelopes, one-shot pending
// operations, an object identity cache, and explicit state machines for the
// composite create operations.

pub mod cache;
pub mod create;
pub mod envelope;
pub mod error;
pub mod fake;
pub mod notify;
pub mod pending;
pub mod platform;
pub mod windowing;

pub use cache::{ObjectCache, ScriptObject};
pub use create::InitialEntry;
pub use envelope::{EnvelopeKind, Payload, ResultEnvelope};
pub use error::{Error, Result};
pub use fake::FakePlatform;
pub use notify::NotifyHandle;
pub use pending::PendingOperation;
pub use platform::Platform;
pub use windowing::Windowing;
