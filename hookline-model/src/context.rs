use hookline_store::ItemStore;
use hookline_types::{RequestId, Session};
use std::fmt;
use std::sync::Arc;

/// Handle passed unchanged to every hook of a mutation.
///
/// Gives hooks access to the item store for auxiliary queries and to the
/// caller's session. The pipeline itself never looks inside.
#[derive(Clone)]
pub struct HookContext {
    request_id: RequestId,
    session: Option<Session>,
    store: Arc<dyn ItemStore>,
}

impl HookContext {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            request_id: RequestId::new(),
            session: None,
            store,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Store used for auxiliary reads (and writes) from inside hooks.
    pub fn store(&self) -> &dyn ItemStore {
        self.store.as_ref()
    }
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("request_id", &self.request_id)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
