//! The dashboard UI controller.
//!
//! [`Dashboard`] owns the injected context the handlers work against: the
//! [`Document`], a [`PreferenceStore`] and a [`BackendClient`] over some
//! [`Transport`]. It binds four features on [`init`](Dashboard::init):
//!
//! - **Language** — persist the selector value, restore it on init
//! - **Prediction** — submit soil/weather fields, render the recommendation
//! - **Chat** — append user/bot bubbles around a chatbot round-trip
//! - **Navigation** — show exactly one section at a time
//!
//! Each feature is enabled only if its root elements exist in the document.
//!
//! Network-backed flows come in two halves: `begin_*` renders the pending
//! state and returns a handle carrying a [`Ticket`], and `complete_*` applies
//! an outcome for that handle. `submit_*` runs both around a blocking call to
//! the transport. Completions are checked against the region's
//! [`RequestTracker`], so a superseded prediction never overwrites a newer one.

mod chat;
mod language;
mod navigation;
mod prediction;
pub mod tracker;

use std::time::Instant;

use crate::api::{ApiError, BackendClient, Transport};
use crate::diagnostics::Diagnostics;
use crate::dom::{Document, NodeId};
use crate::storage::PreferenceStore;

pub use chat::{ChatMessage, MessageKind, PendingChat, Sender};
pub use navigation::NavigationError;
pub use prediction::{LOADING_TEXT, PendingPrediction};
pub use tracker::{RequestTracker, Ticket};

/// What happened to an event or a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The document was updated.
    Applied,
    /// A response arrived for a superseded or cancelled request.
    Discarded,
    /// The feature is disabled or the input was rejected; nothing happened.
    Skipped,
}

/// Which features found their elements at init time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub language: bool,
    pub prediction: bool,
    pub chat: bool,
    pub navigation: bool,
}

/// A user interaction the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LanguageChanged(String),
    SubmitPrediction,
    SubmitChat,
    NavClicked(NodeId),
}

pub struct Dashboard<S, T> {
    document: Document,
    store: S,
    client: BackendClient<T>,
    diagnostics: Diagnostics,
    prediction: RequestTracker,
    chat: RequestTracker,
    features: Features,
}

impl<S: PreferenceStore, T: Transport> Dashboard<S, T> {
    /// Wrap a document and its collaborators. Call [`init`](Self::init) next.
    pub fn new(document: Document, store: S, client: BackendClient<T>) -> Self {
        Self {
            document,
            store,
            client,
            diagnostics: Diagnostics::disabled(),
            prediction: RequestTracker::new(),
            chat: RequestTracker::new(),
            features: Features::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Bind every feature whose elements are present (page-load time).
    pub fn init(&mut self) -> Features {
        self.features = Features {
            language: self.init_language_selector(),
            prediction: self.init_prediction(),
            chat: self.init_chat(),
            navigation: self.setup_navigation(),
        };
        self.diagnostics.log(&format!(
            "dashboard initialized language={} prediction={} chat={} navigation={}",
            self.features.language,
            self.features.prediction,
            self.features.chat,
            self.features.navigation
        ));
        self.features
    }

    /// Dispatch one interaction to its handler.
    pub fn handle(&mut self, event: Event) -> Result<Completion, NavigationError> {
        match event {
            Event::LanguageChanged(code) => Ok(self.change_language(&code)),
            Event::SubmitPrediction => Ok(self.submit_prediction()),
            Event::SubmitChat => Ok(self.submit_chat()),
            Event::NavClicked(link) => self.click_nav(link),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &BackendClient<T> {
        &self.client
    }

    pub fn features(&self) -> Features {
        self.features
    }

    /// Consume the controller, returning the document and store.
    pub fn into_parts(self) -> (Document, S) {
        (self.document, self.store)
    }

    /// Run a backend call, timing it for the request log.
    fn timed<R>(&self, call: impl FnOnce(&BackendClient<T>) -> Result<R, ApiError>) -> (Result<R, ApiError>, u64) {
        let started = Instant::now();
        let outcome = call(&self.client);
        (outcome, started.elapsed().as_millis() as u64)
    }
}

/// Request-log label for a transport/decode failure.
fn error_label(error: &ApiError) -> &'static str {
    match error {
        ApiError::Transport(_) => "transport-error",
        ApiError::Decode(_) => "malformed",
    }
}
