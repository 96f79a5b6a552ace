use crate::api::Transport;
use crate::dom::page::LANGUAGE_SELECTOR;
use crate::languages::DEFAULT_LANGUAGE;
use crate::storage::{LANGUAGE_KEY, PreferenceStore};

use super::{Completion, Dashboard};

impl<S: PreferenceStore, T: Transport> Dashboard<S, T> {
    /// Restore the saved language into the selector, if both exist.
    pub(super) fn init_language_selector(&mut self) -> bool {
        let Some(selector) = self.document.get_element_by_id(LANGUAGE_SELECTOR) else {
            return false;
        };
        if let Some(saved) = self.store.get(LANGUAGE_KEY)
            && !saved.is_empty()
        {
            self.document.set_value(selector, saved);
        }
        true
    }

    /// The selector changed to `code`: reflect it and persist it verbatim.
    ///
    /// The value is not checked against the supported list. A storage failure
    /// is logged and otherwise ignored.
    pub fn change_language(&mut self, code: &str) -> Completion {
        if !self.features.language {
            return Completion::Skipped;
        }
        let Some(selector) = self.document.get_element_by_id(LANGUAGE_SELECTOR) else {
            return Completion::Skipped;
        };
        self.document.set_value(selector, code);

        if let Err(e) = self.store.set(LANGUAGE_KEY, code) {
            self.diagnostics
                .log(&format!("failed to persist language preference: {e:#}"));
        }
        self.diagnostics.log(&format!("Language changed to: {code}"));
        Completion::Applied
    }

    /// Language sent with chat requests: the selector value, or `"en"`
    /// when the page has no selector.
    pub fn current_language(&self) -> String {
        self.document
            .get_element_by_id(LANGUAGE_SELECTOR)
            .map(|selector| self.document.value(selector).to_string())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
}
