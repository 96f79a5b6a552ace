use std::fmt;

use crate::api::Transport;
use crate::dom::NodeId;
use crate::dom::page::{ACTIVE_CLASS, NAV_LINK_CLASS, SECTION_CLASS};
use crate::storage::PreferenceStore;

use super::{Completion, Dashboard};

/// A navigation request that cannot be honoured. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The clicked element is not a nav link.
    NotANavLink(NodeId),
    /// The nav link has no `data-target`.
    MissingTarget(NodeId),
    /// No dashboard section has the target id.
    UnknownTarget(String),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANavLink(node) => write!(f, "element {node} is not a navigation link"),
            Self::MissingTarget(node) => write!(f, "navigation link {node} has no data-target"),
            Self::UnknownTarget(target) => write!(f, "no section named '{target}'"),
        }
    }
}

impl std::error::Error for NavigationError {}

impl<S: PreferenceStore, T: Transport> Dashboard<S, T> {
    /// Activate the first link/section pair. Navigation is enabled whenever
    /// at least one link exists.
    pub(super) fn setup_navigation(&mut self) -> bool {
        let links = self.document.query_class(NAV_LINK_CLASS);
        let sections = self.document.query_class(SECTION_CLASS);
        if let (Some(&link), Some(&section)) = (links.first(), sections.first()) {
            self.set_active(link, true);
            self.set_active(section, true);
        }
        !links.is_empty()
    }

    /// A nav link was clicked: show only its target section.
    pub fn click_nav(&mut self, link: NodeId) -> Result<Completion, NavigationError> {
        if !self.features.navigation {
            return Ok(Completion::Skipped);
        }
        let element = self
            .document
            .element(link)
            .filter(|e| e.has_class(NAV_LINK_CLASS))
            .ok_or(NavigationError::NotANavLink(link))?;
        let target = element
            .data("target")
            .ok_or(NavigationError::MissingTarget(link))?
            .to_string();
        let sections = self.document.query_class(SECTION_CLASS);
        let section = sections
            .iter()
            .copied()
            .find(|&n| self.document.element(n).and_then(|e| e.id()) == Some(target.as_str()))
            .ok_or(NavigationError::UnknownTarget(target))?;

        for node in sections {
            self.set_active(node, false);
        }
        self.set_active(section, true);

        for node in self.document.query_class(NAV_LINK_CLASS) {
            self.set_active(node, false);
        }
        self.set_active(link, true);

        Ok(Completion::Applied)
    }

    /// Click the nav link whose `data-target` is `target`.
    pub fn navigate_to(&mut self, target: &str) -> Result<Completion, NavigationError> {
        let link = self
            .document
            .query_class(NAV_LINK_CLASS)
            .into_iter()
            .find(|&n| {
                self.document
                    .element(n)
                    .and_then(|e| e.data("target"))
                    == Some(target)
            })
            .ok_or_else(|| NavigationError::UnknownTarget(target.to_string()))?;
        self.click_nav(link)
    }

    /// Id of the first active section.
    pub fn active_section(&self) -> Option<String> {
        self.document
            .query_class(SECTION_CLASS)
            .into_iter()
            .filter_map(|n| self.document.element(n))
            .find(|e| e.has_class(ACTIVE_CLASS))
            .and_then(|e| e.id())
            .map(str::to_string)
    }

    /// `(section id, label, active)` for every nav link, in order.
    pub fn nav_entries(&self) -> Vec<(String, String, bool)> {
        self.document
            .query_class(NAV_LINK_CLASS)
            .into_iter()
            .filter_map(|n| self.document.element(n))
            .map(|e| {
                (
                    e.data("target").unwrap_or_default().to_string(),
                    e.text().to_string(),
                    e.has_class(ACTIVE_CLASS),
                )
            })
            .collect()
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(e) = self.document.element_mut(node) {
            if active {
                e.add_class(ACTIVE_CLASS);
            } else {
                e.remove_class(ACTIVE_CLASS);
            }
        }
    }
}
