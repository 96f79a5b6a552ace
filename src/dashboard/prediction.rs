use crate::api::{ApiError, PREDICTION_ENDPOINT, PredictionRequest, PredictionResponse, Transport};
use crate::dom::page::{PREDICTION_FIELDS, PREDICTION_FORM, PREDICTION_RESULT};
use crate::dom::{Document, Element, NodeId};
use crate::storage::PreferenceStore;

use super::tracker::Ticket;
use super::{Completion, Dashboard, error_label};

/// Placeholder text shown while a prediction is in flight.
pub const LOADING_TEXT: &str = "Analyzing soil and weather data...";

/// A prediction that has been rendered as loading and awaits its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrediction {
    ticket: Ticket,
    request: PredictionRequest,
}

impl PendingPrediction {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn request(&self) -> &PredictionRequest {
        &self.request
    }
}

impl<S: PreferenceStore, T: Transport> Dashboard<S, T> {
    pub(super) fn init_prediction(&mut self) -> bool {
        self.document.get_element_by_id(PREDICTION_FORM).is_some()
            && self.document.get_element_by_id(PREDICTION_RESULT).is_some()
    }

    /// Type `value` into one of the prediction inputs.
    pub fn set_prediction_input(&mut self, field: &str, value: &str) -> bool {
        match self.document.get_element_by_id(field) {
            Some(input) if PREDICTION_FIELDS.contains(&field) => {
                self.document.set_value(input, value);
                true
            }
            _ => false,
        }
    }

    /// Show the loading state and capture the form as a request.
    ///
    /// Issuing the ticket supersedes any prediction still in flight.
    pub fn begin_prediction(&mut self) -> Option<PendingPrediction> {
        if !self.features.prediction {
            return None;
        }
        let result = self.document.get_element_by_id(PREDICTION_RESULT)?;
        let ticket = self.prediction.issue();

        let loading = self
            .document
            .replace_children(result, Element::new("div").with_class("text-center"));
        self.document.append(
            loading,
            Element::new("div")
                .with_class("spinner-border text-success")
                .with_attr("role", "status"),
        );
        self.document
            .append(loading, Element::new("p").with_text(LOADING_TEXT));

        let mut request = PredictionRequest::default();
        for field in PREDICTION_FIELDS {
            let value = self
                .document
                .get_element_by_id(field)
                .map(|input| self.document.value(input).to_string())
                .unwrap_or_default();
            if let Some(slot) = request.field_mut(field) {
                *slot = value;
            }
        }

        Some(PendingPrediction { ticket, request })
    }

    /// Render the outcome of `pending`, unless a newer submission replaced it.
    pub fn complete_prediction(
        &mut self,
        pending: PendingPrediction,
        outcome: Result<PredictionResponse, ApiError>,
    ) -> Completion {
        if !self.prediction.is_current(pending.ticket) {
            return Completion::Discarded;
        }
        self.prediction.settle(pending.ticket);

        let Some(result) = self.document.get_element_by_id(PREDICTION_RESULT) else {
            return Completion::Discarded;
        };

        match outcome {
            Ok(PredictionResponse::Recommendation { crop, description }) => render_alert(
                &mut self.document,
                result,
                "alert-success",
                &format!("Recommended Crop: {crop}"),
                &description,
            ),
            Ok(PredictionResponse::Failure { error }) => {
                render_alert(&mut self.document, result, "alert-danger", "Error", &error)
            }
            Err(e) => render_alert(
                &mut self.document,
                result,
                "alert-danger",
                "Error",
                &format!("Failed to get prediction: {e}"),
            ),
        }
        Completion::Applied
    }

    /// Submit the prediction form and wait for the backend.
    pub fn submit_prediction(&mut self) -> Completion {
        let Some(pending) = self.begin_prediction() else {
            return Completion::Skipped;
        };
        let (outcome, latency_ms) = self.timed(|client| client.predict_crop(pending.request()));
        let label = match &outcome {
            Ok(PredictionResponse::Recommendation { .. }) => "ok",
            Ok(PredictionResponse::Failure { .. }) => "server-error",
            Err(e) => error_label(e),
        };

        let completion = self.complete_prediction(pending, outcome);
        let label = if completion == Completion::Discarded {
            "discarded"
        } else {
            label
        };
        self.diagnostics
            .record_request(PREDICTION_ENDPOINT, label, latency_ms);
        completion
    }
}

/// Replace the region's content with one alert panel: heading plus paragraph.
fn render_alert(doc: &mut Document, region: NodeId, kind: &str, heading: &str, body: &str) {
    let panel = doc.replace_children(
        region,
        Element::new("div").with_class(&format!("alert {kind}")),
    );
    doc.append(
        panel,
        Element::new("h4")
            .with_class("alert-heading")
            .with_text(heading),
    );
    doc.append(panel, Element::new("p").with_text(body));
}
