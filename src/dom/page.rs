//! The dashboard page skeleton and the element ids the controller relies on.
//!
//! [`dashboard_page`] builds the same structure the server-rendered
//! dashboard template provides: a language selector, navigation links with
//! `data-target` attributes, and three sections holding the prediction form
//! and the chat panel.

use crate::languages;

use super::{Document, Element, NodeId};

pub const LANGUAGE_SELECTOR: &str = "language-selector";
pub const PREDICTION_FORM: &str = "crop-prediction-form";
pub const PREDICTION_RESULT: &str = "prediction-result";
pub const CHAT_FORM: &str = "chat-form";
pub const CHAT_MESSAGES: &str = "chat-messages";
pub const MESSAGE_INPUT: &str = "message-input";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const SECTION_CLASS: &str = "dashboard-section";
pub const ACTIVE_CLASS: &str = "active";

/// Input ids of the prediction form, in wire order.
pub const PREDICTION_FIELDS: [&str; 7] = [
    "nitrogen",
    "phosphorus",
    "potassium",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// `(section id, nav label)` pairs, in navigation order.
pub const SECTIONS: [(&str, &str); 3] = [
    ("overview", "Overview"),
    ("crop-prediction", "Crop Prediction"),
    ("chatbot", "AgriBot"),
];

fn field_label(field: &str) -> &'static str {
    match field {
        "nitrogen" => "Nitrogen (N)",
        "phosphorus" => "Phosphorus (P)",
        "potassium" => "Potassium (K)",
        "temperature" => "Temperature (°C)",
        "humidity" => "Humidity (%)",
        "ph" => "Soil pH",
        "rainfall" => "Rainfall (mm)",
        _ => "",
    }
}

/// Build the full dashboard page.
pub fn dashboard_page() -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    let header = doc.append(root, Element::new("header"));
    doc.append(header, Element::new("h1").with_text("AgriGuide Dashboard"));
    let selector = doc.append(
        header,
        Element::new("select")
            .with_id(LANGUAGE_SELECTOR)
            .with_value("en"),
    );
    for (code, name) in languages::SUPPORTED {
        doc.append(
            selector,
            Element::new("option").with_value(*code).with_text(*name),
        );
    }

    let nav = doc.append(root, Element::new("nav"));
    for (id, label) in SECTIONS {
        doc.append(
            nav,
            Element::new("a")
                .with_class(NAV_LINK_CLASS)
                .with_attr("href", "#")
                .with_attr("data-target", id)
                .with_text(label),
        );
    }

    let overview = section(&mut doc, "overview");
    doc.append(
        overview,
        Element::new("p").with_text(
            "Get crop recommendations from soil and weather data, or ask AgriBot about farming.",
        ),
    );

    let prediction = section(&mut doc, "crop-prediction");
    let form = doc.append(prediction, Element::new("form").with_id(PREDICTION_FORM));
    for field in PREDICTION_FIELDS {
        doc.append(
            form,
            Element::new("input")
                .with_id(field)
                .with_attr("type", "number")
                .with_attr("name", field)
                .with_attr("label", field_label(field)),
        );
    }
    doc.append(
        prediction,
        Element::new("div").with_id(PREDICTION_RESULT),
    );

    let chatbot = section(&mut doc, "chatbot");
    doc.append(
        chatbot,
        Element::new("div")
            .with_id(CHAT_MESSAGES)
            .with_class("chat-messages"),
    );
    let chat_form = doc.append(chatbot, Element::new("form").with_id(CHAT_FORM));
    doc.append(
        chat_form,
        Element::new("input")
            .with_id(MESSAGE_INPUT)
            .with_attr("type", "text")
            .with_attr("placeholder", "Ask about crops, soil, irrigation..."),
    );

    doc
}

fn section(doc: &mut Document, id: &str) -> NodeId {
    let root = doc.root();
    doc.append(
        root,
        Element::new("section")
            .with_id(id)
            .with_class(SECTION_CLASS),
    )
}
