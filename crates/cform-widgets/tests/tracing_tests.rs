#![forbid(unsafe_code)]

//! Widget render span tests.
//!
//! Widget spans enabled:
//!   cargo test -p cform-widgets --features tracing --test tracing_tests
//!
//! Without the feature no spans are emitted:
//!   cargo test -p cform-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cform_core::geometry::Rect;
use cform_render::frame::Frame;
use cform_widgets::{Button, Paragraph, TextArea, TextInput, ValidationErrorDisplay, Widget};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_spans<F>(f: F) -> Vec<CapturedSpan>
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(SpanCapture {
        spans: spans.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let out = spans.lock().unwrap().clone();
    out
}

fn render_all(frame: &mut Frame) {
    Paragraph::heading("Contact Form").render(Rect::new(0, 0, 40, 1), frame);
    TextInput::new()
        .with_placeholder("Edd")
        .render(Rect::new(0, 1, 40, 1), frame);
    ValidationErrorDisplay::new("Error: lastName is a required field.")
        .render(Rect::new(0, 2, 40, 1), frame);
    TextArea::new().render(Rect::new(0, 3, 40, 2), frame);
    Button::new("Submit").render(Rect::new(0, 5, 40, 1), frame);
}

#[test]
#[cfg(feature = "tracing")]
fn spans_created_for_each_widget() {
    let spans = with_captured_spans(|| {
        let mut frame = Frame::new(40, 6);
        render_all(&mut frame);
    });

    let widget_names: Vec<_> = spans
        .iter()
        .filter(|s| s.name == "widget_render")
        .filter_map(|s| s.fields.get("widget").cloned())
        .collect();

    for expected in [
        "Paragraph",
        "TextInput",
        "ValidationErrorDisplay",
        "TextArea",
        "Button",
    ] {
        assert!(
            widget_names.iter().any(|n| n.contains(expected)),
            "missing {expected} span, got: {widget_names:?}"
        );
    }
}

#[test]
#[cfg(feature = "tracing")]
fn span_fields_carry_area() {
    let spans = with_captured_spans(|| {
        let mut frame = Frame::new(40, 6);
        Button::new("Submit").render(Rect::new(3, 5, 20, 1), &mut frame);
    });

    let span = spans
        .iter()
        .find(|s| s.name == "widget_render")
        .expect("button span");
    assert_eq!(span.fields.get("x").map(String::as_str), Some("3"));
    assert_eq!(span.fields.get("y").map(String::as_str), Some("5"));
    assert_eq!(span.fields.get("w").map(String::as_str), Some("20"));
    assert_eq!(span.fields.get("h").map(String::as_str), Some("1"));
}

#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_without_feature() {
    let spans = with_captured_spans(|| {
        let mut frame = Frame::new(40, 6);
        render_all(&mut frame);
    });
    assert!(
        spans.iter().all(|s| s.name != "widget_render"),
        "no widget spans expected without the tracing feature"
    );
}
