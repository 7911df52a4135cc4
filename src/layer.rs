use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::context::{ContextKey, LogContext, RequestFields};
use crate::level::Level;
use crate::logger::Logger;
use crate::record::Attr;

/// `tracing_subscriber` layer that forwards events to a [`Logger`].
///
/// Request identifiers are picked up from span fields named after a
/// [`ContextKey`] (`request_id`, `correlation_id`, `user_id`, `account_id`,
/// `org_id`). An event sees the identifiers of every span it is nested in,
/// with the innermost span winning. Event fields become record attributes
/// and the `message` field becomes the record's message.
///
/// Handler failures cannot be returned from a layer callback, so they are
/// reported on stderr and the event is dropped.
#[derive(Debug, Clone)]
pub struct ContextLayer {
    logger: Logger,
}

impl ContextLayer {
    pub fn new(logger: Logger) -> Self {
        ContextLayer { logger }
    }
}

impl<S> Layer<S> for ContextLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = RequestFields::default();
        attrs.record(&mut RequestFieldVisitor { fields: &mut fields });
        if fields.is_empty() {
            return;
        }
        // Another layer of this type may already have stored fields.
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().replace(fields);
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<RequestFields>() {
            Some(fields) => values.record(&mut RequestFieldVisitor { fields }),
            None => {
                let mut fields = RequestFields::default();
                values.record(&mut RequestFieldVisitor { fields: &mut fields });
                if !fields.is_empty() {
                    extensions.replace(fields);
                }
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let level = Level::from(*event.metadata().level());

        let mut fields = RequestFields::default();
        if let Some(scope) = ctx.event_scope(event) {
            // Leaf first, so inner spans take precedence.
            for span in scope {
                if let Some(span_fields) = span.extensions().get::<RequestFields>() {
                    fields.merge_missing(span_fields);
                }
            }
        }
        let log_ctx = LogContext::from_fields(fields);

        if !self.logger.handler().enabled(&log_ctx, level) {
            return;
        }

        let mut attrs = Vec::new();
        let mut message: Option<String> = None;
        event.record(&mut FieldVisitor { attrs: &mut attrs, message: &mut message });

        if let Err(e) = self.logger.log(&log_ctx, level, message.as_deref().unwrap_or(""), attrs) {
            eprintln!("error handling log event: {}", e);
        }
    }
}

/// Collects event fields into attributes, in the order they were written.
struct FieldVisitor<'a> {
    attrs: &'a mut Vec<Attr>,
    message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.attrs.push(Attr::string(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attr::new(field.name(), value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.attrs.push(Attr::error(field.name(), value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.attrs.push(Attr::string(field.name(), format!("{:?}", value)));
        }
    }
}

/// Picks request identifiers out of span fields; everything else is ignored.
struct RequestFieldVisitor<'a> {
    fields: &'a mut RequestFields,
}

impl<'a> RequestFieldVisitor<'a> {
    fn set(&mut self, field: &Field, value: impl FnOnce() -> String) {
        if let Some(key) = ContextKey::from_name(field.name()) {
            self.fields.set(key, value());
        }
    }
}

impl<'a> Visit for RequestFieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field, || value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.set(field, || value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.set(field, || value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.set(field, || format!("{:?}", value));
    }
}
