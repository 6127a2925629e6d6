//! Request-scoped data carried alongside every log call.

use std::sync::Arc;

use super::value::{Field, Value};

/// Request-scoped context passed to every log call.
///
/// A context optionally carries a trace identifier, which is attached to every record as the
/// `trace_id` field, and a set of fields which are attached to every record logged with this
/// context. Cloning a context is cheap.
///
/// ```
/// use ylog::Context;
///
/// let ctx = Context::background()
///     .with_trace_id("trace_xxxx")
///     .with_field("merchant_id", "m_123");
/// assert_eq!(ctx.trace_id(), Some("trace_xxxx"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context {
    trace_id: Option<Arc<str>>,
    fields: Arc<Vec<Field>>,
}

impl Context {
    /// An empty context, without a trace identifier or fields.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a copy of this context carrying the specified trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<Arc<str>>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Returns a copy of this context with an additional field.
    ///
    /// Setting a key that is already present replaces its value.
    #[must_use]
    pub fn with_field(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        let fields = Arc::make_mut(&mut self.fields);
        let value = value.into();
        match fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing_value)) => *existing_value = value,
            None => fields.push((key, value)),
        }
        self
    }

    /// The trace identifier carried by this context, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// The fields carried by this context, in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_empty() {
        let ctx = Context::background();
        assert_eq!(ctx.trace_id(), None);
        assert!(ctx.fields().is_empty());
    }

    #[test]
    fn derived_contexts_do_not_affect_parents() {
        let parent = Context::background().with_field("user", "alice");
        let child = parent
            .clone()
            .with_trace_id("trace_1")
            .with_field("user", "bob")
            .with_field("attempt", 2_u8);

        assert_eq!(parent.trace_id(), None);
        assert_eq!(parent.fields(), &[("user", Value::from("alice"))]);
        assert_eq!(child.trace_id(), Some("trace_1"));
        assert_eq!(
            child.fields(),
            &[("user", Value::from("bob")), ("attempt", Value::Uint(2))]
        );
    }
}
