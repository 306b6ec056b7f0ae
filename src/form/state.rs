use indexmap::IndexMap;

use super::{
    aggregator::FieldValidationAggregator,
    field::{FieldDescriptor, FieldView, Validity},
};

/// Everything a dialog knows about its form. Owned by exactly one controller.
#[derive(Debug, Clone)]
pub struct FormState {
    aggregator: FieldValidationAggregator,
    is_open: bool,
    has_emitted_result: bool,
}

impl FormState {
    pub fn new(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            aggregator: FieldValidationAggregator::new(descriptors),
            is_open: true,
            has_emitted_result: false,
        }
    }

    pub fn aggregate(&self) -> Validity {
        self.aggregator.aggregate()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn has_emitted_result(&self) -> bool {
        self.has_emitted_result
    }

    pub fn field_count(&self) -> usize {
        self.aggregator.len()
    }

    pub fn field(&self, index: usize) -> Option<FieldView<'_>> {
        self.aggregator.field(index)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.aggregator.fields()
    }

    pub fn error_count(&self) -> usize {
        self.aggregator.invalid_count()
    }

    /// Current values keyed by label, in field order. A repeated label keeps its first position
    /// and the later value.
    pub fn values(&self) -> IndexMap<String, String> {
        self.fields()
            .map(|field| (field.label.to_string(), field.value.to_string()))
            .collect()
    }

    pub(crate) fn apply_value(&mut self, index: usize, value: String) -> Option<Validity> {
        if !self.is_open {
            return None;
        }
        Some(self.aggregator.on_value_changed(index, value))
    }

    /// Flips the form to closed. Returns `false` if it was already closed.
    pub(crate) fn close(&mut self) -> bool {
        if !self.is_open || self.has_emitted_result {
            return false;
        }
        self.is_open = false;
        self.has_emitted_result = true;
        true
    }
}
