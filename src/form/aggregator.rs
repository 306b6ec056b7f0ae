use super::field::{FieldDescriptor, FieldState, FieldView, Validity};

/// Tracks per-field validity and its conjunction across the whole form.
#[derive(Debug, Clone)]
pub struct FieldValidationAggregator {
    fields: Vec<FieldState>,
    aggregate: Validity,
}

impl FieldValidationAggregator {
    /// Builds the fields in caller order and validates every initial value.
    pub fn new(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        let fields = descriptors
            .into_iter()
            .map(FieldState::from_descriptor)
            .collect::<Vec<_>>();
        let mut aggregator = Self {
            fields,
            aggregate: Validity::Valid,
        };
        aggregator.aggregate = aggregator.initial_aggregate();
        aggregator
    }

    /// Conjunction of every field's validity. Vacuously valid without fields.
    pub fn initial_aggregate(&self) -> Validity {
        self.fields
            .iter()
            .fold(Validity::Valid, |acc, field| acc.and(field.validity))
    }

    /// Stores `value`, re-validates that field and returns the new aggregate.
    ///
    /// An index past the last field changes nothing and returns the current aggregate.
    pub fn on_value_changed(&mut self, index: usize, value: impl Into<String>) -> Validity {
        let Some(field) = self.fields.get_mut(index) else {
            tracing::warn!(index, len = self.fields.len(), "value change for unknown field ignored");
            return self.aggregate;
        };
        field.set_value(value.into());
        self.aggregate = self.initial_aggregate();
        self.aggregate
    }

    pub fn aggregate(&self) -> Validity {
        self.aggregate
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<FieldView<'_>> {
        self.fields.get(index).map(FieldState::view)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldView<'_>> {
        self.fields.iter().map(FieldState::view)
    }

    pub fn invalid_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| !field.validity.is_valid())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValidator;

    fn only_abc() -> FieldValidator {
        FieldValidator::equals("abc", "only accepts 'abc'")
    }

    #[test]
    fn empty_form_is_vacuously_valid() {
        let aggregator = FieldValidationAggregator::new(Vec::new());
        assert!(aggregator.is_empty());
        assert_eq!(aggregator.aggregate(), Validity::Valid);
    }

    #[test]
    fn initial_values_are_validated_up_front() {
        let aggregator = FieldValidationAggregator::new(vec![
            FieldDescriptor::new("code").with_validator(only_abc()),
            FieldDescriptor::new("note"),
        ]);
        assert_eq!(aggregator.aggregate(), Validity::Invalid);
        let code = aggregator.field(0).expect("first field");
        assert_eq!(code.validity, Validity::Invalid);
        assert_eq!(code.reason, Some("only accepts 'abc'"));
        assert_eq!(aggregator.field(1).unwrap().validity, Validity::Valid);
    }

    #[test]
    fn aggregate_follows_every_change() {
        let mut aggregator = FieldValidationAggregator::new(vec![
            FieldDescriptor::new("a").with_validator(only_abc()),
            FieldDescriptor::new("b").with_validator(FieldValidator::non_empty("required")),
        ]);
        assert_eq!(aggregator.invalid_count(), 2);
        assert_eq!(aggregator.on_value_changed(0, "abc"), Validity::Invalid);
        assert_eq!(aggregator.on_value_changed(1, "x"), Validity::Valid);
        assert_eq!(aggregator.on_value_changed(0, "abd"), Validity::Invalid);
        assert_eq!(aggregator.field(0).unwrap().value, "abd");
        assert_eq!(aggregator.on_value_changed(0, "abc"), Validity::Valid);
        assert_eq!(aggregator.invalid_count(), 0);
    }

    #[test]
    fn unvalidated_fields_accept_anything() {
        let mut aggregator = FieldValidationAggregator::new(vec![FieldDescriptor::new("free")]);
        assert_eq!(aggregator.on_value_changed(0, ""), Validity::Valid);
        assert_eq!(aggregator.on_value_changed(0, "anything"), Validity::Valid);
    }

    #[test]
    fn out_of_range_index_leaves_state_untouched() {
        let mut aggregator = FieldValidationAggregator::new(vec![
            FieldDescriptor::new("a").with_validator(only_abc()),
        ]);
        assert_eq!(aggregator.on_value_changed(3, "abc"), Validity::Invalid);
        assert_eq!(aggregator.field(0).unwrap().value, "");
    }

    #[test]
    fn field_order_matches_descriptors() {
        let aggregator = FieldValidationAggregator::new(vec![
            FieldDescriptor::new("first"),
            FieldDescriptor::password("second"),
            FieldDescriptor::new("third"),
        ]);
        let labels = aggregator.fields().map(|f| f.label).collect::<Vec<_>>();
        assert_eq!(labels, ["first", "second", "third"]);
    }
}
