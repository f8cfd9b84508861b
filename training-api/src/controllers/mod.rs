//! Validated mutation pipeline
//!
//! A controller validates a raw JSON object field by field in a fixed order
//! and builds up typed "cleaned" values. Every field is checked even after an
//! earlier one fails, so a response reports all problems at once. Validators
//! for later fields can see which earlier fields failed and skip checks that
//! depend on them.
//!
//! Partial updates (PATCH) validate only the fields that were sent.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ApiError, ApiResult, FieldErrors};

pub mod cls;
pub mod fields;
pub mod list;
pub mod student;
pub mod syllabus;

pub use cls::ClsController;
pub use list::{ListController, ListMeta, ListQuery};
pub use student::StudentController;
pub use syllabus::SyllabusController;

/// Raw request body
pub type RawInput = Map<String, Value>;

/// Result of one field validator: `Some(code)` rejects the field
pub type FieldOutcome = ApiResult<Option<&'static str>>;

/// Which mutation a controller validates for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
}

impl Mutation {
    /// Select the create or update flavour of an error code
    pub fn code(self, create: &'static str, update: &'static str) -> &'static str {
        match self {
            Mutation::Create => create,
            Mutation::Update => update,
        }
    }
}

/// Field-by-field validator for one resource
#[async_trait]
pub trait Controller: Send {
    /// Fields in the order they are validated
    const VALIDATION_ORDER: &'static [&'static str];

    /// Validate one field, storing its cleaned value on success
    ///
    /// `errors` holds the failures of the fields validated so far.
    async fn validate_field(
        &mut self,
        field: &'static str,
        value: Option<&Value>,
        errors: &FieldErrors,
    ) -> FieldOutcome;

    /// Cross-field checks that involve values the request did not send
    fn finish(&mut self, _errors: &mut FieldErrors) {}
}

/// Run a controller over `data`
///
/// Returns [`ApiError::Validation`] carrying every field error found.
pub async fn is_valid<C: Controller>(
    controller: &mut C,
    data: &RawInput,
    partial: bool,
) -> ApiResult<()> {
    let mut errors = FieldErrors::new();

    for &field in C::VALIDATION_ORDER {
        if partial && !data.contains_key(field) {
            continue;
        }

        if let Some(code) = controller.validate_field(field, data.get(field), &errors).await? {
            debug!(field, code, "Field rejected");
            errors.insert(field, code);
        }
    }

    controller.finish(&mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Records which fields it was asked about; `b` fails when `a` failed
    #[derive(Default)]
    struct Recorder {
        seen: Vec<&'static str>,
        finished: bool,
    }

    #[async_trait]
    impl Controller for Recorder {
        const VALIDATION_ORDER: &'static [&'static str] = &["a", "b", "c"];

        async fn validate_field(
            &mut self,
            field: &'static str,
            value: Option<&Value>,
            errors: &FieldErrors,
        ) -> FieldOutcome {
            self.seen.push(field);
            match field {
                "a" if value.is_none() => Ok(Some("err_a")),
                "b" if errors.contains_key("a") => Ok(Some("err_b")),
                _ => Ok(None),
            }
        }

        fn finish(&mut self, _errors: &mut FieldErrors) {
            self.finished = true;
        }
    }

    fn input(value: Value) -> RawInput {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_full_validation_visits_every_field_in_order() {
        let mut controller = Recorder::default();
        let result = is_valid(&mut controller, &input(json!({})), false).await;

        assert_eq!(controller.seen, vec!["a", "b", "c"]);
        assert!(controller.finished);

        match result {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors.get("a"), Some(&"err_a"));
                assert_eq!(errors.get("b"), Some(&"err_b"));
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_partial_validation_skips_absent_fields() {
        let mut controller = Recorder::default();
        let result = is_valid(&mut controller, &input(json!({"c": 1})), true).await;

        assert!(result.is_ok());
        assert_eq!(controller.seen, vec!["c"]);
    }

    #[test]
    fn test_mutation_code_selection() {
        assert_eq!(Mutation::Create.code("x_create_101", "x_update_101"), "x_create_101");
        assert_eq!(Mutation::Update.code("x_create_101", "x_update_101"), "x_update_101");
    }
}
