//! Sort binding.
//!
//! Keys have the shape `<prefix>.<propertyPath>` and carry exactly one value,
//! `asc` or `desc`. Parameter order is tie-break precedence.

use crate::binding::errors::{Binding, BindingErrorKind, ErrorSink};
use crate::binding::params::{QueryParams, strip_prefix};
use crate::schema::Entity;
use crate::sort::{SortDirection, SortSpecification};
use crate::types::ClauseError;

/// Bind every parameter under `prefix` into a sort specification for `T`.
///
/// Same outcome rules as `bind_filter`.
pub fn bind_sort<T: Entity>(
    params: &QueryParams,
    prefix: &str,
    sink: &mut impl ErrorSink,
) -> Binding<SortSpecification<T>> {
    let entity = T::schema().name();
    let mut spec = SortSpecification::<T>::new();
    let mut valid = true;

    for (key, values) in params.with_prefix(prefix) {
        let mut reject = |kind: BindingErrorKind| {
            valid = false;
            sink.add_error(key, kind, kind.message(entity));
        };

        let path = match strip_prefix(key, prefix) {
            Some(path) if !path.is_empty() => path,
            _ => {
                reject(BindingErrorKind::MissingProperty);
                continue;
            }
        };

        let [value] = values else {
            reject(BindingErrorKind::MultipleSortingDirections);
            continue;
        };

        let Some(direction) = SortDirection::parse(value) else {
            reject(BindingErrorKind::UnrecognizedSortValue);
            continue;
        };

        match spec.try_add(path, direction) {
            Ok(()) => {}
            Err(ClauseError::UnknownProperty { .. }) => {
                reject(BindingErrorKind::UnrecognizedProperty);
            }
            Err(ClauseError::DuplicateProperty { .. } | ClauseError::InvalidValue(_)) => {
                reject(BindingErrorKind::MultipleSortingDirections);
            }
        }
    }

    if !valid {
        Binding::Failed
    } else if spec.is_empty() {
        Binding::Absent
    } else {
        Binding::Bound(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::errors::BindingErrors;
    use crate::testing::Item;

    fn bind(params: &QueryParams) -> (Binding<SortSpecification<Item>>, BindingErrors) {
        let mut errors = BindingErrors::new();
        let result = bind_sort::<Item>(params, "s", &mut errors);
        (result, errors)
    }

    #[test]
    fn test_binds_in_parameter_order() {
        let (result, errors) = bind(&QueryParams::parse("s.price=DESC&s.owner.score=asc&f.Id.eq=1"));
        assert!(errors.is_empty());

        let spec = result.bound().unwrap();
        let entries: Vec<(&str, SortDirection)> = spec
            .iter()
            .map(|(key, clause)| (key.path(), clause.direction()))
            .collect();
        assert_eq!(
            entries,
            vec![("Price", SortDirection::Desc), ("Owner.Score", SortDirection::Asc)]
        );
    }

    #[test]
    fn test_missing_property() {
        for raw in ["s=asc", "s.=asc"] {
            let (result, errors) = bind(&QueryParams::parse(raw));
            assert!(result.is_failed());
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.iter().next().unwrap().kind,
                BindingErrorKind::MissingProperty
            );
        }
    }

    #[test]
    fn test_repeated_key_is_multiple_directions() {
        let (result, errors) = bind(&QueryParams::parse("s.Name=asc&s.name=desc"));
        assert!(result.is_failed());
        assert_eq!(
            errors.kinds_for("s.Name"),
            vec![BindingErrorKind::MultipleSortingDirections]
        );
    }

    #[test]
    fn test_unrecognized_direction() {
        let (result, errors) = bind(&QueryParams::parse("s.Id=up"));
        assert!(result.is_failed());
        assert_eq!(
            errors.kinds_for("s.Id"),
            vec![BindingErrorKind::UnrecognizedSortValue]
        );

        let (_, errors) = bind(&QueryParams::parse("s.Id=none"));
        assert_eq!(
            errors.kinds_for("s.Id"),
            vec![BindingErrorKind::UnrecognizedSortValue]
        );
    }

    #[test]
    fn test_unrecognized_property() {
        let (result, errors) = bind(&QueryParams::parse("s.Missing=asc"));
        assert!(result.is_failed());
        let error = errors.iter().next().unwrap();
        assert_eq!(error.kind, BindingErrorKind::UnrecognizedProperty);
        assert_eq!(error.message, "Property does not exist on entity 'Item'");
    }

    #[test]
    fn test_absent_without_keys() {
        let (result, errors) = bind(&QueryParams::parse("f.Id.eq=1"));
        assert!(matches!(result, Binding::Absent));
        assert!(errors.is_empty());
    }
}
