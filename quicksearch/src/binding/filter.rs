//! Filter binding.
//!
//! Keys have the shape `<prefix>.<propertyPath>.<operator>`; the operator is
//! the last dot-delimited token and everything between the prefix and the
//! operator is the property path. Each value of a repeated key becomes its
//! own clause.

use crate::binding::errors::{Binding, BindingErrorKind, ErrorSink};
use crate::binding::params::{QueryParams, strip_prefix};
use crate::constants::PATH_SEPARATOR;
use crate::filter::{FilterOperator, FilterSpecification};
use crate::schema::Entity;
use crate::types::{ClauseError, Value};

/// Bind every parameter under `prefix` into a filter specification for `T`.
///
/// All rejected parameters are reported to `sink`. The result is `Failed`
/// if anything was rejected, `Absent` if nothing was bound, and `Bound`
/// otherwise.
pub fn bind_filter<T: Entity>(
    params: &QueryParams,
    prefix: &str,
    sink: &mut impl ErrorSink,
) -> Binding<FilterSpecification<T>> {
    let entity = T::schema().name();
    let mut spec = FilterSpecification::<T>::new();
    let mut valid = true;

    for (key, values) in params.with_prefix(prefix) {
        let mut reject = |kind: BindingErrorKind| {
            valid = false;
            sink.add_error(key, kind, kind.message(entity));
        };

        let Some((path, token)) = strip_prefix(key, prefix)
            .and_then(|body| body.rsplit_once(PATH_SEPARATOR))
        else {
            reject(BindingErrorKind::MissingPropertyOrFilter);
            continue;
        };

        let Some(operator) = FilterOperator::parse(token) else {
            reject(BindingErrorKind::UnrecognizedFilter);
            if T::schema().resolve(path).is_none() {
                reject(BindingErrorKind::UnrecognizedProperty);
            }
            continue;
        };

        let values = values.iter().map(|text| Value::from_query_text(text));
        match spec.try_add_all(path, operator, values) {
            Ok(()) => {}
            Err(ClauseError::UnknownProperty { .. }) => {
                reject(BindingErrorKind::UnrecognizedProperty);
            }
            Err(ClauseError::InvalidValue(_) | ClauseError::DuplicateProperty { .. }) => {
                reject(BindingErrorKind::InvalidFilterValue);
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
