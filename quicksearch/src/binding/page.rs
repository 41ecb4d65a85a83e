//! Page binding.

use crate::binding::errors::{Binding, BindingErrorKind, ErrorSink};
use crate::binding::params::{QueryParams, strip_prefix};
use crate::pagination::PageSpec;

/// Bind `<prefix>.Number` and `<prefix>.Size` into a page spec.
///
/// Each key is matched ignoring ASCII case and must carry a single integer
/// of at least 1. A missing key takes its default. Other keys under the
/// prefix are ignored. The result is `Absent` if neither key is present.
pub fn bind_page(params: &QueryParams, prefix: &str, sink: &mut impl ErrorSink) -> Binding<PageSpec> {
    let defaults = PageSpec::default();
    let mut number = None;
    let mut size = None;
    let mut valid = true;

    for (key, values) in params.with_prefix(prefix) {
        let Some(body) = strip_prefix(key, prefix) else {
            continue;
        };
        let slot = if body.eq_ignore_ascii_case("Number") {
            &mut number
        } else if body.eq_ignore_ascii_case("Size") {
            &mut size
        } else {
            continue;
        };

        if let Some(n) = parse_positive(values) {
            *slot = Some(n);
        } else {
            valid = false;
            sink.add_error(
                key,
                BindingErrorKind::InvalidPageValue,
                BindingErrorKind::InvalidPageValue.message(""),
            );
        }
    }

    if !valid {
        return Binding::Failed;
    }
    if number.is_none() && size.is_none() {
        return Binding::Absent;
    }
    match PageSpec::new(
        number.unwrap_or_else(|| defaults.number()),
        size.unwrap_or_else(|| defaults.size()),
    ) {
        Ok(spec) => Binding::Bound(spec),
        Err(_) => Binding::Failed,
    }
}

fn parse_positive(values: &[String]) -> Option<usize> {
    let [value] = values else {
        return None;
    };
    value.parse::<usize>().ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::errors::BindingErrors;

    fn bind(raw: &str) -> (Binding<PageSpec>, BindingErrors) {
        let mut errors = BindingErrors::new();
        let result = bind_page(&QueryParams::parse(raw), "p", &mut errors);
        (result, errors)
    }

    #[test]
    fn test_binds_both_keys() {
        let (result, errors) = bind("p.number=3&P.SIZE=10");
        assert!(errors.is_empty());
        assert_eq!(result, Binding::Bound(PageSpec::new(3, 10).unwrap()));
    }

    #[test]
    fn test_missing_key_takes_default() {
        let (result, _) = bind("p.Size=5");
        assert_eq!(result, Binding::Bound(PageSpec::new(1, 5).unwrap()));

        let (result, _) = bind("p.Number=2");
        assert_eq!(result, Binding::Bound(PageSpec::new(2, 25).unwrap()));
    }

    #[test]
    fn test_absent_without_keys() {
        let (result, errors) = bind("f.Id.eq=1&p.Other=4");
        assert_eq!(result, Binding::Absent);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_invalid_values() {
        for raw in ["p.Number=0", "p.Size=-1", "p.Size=abc", "p.Number=1&p.number=2"] {
            let (result, errors) = bind(raw);
            assert_eq!(result, Binding::Failed, "{raw}");
            assert_eq!(errors.len(), 1, "{raw}");
            assert_eq!(
                errors.iter().next().unwrap().message,
                "Page value must be an integer greater than or equal to 1"
            );
        }
    }
}
