//! Specification compiler.
//!
//! Turns clause stores into a predicate and an ordering.
//!
//! Filter shape: for each property, clauses are grouped by operator in
//! first-seen order. Values within a group are joined with OR, and groups
//! are joined with AND both within a property and across properties. So
//! `Id.eq=49&Id.eq=51&Name.like=a` compiles to
//! `((Id == 49 || Id == 51) && Name contains "a")`.
//!
//! Groups that cannot produce a comparison are dropped without error:
//! - the `None` operator
//! - an operator that does not apply to the property's kind, such as a
//!   substring test on an integer or an ordering test on a boolean

use crate::filter::{FilterClause, FilterOperator, FilterSpecification};
use crate::query::ordering::{OrderBy, OrderDirection};
use crate::query::predicate::{ComparisonOperator, Predicate};
use crate::schema::PropertyKey;
use crate::sort::{SortDirection, SortSpecification};

/// Compile a filter specification. Returns `None` if no group contributes.
#[must_use]
pub fn compile_filter<T>(spec: &FilterSpecification<T>) -> Option<Predicate<T>> {
    let predicate = spec
        .iter()
        .flat_map(|(key, clauses)| {
            group_by_operator(clauses)
                .into_iter()
                .filter_map(move |(operator, group)| compile_group(key, operator, &group))
        })
        .reduce(Predicate::and);

    if let Some(predicate) = &predicate {
        tracing::trace!("compiled filter: {}", predicate);
    }
    predicate
}

/// Compile a sort specification. Returns `None` if every entry is `None`.
#[must_use]
pub fn compile_sort<T>(spec: &SortSpecification<T>) -> Option<OrderBy<T>> {
    let mut order: Option<OrderBy<T>> = None;
    for (key, clause) in spec.iter() {
        let direction = match clause.direction() {
            SortDirection::None => continue,
            SortDirection::Asc => OrderDirection::Ascending,
            SortDirection::Desc => OrderDirection::Descending,
        };
        order = Some(order.map_or_else(
            || OrderBy::new(key.clone(), direction),
            |order| order.then_by(key.clone(), direction),
        ));
    }

    if let Some(order) = &order {
        tracing::trace!("compiled ordering: {}", order);
    }
    order
}

fn group_by_operator(clauses: &[FilterClause]) -> Vec<(FilterOperator, Vec<&FilterClause>)> {
    let mut groups: Vec<(FilterOperator, Vec<&FilterClause>)> = Vec::new();
    for clause in clauses {
        match groups.iter_mut().find(|(op, _)| *op == clause.operator()) {
            Some((_, group)) => group.push(clause),
            None => groups.push((clause.operator(), vec![clause])),
        }
    }
    groups
}

fn compile_group<T>(
    key: &PropertyKey<T>,
    operator: FilterOperator,
    group: &[&FilterClause],
) -> Option<Predicate<T>> {
    let comparison = ComparisonOperator::from_filter(operator)?;
    if !comparison.supports(key.kind()) {
        tracing::debug!(
            "skipping '{}' filter on '{}': not supported for {} properties",
            operator,
            key,
            key.kind()
        );
        return None;
    }

    group
        .iter()
        .map(|clause| Predicate::compare(key.clone(), comparison, clause.value().clone()))
        .reduce(Predicate::or)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{SearchPrefixes, SearchRequest};
    use crate::testing::{Item, ids, items};

    fn matching(spec: &FilterSpecification<Item>, source: &[Item]) -> Vec<i64> {
        let predicate = compile_filter(spec).unwrap();
        ids(source.iter().filter(|i| predicate.evaluate(i)))
    }

    #[test]
    fn test_or_within_group() {
        let spec = FilterSpecification::new()
            .add(Item::ID, FilterOperator::Eq, 49)
            .add(Item::ID, FilterOperator::Eq, 51);
        assert_eq!(matching(&spec, &items(0..100)), vec![49, 51]);
    }

    #[test]
    fn test_and_across_groups() {
        let spec = FilterSpecification::new()
            .add(Item::ID, FilterOperator::Gt, 49)
            .add(Item::ID, FilterOperator::Lt, 51);
        assert_eq!(matching(&spec, &items(0..100)), vec![50]);
    }

    #[test]
    fn test_and_across_properties() {
        let spec = FilterSpecification::new()
            .add(Item::ID, FilterOperator::Lt, 10)
            .add(Item::ACTIVE, FilterOperator::Eq, true);
        assert_eq!(matching(&spec, &items(0..100)), vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let spec = FilterSpecification::new()
            .add(Item::ID, FilterOperator::Eq, 1)
            .add(Item::ID, FilterOperator::Neq, 2)
            .add(Item::ID, FilterOperator::Eq, 3);
        assert_eq!(
            compile_filter(&spec).unwrap().to_string(),
            "((Id == 1 || Id == 3) && Id != 2)"
        );
    }

    #[test]
    fn test_unsupported_and_none_groups_are_skipped() {
        let spec = FilterSpecification::new()
            .add(Item::ID, FilterOperator::Like, 1)
            .add(Item::ACTIVE, FilterOperator::Lt, true)
            .add(Item::NAME, FilterOperator::None, "x".to_string());
        assert!(compile_filter(&spec).is_none());

        let spec = spec.add(Item::NAME, FilterOperator::Like, "item-1".to_string());
        assert_eq!(
            compile_filter(&spec).unwrap().to_string(),
            "Name contains \"item-1\""
        );
    }

    #[test]
    fn test_empty_filter_compiles_to_none() {
        assert!(compile_filter(&FilterSpecification::<Item>::new()).is_none());
    }

    #[test]
    fn test_null_equality() {
        let mut spec = FilterSpecification::<Item>::new();
        spec.try_add("Owner", FilterOperator::Eq, crate::types::Value::Null)
            .unwrap();
        assert_eq!(matching(&spec, &items(0..10)), vec![0, 4, 8]);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_negative_zero_equals_zero() {
        let source = items(0..3);
        let bind = |raw: &str| {
            SearchRequest::<Item>::from_query(raw, &SearchPrefixes::default())
                .unwrap()
                .filter
                .unwrap()
        };

        let direct = ids(source.iter().filter(|i| i.price == -0.0));
        assert_eq!(direct, vec![0]);
        assert_eq!(matching(&bind("f.Price.eq=-0"), &source), direct);
        assert_eq!(matching(&bind("f.Price.lte=-0&f.Price.gte=-0"), &source), direct);
    }

    #[test]
    fn test_nlike_negates_like() {
        let source = items(0..20);
        let like = FilterSpecification::new().add(Item::NOTE, FilterOperator::Like, Some("1".to_string()));
        let nlike = FilterSpecification::new().add(Item::NOTE, FilterOperator::Nlike, Some("1".to_string()));

        let mut all = matching(&like, &source);
        assert_eq!(all, vec![12, 15, 18]);
        all.extend(matching(&nlike, &source));
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_skips_none_and_keeps_order() {
        let spec = SortSpecification::new()
            .add(Item::ACTIVE, SortDirection::Desc)
            .add(Item::NAME, SortDirection::None)
            .add(Item::ID, SortDirection::Asc);
        assert_eq!(compile_sort(&spec).unwrap().to_string(), "Active desc, Id asc");
    }

    #[test]
    fn test_sort_all_none_compiles_to_none() {
        let spec = SortSpecification::new().add(Item::ID, SortDirection::None);
        assert!(compile_sort(&spec).is_none());
        assert!(compile_sort(&SortSpecification::<Item>::new()).is_none());
    }
}
