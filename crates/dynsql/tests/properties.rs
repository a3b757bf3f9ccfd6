//! Property tests for key minting and fragment composition.

use std::collections::HashSet;
use std::sync::Arc;

use dynsql::prelude::*;
use dynsql::{Fragment, PagingModel, Render, RenderContext, Sequence};
use proptest::prelude::*;

fn paging() -> impl Strategy<Value = PagingModel> {
    (proptest::option::of(0u64..1000), proptest::option::of(0u64..1000)).prop_flat_map(
        |(limit, offset)| {
            prop_oneof![
                Just(PagingModel::new(limit, offset)),
                Just(PagingModel::fetch_first(limit, offset)),
            ]
        },
    )
}

fn operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Equal),
        Just(Operator::NotEqual),
        Just(Operator::LessThan),
        Just(Operator::LessOrEqual),
        Just(Operator::GreaterThan),
        Just(Operator::GreaterOrEqual),
    ]
}

proptest! {
    #[test]
    fn sequence_is_strictly_increasing_from_one(n in 1usize..500) {
        let mut seq = Sequence::new();
        let values: Vec<u64> = (0..n).map(|_| seq.next()).collect();
        prop_assert_eq!(values[0], 1);
        prop_assert!(values.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert_eq!(seq.issued(), n as u64);
    }

    #[test]
    fn merge_of_disjoint_fragments_is_the_union(
        left in proptest::collection::btree_map("[a-z]{1,4}", any::<i64>(), 0..8),
        right in proptest::collection::btree_map("[A-Z]{1,4}", any::<i64>(), 0..8),
    ) {
        let build = |text: &str, params: &std::collections::BTreeMap<String, i64>| {
            params
                .iter()
                .fold(Fragment::with_fragment(text), |f, (k, v)| f.with_parameter(k.clone(), *v))
        };
        let merged = build("a", &left).merge(build("b", &right));
        prop_assert_eq!(merged.text(), "a b");
        prop_assert_eq!(merged.parameters().len(), left.len() + right.len());
        for (k, v) in left.iter().chain(right.iter()) {
            prop_assert_eq!(merged.parameters().get(k), Some(&ParamValue::Int(*v)));
        }
    }

    #[test]
    fn paging_clauses_sharing_a_pass_never_collide(models in proptest::collection::vec(paging(), 1..6)) {
        let mut ctx = RenderContext::new(&NamedRenderingStrategy);
        let mut keys = HashSet::new();
        let mut expected = 0;
        for model in &models {
            let fragment = model.render_fragment(&mut ctx);
            expected += usize::from(model.limit().is_some()) + usize::from(model.offset().is_some());
            for key in fragment.parameters().keys() {
                prop_assert!(keys.insert(key.clone()), "duplicate key {}", key);
            }
        }
        prop_assert_eq!(keys.len(), expected);
        prop_assert_eq!(ctx.sequence().issued(), expected as u64);
    }

    #[test]
    fn join_condition_binding_counts(op in operator(), value in any::<i64>()) {
        let a = Arc::new(SqlTable::new("a").unwrap());
        let b = Arc::new(SqlTable::new("b").unwrap().with_alias("bb").unwrap());
        let left = a.column("x").unwrap();
        let right = b.column("y").unwrap();

        let mut ctx = RenderContext::new(&PositionalRenderingStrategy);
        let column = JoinCondition::new(&left, op, &right).render_fragment(&mut ctx);
        prop_assert!(column.parameters().is_empty());
        prop_assert_eq!(column.text(), format!("x {} bb.y", op.symbol()));

        let literal = JoinCondition::literal(&left, op, value).render_fragment(&mut ctx);
        prop_assert_eq!(literal.parameters().len(), 1);
        prop_assert_eq!(literal.text(), format!("x {} ?", op.symbol()));
    }

    #[test]
    fn union_of_identical_paged_arms_has_unique_keys(limit in 1u64..100, offset in 0u64..100, arms in 1usize..5) {
        let t = Arc::new(SqlTable::new("t").unwrap());
        let id = t.column("id").unwrap();
        let arm = || select([&id]).from(&t).limit(limit).offset(offset);
        let statement = (0..arms).fold(arm(), |s, _| s.union_all(arm()));
        let rendered = statement.render(&NamedRenderingStrategy).unwrap();
        prop_assert_eq!(rendered.parameters.len(), 2 * (arms + 1));
        for i in 1..=2 * (arms + 1) {
            let placeholder = format!(":p{i}");
            prop_assert!(rendered.sql.contains(&placeholder));
        }
    }
}
