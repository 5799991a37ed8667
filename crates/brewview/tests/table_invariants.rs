//! Property-based invariant tests for observed ingredient tables.
//!
//! For any sequence of membership changes and record edits:
//!
//! 1. The row count equals the number of distinct members.
//! 2. The total equals the sum of the members' amounts.
//! 3. Each record carries exactly one table connection while it is a member
//!    and none otherwise.

use std::sync::Arc;

use brewview::domain::{Element, Fermentable};
use brewview::model::FermentableTableModel;
use proptest::prelude::*;

const POOL: usize = 5;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    SetAmount(usize, u32),
    RemoveAll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..POOL).prop_map(Op::Add),
        3 => (0..POOL).prop_map(Op::Remove),
        4 => (0..POOL, 0u32..200).prop_map(|(i, quarters)| Op::SetAmount(i, quarters)),
        1 => Just(Op::RemoveAll),
    ]
}

// Quarter kilograms keep every partial sum exact.
fn kg(quarters: u32) -> f64 {
    f64::from(quarters) * 0.25
}

proptest! {
    #[test]
    fn membership_and_total_track_records(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let table = FermentableTableModel::new();
        let pool: Vec<Arc<Fermentable>> = (0..POOL)
            .map(|i| Arc::new(Fermentable::new(format!("Malt {i}")).with_amount_kg(kg(i as u32))))
            .collect();
        let mut members = [false; POOL];

        for op in &ops {
            match *op {
                Op::Add(i) => {
                    table.add(&pool[i]);
                    members[i] = true;
                }
                Op::Remove(i) => {
                    prop_assert_eq!(table.remove(&pool[i]), members[i]);
                    members[i] = false;
                }
                Op::SetAmount(i, quarters) => pool[i].set_amount_kg(kg(quarters)),
                Op::RemoveAll => {
                    table.remove_all();
                    members = [false; POOL];
                }
            }

            let expected_rows = members.iter().filter(|&&m| m).count();
            let expected_total: f64 = pool
                .iter()
                .zip(members)
                .filter(|(_, member)| *member)
                .map(|(malt, _)| malt.amount_kg())
                .sum();

            prop_assert_eq!(table.row_count(), expected_rows);
            prop_assert_eq!(table.total(), expected_total);
            for (malt, member) in pool.iter().zip(members) {
                prop_assert_eq!(table.contains(malt), member);
                prop_assert_eq!(malt.changed().connection_count(), usize::from(member));
            }
        }
    }
}
