// Property tests for the overlap layout engine

mod fixtures;

use fixtures::from_minutes;
use proptest::prelude::*;
use rust_day_schedule::models::appointment::Appointment;
use rust_day_schedule::services::layout::{compute_layout_with_policy, ColumnWidthPolicy};

fn arbitrary_day() -> impl Strategy<Value = Vec<Appointment>> {
    prop::collection::vec((0u32..96, 1u32..=12), 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (start_slot, slots))| from_minutes(&format!("a{i}"), start_slot * 15, slots * 15))
            .collect()
    })
}

fn disjoint_day() -> impl Strategy<Value = Vec<Appointment>> {
    prop::collection::vec((0u32..60, 15u32..90), 1..16).prop_map(|entries| {
        let mut cursor = 0;
        let mut appointments = Vec::new();
        for (i, (gap, duration)) in entries.into_iter().enumerate() {
            let start = cursor + gap;
            if start + duration > 24 * 60 {
                break;
            }
            appointments.push(from_minutes(&format!("d{i}"), start, duration));
            cursor = start + duration;
        }
        appointments
    })
}

fn policies() -> impl Strategy<Value = ColumnWidthPolicy> {
    prop_oneof![Just(ColumnWidthPolicy::Direct), Just(ColumnWidthPolicy::Cluster)]
}

proptest! {
    /// Property: overlapping appointments never share a column
    #[test]
    fn prop_overlapping_pairs_get_distinct_columns(
        appointments in arbitrary_day(),
        policy in policies(),
    ) {
        let layout = compute_layout_with_policy(&appointments, policy);
        prop_assert_eq!(layout.len(), appointments.len());

        for (i, a) in appointments.iter().enumerate() {
            for b in &appointments[i + 1..] {
                if a.overlaps(b) {
                    prop_assert_ne!(layout[&a.id].column, layout[&b.id].column);
                    prop_assert!(layout[&a.id].overlapping_with.contains(&b.id));
                    prop_assert!(layout[&b.id].overlapping_with.contains(&a.id));
                }
            }
        }
    }

    /// Property: every column index fits inside its column count
    #[test]
    fn prop_column_within_total(appointments in arbitrary_day(), policy in policies()) {
        let layout = compute_layout_with_policy(&appointments, policy);
        for assignment in layout.values() {
            prop_assert!(assignment.total_columns >= 1);
            prop_assert!(assignment.column < assignment.total_columns);
        }
    }

    /// Property: mutually disjoint appointments all render full width
    #[test]
    fn prop_isolated_appointments_are_single(appointments in disjoint_day(), policy in policies()) {
        let layout = compute_layout_with_policy(&appointments, policy);
        for appointment in &appointments {
            let assignment = &layout[&appointment.id];
            prop_assert_eq!(assignment.column, 0);
            prop_assert_eq!(assignment.total_columns, 1);
            prop_assert!(assignment.overlapping_with.is_empty());
        }
    }

    /// Property: under the cluster policy overlapping neighbours share a width
    #[test]
    fn prop_cluster_policy_shares_width(appointments in arbitrary_day()) {
        let layout = compute_layout_with_policy(&appointments, ColumnWidthPolicy::Cluster);
        for (i, a) in appointments.iter().enumerate() {
            for b in &appointments[i + 1..] {
                if a.overlaps(b) {
                    prop_assert_eq!(layout[&a.id].total_columns, layout[&b.id].total_columns);
                }
            }
        }
    }
}
