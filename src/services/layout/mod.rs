//! Overlap layout engine.
//!
//! Places concurrent appointments side by side: every timed appointment gets
//! a column index and a column count so that appointments whose ranges
//! overlap never share a column.
//!
//! The pass is greedy and deterministic:
//! 1. drop all-day appointments,
//! 2. sort by start ascending, longer appointments first on ties,
//! 3. collect each appointment's direct overlap set (half-open test),
//! 4. give each appointment the smallest column unused by its already placed
//!    neighbours,
//! 5. derive `total_columns` from the configured [`ColumnWidthPolicy`].

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use crate::models::appointment::{Appointment, AppointmentId};
pub use crate::models::settings::ColumnWidthPolicy;

/// Per-appointment result of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutAssignment {
    pub column: usize,
    pub total_columns: usize,
    pub overlapping_with: BTreeSet<AppointmentId>,
}

impl LayoutAssignment {
    pub fn single() -> Self {
        Self {
            column: 0,
            total_columns: 1,
            overlapping_with: BTreeSet::new(),
        }
    }

    pub fn is_single(&self) -> bool {
        self.total_columns <= 1
    }
}

pub type DayLayout = HashMap<AppointmentId, LayoutAssignment>;

/// Layout with per-neighbour column counts.
pub fn compute_layout(appointments: &[Appointment]) -> DayLayout {
    compute_layout_with_policy(appointments, ColumnWidthPolicy::Direct)
}

pub fn compute_layout_with_policy(
    appointments: &[Appointment],
    policy: ColumnWidthPolicy,
) -> DayLayout {
    let mut timed: Vec<&Appointment> = appointments.iter().filter(|a| !a.is_all_day).collect();
    if timed.is_empty() {
        return DayLayout::new();
    }

    timed.sort_by_key(|a| (a.start, Reverse(a.duration()), a.id.clone()));

    let overlaps: Vec<Vec<usize>> = (0..timed.len())
        .map(|i| {
            (0..timed.len())
                .filter(|&j| j != i && timed[i].overlaps(timed[j]))
                .collect()
        })
        .collect();

    let mut columns: Vec<Option<usize>> = vec![None; timed.len()];
    for i in 0..timed.len() {
        let used: BTreeSet<usize> = overlaps[i].iter().filter_map(|&j| columns[j]).collect();
        let column = (0..).find(|c| !used.contains(c)).unwrap_or(0);
        columns[i] = Some(column);
    }
    let columns: Vec<usize> = columns.into_iter().map(|c| c.unwrap_or(0)).collect();

    let total_columns = match policy {
        ColumnWidthPolicy::Direct => direct_totals(&columns, &overlaps),
        ColumnWidthPolicy::Cluster => cluster_totals(&columns, &overlaps),
    };

    let mut layout = DayLayout::with_capacity(timed.len());
    for (i, appointment) in timed.iter().enumerate() {
        let overlapping_with = overlaps[i].iter().map(|&j| timed[j].id.clone()).collect();
        layout.insert(
            appointment.id.clone(),
            LayoutAssignment {
                column: columns[i],
                total_columns: total_columns[i],
                overlapping_with,
            },
        );
    }

    log::debug!(
        "Computed layout for {} appointments ({:?} widths)",
        layout.len(),
        policy
    );

    layout
}

fn direct_totals(columns: &[usize], overlaps: &[Vec<usize>]) -> Vec<usize> {
    columns
        .iter()
        .zip(overlaps)
        .map(|(&own, neighbours)| {
            let widest = neighbours.iter().map(|&j| columns[j]).fold(own, usize::max);
            widest + 1
        })
        .collect()
}

fn cluster_totals(columns: &[usize], overlaps: &[Vec<usize>]) -> Vec<usize> {
    let mut cluster_of: Vec<Option<usize>> = vec![None; columns.len()];
    let mut cluster_widths: Vec<usize> = Vec::new();

    for root in 0..columns.len() {
        if cluster_of[root].is_some() {
            continue;
        }
        let cluster = cluster_widths.len();
        let mut widest = 0;
        let mut stack = vec![root];
        cluster_of[root] = Some(cluster);
        while let Some(node) = stack.pop() {
            widest = widest.max(columns[node]);
            for &next in &overlaps[node] {
                if cluster_of[next].is_none() {
                    cluster_of[next] = Some(cluster);
                    stack.push(next);
                }
            }
        }
        cluster_widths.push(widest + 1);
    }

    cluster_of
        .into_iter()
        .map(|cluster| cluster.map_or(1, |c| cluster_widths[c]))
        .collect()
}
