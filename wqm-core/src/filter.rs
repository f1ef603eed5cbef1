//! Year/month filtering over loaded rows.
//!
//! [`FilterIndex`] derives the selectable years and months from the rows
//! actually loaded, so the UI never offers a choice with no rows behind it.
//! [`include`] is the predicate applied to every row on "Apply".

use crate::date::{month_name, Dated};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeSet;

/// Current year/month choice. `None` means "All".
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, Serialize)]
pub struct FilterSelection {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl FilterSelection {
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self { year, month }
    }

    /// True when any date-based filter is set.
    pub fn is_active(&self) -> bool {
        self.year.is_some() || self.month.is_some()
    }
}

/// Whether `row` belongs to the active view for `selection`.
///
/// An empty selection admits every row, including undated ones. Once a year
/// or month is chosen, rows without a parseable date are excluded.
/// Unlike the earlier JS page, Apply with "All"/"All" keeps undated rows.
pub fn include<R: Dated>(row: &R, selection: &FilterSelection) -> bool {
    if !selection.is_active() {
        return true;
    }
    let Some(date) = row.date() else {
        return false;
    };
    if selection.year.is_some_and(|y| date.year() != y) {
        return false;
    }
    if selection.month.is_some_and(|m| date.month() != m) {
        return false;
    }
    true
}

/// Rows matching `selection`, in their original order.
pub fn apply<'a, R: Dated>(rows: &'a [R], selection: &FilterSelection) -> Vec<&'a R> {
    rows.iter().filter(|r| include(*r, selection)).collect()
}

/// A selectable month option.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct MonthOption {
    pub month: u32,
    pub name: &'static str,
}

/// Distinct (year, month) pairs present in a row set.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FilterIndex {
    year_months: BTreeSet<(i32, u32)>,
}

impl FilterIndex {
    /// Build the index, skipping rows with a missing or unparseable date.
    pub fn build<R: Dated>(rows: &[R]) -> Self {
        let year_months = rows
            .iter()
            .filter_map(|r| r.date())
            .map(|d| (d.year(), d.month()))
            .collect();
        Self { year_months }
    }

    /// Years present, ascending and de-duplicated.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.year_months.iter().map(|(y, _)| *y).collect();
        years.into_iter().collect()
    }

    /// Months present among rows of `year`, or among all rows for `None`.
    pub fn months_for(&self, year: Option<i32>) -> Vec<u32> {
        let months: BTreeSet<u32> = self
            .year_months
            .iter()
            .filter(|(y, _)| year.map_or(true, |want| *y == want))
            .map(|(_, m)| *m)
            .collect();
        months.into_iter().collect()
    }

    /// [`months_for`](Self::months_for) with display names.
    pub fn month_options(&self, year: Option<i32>) -> Vec<MonthOption> {
        self.months_for(year)
            .into_iter()
            .map(|month| MonthOption {
                month,
                name: month_name(month),
            })
            .collect()
    }

    /// False when no row has a usable date; the filter UI is then hidden.
    pub fn has_choices(&self) -> bool {
        !self.year_months.is_empty()
    }

    /// Keep `selection.month` only if it is still offered for `selection.year`.
    pub fn reconcile(&self, selection: FilterSelection) -> FilterSelection {
        let month = selection
            .month
            .filter(|m| self.months_for(selection.year).contains(m));
        FilterSelection {
            year: selection.year,
            month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SampleRecord;

    fn row(date: Option<&str>) -> SampleRecord {
        SampleRecord {
            sample_date: date.map(str::to_string),
            ..Default::default()
        }
    }

    fn rows() -> Vec<SampleRecord> {
        vec![
            row(Some("2023-11-04")),
            row(Some("2024-06-01")),
            row(Some("2024-06-15T09:30:00+00:00")),
            row(Some("2024-02-10")),
            row(None),
            row(Some("garbage")),
            row(Some("2022-06-20")),
        ]
    }

    #[test]
    fn years_are_sorted_and_distinct() {
        let index = FilterIndex::build(&rows());
        assert_eq!(index.years(), vec![2022, 2023, 2024]);
        assert!(index.has_choices());
    }

    #[test]
    fn rebuilding_is_a_fixed_point() {
        let data = rows();
        let a = FilterIndex::build(&data);
        let b = FilterIndex::build(&data);
        assert_eq!(a.years(), b.years());
        assert_eq!(a, b);
    }

    #[test]
    fn months_follow_year() {
        let index = FilterIndex::build(&rows());
        assert_eq!(index.months_for(Some(2024)), vec![2, 6]);
        assert_eq!(index.months_for(Some(2023)), vec![11]);
        assert_eq!(index.months_for(Some(1999)), Vec::<u32>::new());
        assert_eq!(index.months_for(None), vec![2, 6, 11]);
    }

    #[test]
    fn union_of_year_months_equals_all_months() {
        let index = FilterIndex::build(&rows());
        let union: BTreeSet<u32> = index
            .years()
            .into_iter()
            .flat_map(|y| index.months_for(Some(y)))
            .collect();
        assert_eq!(union.into_iter().collect::<Vec<_>>(), index.months_for(None));
    }

    #[test]
    fn months_only_come_from_rows_of_that_year() {
        let data = rows();
        let index = FilterIndex::build(&data);
        for year in index.years() {
            for m in index.months_for(Some(year)) {
                assert!(data
                    .iter()
                    .filter_map(|r| r.date())
                    .any(|d| d.year() == year && d.month() == m));
            }
        }
    }

    #[test]
    fn undated_rows_hide_filters() {
        let index = FilterIndex::build(&[row(None), row(Some("n/a"))]);
        assert!(!index.has_choices());
        assert!(index.years().is_empty());
    }

    #[test]
    fn predicate_matches_year_and_month() {
        let data = rows();
        let june_2024 = FilterSelection::new(Some(2024), Some(6));
        assert_eq!(apply(&data, &june_2024).len(), 2);
        let any_june = FilterSelection::new(None, Some(6));
        assert_eq!(apply(&data, &any_june).len(), 3);
        let only_2023 = FilterSelection::new(Some(2023), None);
        assert_eq!(apply(&data, &only_2023).len(), 1);
    }

    #[test]
    fn empty_selection_keeps_undated_rows() {
        let data = rows();
        assert_eq!(apply(&data, &FilterSelection::default()).len(), data.len());
        let active = FilterSelection::new(Some(2024), None);
        assert!(!include(&row(None), &active));
        assert!(!include(&row(Some("garbage")), &active));
    }

    #[test]
    fn filtering_is_idempotent() {
        let data = rows();
        let sel = FilterSelection::new(Some(2024), None);
        let first = apply(&data, &sel).len();
        let second = apply(&data, &sel).len();
        assert_eq!(first, second);
    }

    #[test]
    fn reconcile_drops_month_not_offered() {
        let index = FilterIndex::build(&rows());
        let sel = index.reconcile(FilterSelection::new(Some(2023), Some(6)));
        assert_eq!(sel, FilterSelection::new(Some(2023), None));
        let kept = index.reconcile(FilterSelection::new(Some(2024), Some(6)));
        assert_eq!(kept.month, Some(6));
    }

    #[test]
    fn month_option_names() {
        let index = FilterIndex::build(&rows());
        let names: Vec<&str> = index.month_options(Some(2024)).iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["Feb", "Jun"]);
    }
}
