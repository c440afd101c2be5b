use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Task, TaskCategory};
use crate::error::ValidationError;

/// Sentinel that places tasks without a due date after every dated task.
const DISTANT_FUTURE: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Earliest due date first
    #[default]
    DueDate,
    /// Category name, ascending
    Category,
    /// Highest points first
    Points,
}

impl FromStr for SortOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due" | "due_date" | "due-date" | "date" => Ok(SortOption::DueDate),
            "category" => Ok(SortOption::Category),
            "points" => Ok(SortOption::Points),
            other => Err(ValidationError::invalid(
                "sort",
                format!("'{other}' is not one of due_date, category, points"),
            )),
        }
    }
}

/// Ordered, optionally filtered copy of `tasks`.
///
/// Pure and recomputed on every call. Sorting is stable, so ties keep
/// insertion order.
pub fn sorted_view(
    tasks: &[Task],
    sort: SortOption,
    filter: Option<TaskCategory>,
) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.map_or(true, |category| task.category == category))
        .cloned()
        .collect();

    match sort {
        SortOption::DueDate => view.sort_by_key(|task| task.due_date.unwrap_or(DISTANT_FUTURE)),
        SortOption::Category => view.sort_by(|a, b| a.category.name().cmp(b.category.name())),
        SortOption::Points => view.sort_by(|a, b| b.points.cmp(&a.points)),
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn task(id: &str, category: TaskCategory, points: u32, due_in_hours: Option<i64>) -> Task {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let mut draft = TaskDraft::new(id, category).points(points);
        if let Some(hours) = due_in_hours {
            draft = draft.due(base + Duration::hours(hours));
        }
        Task::from_draft(draft, id.to_string(), base)
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn due_date_sorts_missing_last() {
        let tasks = vec![
            task("none", TaskCategory::Custom, 1, None),
            task("late", TaskCategory::Custom, 1, Some(48)),
            task("soon", TaskCategory::Custom, 1, Some(2)),
        ];
        let view = sorted_view(&tasks, SortOption::DueDate, None);
        assert_eq!(ids(&view), ["soon", "late", "none"]);
    }

    #[test]
    fn category_sorts_by_name() {
        let tasks = vec![
            task("w", TaskCategory::Wellness, 1, None),
            task("a", TaskCategory::Academic, 1, None),
            task("h", TaskCategory::Household, 1, None),
            task("c", TaskCategory::Custom, 1, None),
            task("f", TaskCategory::Fitness, 1, None),
        ];
        let view = sorted_view(&tasks, SortOption::Category, None);
        assert_eq!(ids(&view), ["a", "c", "f", "h", "w"]);
    }

    #[test]
    fn points_sort_descending() {
        let tasks = vec![
            task("low", TaskCategory::Custom, 5, None),
            task("high", TaskCategory::Custom, 50, None),
            task("mid", TaskCategory::Custom, 20, None),
        ];
        let view = sorted_view(&tasks, SortOption::Points, None);
        assert_eq!(ids(&view), ["high", "mid", "low"]);
    }

    #[test]
    fn filter_keeps_only_category() {
        let tasks = vec![
            task("run", TaskCategory::Fitness, 30, None),
            task("read", TaskCategory::Academic, 10, None),
            task("swim", TaskCategory::Fitness, 40, None),
        ];
        let view = sorted_view(&tasks, SortOption::Points, Some(TaskCategory::Fitness));
        assert_eq!(ids(&view), ["swim", "run"]);
    }

    #[test]
    fn view_does_not_touch_source_order() {
        let tasks = vec![
            task("low", TaskCategory::Custom, 5, None),
            task("high", TaskCategory::Custom, 50, None),
        ];
        let _ = sorted_view(&tasks, SortOption::Points, None);
        assert_eq!(ids(&tasks), ["low", "high"]);
    }

    #[test]
    fn sort_option_parses_aliases() {
        assert_eq!("due".parse::<SortOption>(), Ok(SortOption::DueDate));
        assert_eq!("Points".parse::<SortOption>(), Ok(SortOption::Points));
        assert!("title".parse::<SortOption>().is_err());
    }

    fn arb_category() -> impl Strategy<Value = TaskCategory> {
        prop::sample::select(TaskCategory::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn points_view_is_non_increasing(points in prop::collection::vec(0u32..1000, 0..40)) {
            let tasks: Vec<Task> = points
                .iter()
                .enumerate()
                .map(|(i, p)| task(&format!("t{i}"), TaskCategory::Custom, *p, None))
                .collect();
            let view = sorted_view(&tasks, SortOption::Points, None);
            prop_assert_eq!(view.len(), tasks.len());
            for pair in view.windows(2) {
                prop_assert!(pair[0].points >= pair[1].points);
            }
        }

        #[test]
        fn filtered_view_matches_category(
            entries in prop::collection::vec((arb_category(), prop::option::of(0i64..500)), 0..40),
            wanted in arb_category(),
        ) {
            let tasks: Vec<Task> = entries
                .iter()
                .enumerate()
                .map(|(i, (c, due))| task(&format!("t{i}"), *c, 1, *due))
                .collect();
            let view = sorted_view(&tasks, SortOption::DueDate, Some(wanted));

            prop_assert!(view.iter().all(|t| t.category == wanted));
            prop_assert_eq!(view.len(), tasks.iter().filter(|t| t.category == wanted).count());
            let mut seen_undated = false;
            for pair in view.windows(2) {
                let a = pair[0].due_date.unwrap_or(DISTANT_FUTURE);
                let b = pair[1].due_date.unwrap_or(DISTANT_FUTURE);
                prop_assert!(a <= b);
            }
            for t in &view {
                if t.due_date.is_none() {
                    seen_undated = true;
                } else {
                    prop_assert!(!seen_undated);
                }
            }
        }
    }
}
