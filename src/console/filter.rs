//! Search, status, date-window filtering and sorting shared by every list view.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

/// Field accessors a row type exposes to the shared filter.
pub trait Filterable {
    /// Text fields matched by the search box (case-insensitive substring).
    fn search_fields(&self) -> Vec<&str>;

    /// Value compared against the status/category selector.
    fn status(&self) -> Option<&str>;

    /// Timestamp used by the date window.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    /// Value used when sorting by `key`.
    fn sort_value(&self, key: &str) -> SortValue;
}

/// A sortable cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
    Missing,
}

impl SortValue {
    /// Mismatched or missing values compare equal, leaving their order as-is.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Date window selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Yesterday,
    ThisWeek,
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "thisWeek" => Ok(Self::ThisWeek),
            other => Err(format!("Unknown date window '{other}'")),
        }
    }
}

impl DateWindow {
    /// Today and yesterday compare UTC calendar dates; this week is the
    /// trailing seven days.
    pub fn contains(self, ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(ts) = ts else {
            return self == Self::All;
        };
        match self {
            Self::All => true,
            Self::Today => ts.date_naive() == now.date_naive(),
            Self::Yesterday => ts.date_naive() == (now - Duration::days(1)).date_naive(),
            Self::ThisWeek => ts >= now - Duration::days(7),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Column header click: the current key while ascending flips to
    /// descending, anything else sorts ascending.
    pub fn toggle(current: Option<&SortConfig>, key: &str) -> SortConfig {
        let direction = match current {
            Some(c) if c.key == key && c.direction == SortDirection::Asc => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        SortConfig::new(key, direction)
    }
}

/// Selector state of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: String,
    /// `"all"` disables the status filter.
    pub status: String,
    pub date: DateWindow,
    pub sort: Option<SortConfig>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: "all".to_string(),
            date: DateWindow::All,
            sort: None,
        }
    }
}

impl ListQuery {
    pub fn sort_by(&mut self, key: &str) {
        self.sort = Some(SortConfig::toggle(self.sort.as_ref(), key));
    }

    pub fn matches<T: Filterable>(&self, row: &T, now: DateTime<Utc>) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || row
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        let matches_status = self.status == "all" || row.status() == Some(self.status.as_str());

        matches_search && matches_status && self.date.contains(row.timestamp(), now)
    }
}

/// Filter `rows` by `query`, then stable-sort them when a sort is active.
pub fn apply<T: Filterable + Clone>(rows: &[T], query: &ListQuery, now: DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows
        .iter()
        .filter(|row| query.matches(*row, now))
        .cloned()
        .collect();

    if let Some(sort) = &query.sort {
        out.sort_by(|a, b| {
            let ord = a.sort_value(&sort.key).compare(&b.sort_value(&sort.key));
            match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone)]
    struct Row {
        name: &'static str,
        tag: &'static str,
        status: &'static str,
        amount: f64,
        at: DateTime<Utc>,
    }

    impl Filterable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.tag]
        }
        fn status(&self) -> Option<&str> {
            Some(self.status)
        }
        fn timestamp(&self) -> Option<DateTime<Utc>> {
            Some(self.at)
        }
        fn sort_value(&self, key: &str) -> SortValue {
            match key {
                "name" => SortValue::Text(self.name.to_string()),
                "amount" => SortValue::Number(self.amount),
                _ => SortValue::Missing,
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "alice", tag: "AV-1", status: "win", amount: 500.0, at: now() - Duration::hours(2) },
            Row { name: "Bob", tag: "AV-2", status: "lose", amount: 1000.0, at: now() - Duration::days(1) },
            Row { name: "carol", tag: "ZX-9", status: "win", amount: 500.0, at: now() - Duration::days(6) },
            Row { name: "dave", tag: "AV-3", status: "pending", amount: 50.0, at: now() - Duration::days(9) },
        ]
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_both_fields() {
        let query = ListQuery { search: "BOB".into(), ..Default::default() };
        assert_eq!(names(&apply(&rows(), &query, now())), vec!["Bob"]);

        let query = ListQuery { search: "zx".into(), ..Default::default() };
        assert_eq!(names(&apply(&rows(), &query, now())), vec!["carol"]);
    }

    #[test]
    fn status_all_disables_filter() {
        assert_eq!(apply(&rows(), &ListQuery::default(), now()).len(), 4);
        let query = ListQuery { status: "win".into(), ..Default::default() };
        assert_eq!(names(&apply(&rows(), &query, now())), vec!["alice", "carol"]);
    }

    #[test]
    fn date_windows() {
        let pick = |date| {
            let query = ListQuery { date, ..Default::default() };
            names(&apply(&rows(), &query, now())).join(",")
        };
        assert_eq!(pick(DateWindow::Today), "alice");
        assert_eq!(pick(DateWindow::Yesterday), "Bob");
        assert_eq!(pick(DateWindow::ThisWeek), "alice,Bob,carol");
    }

    #[test]
    fn date_window_parses_console_values() {
        assert_eq!("thisWeek".parse::<DateWindow>().unwrap(), DateWindow::ThisWeek);
        assert!("lastMonth".parse::<DateWindow>().is_err());
    }

    #[test]
    fn toggle_rules() {
        let first = SortConfig::toggle(None, "amount");
        assert_eq!(first.direction, SortDirection::Asc);

        let second = SortConfig::toggle(Some(&first), "amount");
        assert_eq!(second.direction, SortDirection::Desc);

        let third = SortConfig::toggle(Some(&second), "amount");
        assert_eq!(third.direction, SortDirection::Asc);

        let other = SortConfig::toggle(Some(&first), "name");
        assert_eq!(other, SortConfig::new("name", SortDirection::Asc));
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let mut query = ListQuery::default();
        query.sort_by("amount");
        assert_eq!(names(&apply(&rows(), &query, now())), vec!["dave", "alice", "carol", "Bob"]);

        query.sort_by("amount");
        assert_eq!(names(&apply(&rows(), &query, now())), vec!["Bob", "alice", "carol", "dave"]);
    }

    #[test]
    fn unknown_sort_key_keeps_order() {
        let query = ListQuery {
            sort: Some(SortConfig::new("nope", SortDirection::Desc)),
            ..Default::default()
        };
        assert_eq!(names(&apply(&rows(), &query, now())), vec!["alice", "Bob", "carol", "dave"]);
    }
}
