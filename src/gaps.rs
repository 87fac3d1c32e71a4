use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::index::LocalIndex;
use crate::utils::format_date_token;

pub fn find_missing_days(index: &LocalIndex) -> Vec<NaiveDate> {
    let mut present = BTreeSet::new();
    for file in index.files() {
        match file.date {
            Some(date) => {
                present.insert(date);
            }
            None => warn!(file = %file.name, "文件名中没有日期，忽略"),
        }
    }
    let (Some(&first), Some(&last)) = (present.first(), present.last()) else {
        return Vec::new();
    };

    let mut missing = Vec::new();
    let mut day = first;
    while day < last {
        if !present.contains(&day) {
            missing.push(day);
        }
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    missing
}

pub fn check_missing_papers(index: &LocalIndex) -> Vec<NaiveDate> {
    if index.is_empty() {
        return Vec::new();
    }
    info!("开始检测缺失壁纸");
    let missing = find_missing_days(index);
    for day in &missing {
        info!(date = %format_date_token(*day), "此日壁纸不存在");
    }
    info!(missing = missing.len(), "检测缺失壁纸完成");
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocalFile;
    use crate::utils::date_of_file_name;

    fn index(names: &[&str]) -> LocalIndex {
        LocalIndex::from_files(
            names
                .iter()
                .map(|n| LocalFile {
                    name: n.to_string(),
                    date: date_of_file_name(n),
                })
                .collect(),
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reports_exact_gap() {
        let idx = index(&["20240105_b.jpg", "20240101_a.jpg"]);
        assert_eq!(
            check_missing_papers(&idx),
            vec![ymd(2024, 1, 2), ymd(2024, 1, 3), ymd(2024, 1, 4)]
        );
    }

    #[test]
    fn test_date_inside_identifier_does_not_count() {
        let idx = index(&["20240101_a.jpg", "20240105_OHR.X_20240103.jpg"]);
        assert_eq!(
            find_missing_days(&idx),
            vec![ymd(2024, 1, 2), ymd(2024, 1, 3), ymd(2024, 1, 4)]
        );
    }

    #[test]
    fn test_empty_and_single_day() {
        assert!(check_missing_papers(&LocalIndex::default()).is_empty());
        assert!(find_missing_days(&index(&["20240101_a.jpg"])).is_empty());
        assert!(find_missing_days(&index(&["readme.txt"])).is_empty());
    }

    #[test]
    fn test_crosses_month_and_ignores_stray_files() {
        let idx = index(&["20240130_a.jpg", "20240202_b.jpg", "Thumbs.db"]);
        assert_eq!(
            find_missing_days(&idx),
            vec![ymd(2024, 1, 31), ymd(2024, 2, 1)]
        );
    }
}
