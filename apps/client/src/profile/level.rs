//! Experience-level detection: classifies a profile as junior, mid or senior
//! from job titles and the years spanned by its experience entries.
//!
//! Title precedence is asymmetric: a senior title overwrites whatever was seen
//! before it, while junior and mid titles only apply when nothing is set yet.
//! A senior title anywhere in the history therefore wins.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileData;

// Word boundaries and digits are ASCII-only: "2015г" still yields 2015.
static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(19|20)[0-9]{2}(?-u:\b)").expect("valid year regex")
});

const SENIOR_KEYWORDS: &[&str] = &[
    "senior",
    "lead",
    "principal",
    "architect",
    "manager",
    "director",
    "head",
    "chief",
];
const MID_KEYWORDS: &[&str] = &["mid", "intermediate", "specialist", "engineer", "developer"];
const JUNIOR_KEYWORDS: &[&str] = &["junior", "entry", "intern", "associate", "trainee", "graduate"];

const MID_YEARS: i32 = 2;
const SENIOR_YEARS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Junior,
    Mid,
    Senior,
    Unknown,
}

impl Level {
    /// Parses a level key; anything unrecognised is `Unknown`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "junior" => Level::Junior,
            "mid" => Level::Mid,
            "senior" => Level::Senior,
            _ => Level::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Mid => "mid",
            Level::Senior => "senior",
            Level::Unknown => "unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Level::Junior => "Entry level (0-2 years)",
            Level::Mid => "Mid-level (2-5 years)",
            Level::Senior => "Senior (5+ years)",
            Level::Unknown => "Unknown Level",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable description for a level key such as `"senior"`.
pub fn level_description(key: &str) -> &'static str {
    Level::from_key(key).description()
}

/// Classifies the profile against the current calendar year.
/// Returns `None` when there is no profile or no usable experience.
pub fn determine_level(profile: Option<&ProfileData>) -> Option<Level> {
    determine_level_at(profile, Utc::now().year())
}

/// Classifies the profile, treating open-ended date ranges as ending in `current_year`.
pub fn determine_level_at(profile: Option<&ProfileData>, current_year: i32) -> Option<Level> {
    let profile = profile?;
    let experience = &profile.experience;

    // Overlapping and duplicate entries are summed, not merged.
    let total_years: i32 = experience
        .iter()
        .filter_map(|entry| entry.dates.as_deref())
        .map(|dates| years_spanned(dates, current_year))
        .sum();

    let mut title_level: Option<Level> = None;
    for title in experience.iter().filter_map(|entry| entry.title.as_deref()) {
        let title = title.to_lowercase();
        if contains_any(&title, SENIOR_KEYWORDS) {
            title_level = Some(Level::Senior);
        } else if title_level.is_none() && contains_any(&title, JUNIOR_KEYWORDS) {
            title_level = Some(Level::Junior);
        } else if title_level.is_none() && contains_any(&title, MID_KEYWORDS) {
            title_level = Some(Level::Mid);
        }
    }

    if experience.is_empty() && total_years == 0 {
        return None;
    }

    let years_level = match total_years {
        y if y >= SENIOR_YEARS => Level::Senior,
        y if y >= MID_YEARS => Level::Mid,
        _ => Level::Junior,
    };

    let level = if title_level == Some(Level::Senior) {
        Level::Senior
    } else if title_level == Some(Level::Junior) && total_years < MID_YEARS {
        Level::Junior
    } else if years_level == Level::Senior || (title_level.is_none() && total_years >= SENIOR_YEARS) {
        Level::Senior
    } else if years_level == Level::Mid || (title_level.is_none() && total_years >= MID_YEARS) {
        Level::Mid
    } else {
        Level::Junior
    };

    Some(level)
}

/// Years between the first and second year mentioned in `dates`.
/// A single year is an open range ending in `current_year`; no year counts as zero.
fn years_spanned(dates: &str, current_year: i32) -> i32 {
    let dates = dates.to_lowercase();
    let mut years = YEAR_PATTERN
        .find_iter(&dates)
        .filter_map(|m| m.as_str().parse::<i32>().ok());

    match years.next() {
        Some(start) => {
            let end = years.next().unwrap_or(current_year);
            (end - start).max(0)
        }
        None => 0,
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ExperienceEntry;

    const YEAR: i32 = 2024;

    fn entry(title: Option<&str>, dates: Option<&str>) -> ExperienceEntry {
        ExperienceEntry {
            title: title.map(str::to_string),
            dates: dates.map(str::to_string),
            ..Default::default()
        }
    }

    fn profile(entries: Vec<ExperienceEntry>) -> ProfileData {
        ProfileData {
            experience: entries,
            ..Default::default()
        }
    }

    fn level_of(entries: Vec<ExperienceEntry>) -> Option<Level> {
        determine_level_at(Some(&profile(entries)), YEAR)
    }

    #[test]
    fn test_missing_profile_is_none() {
        assert_eq!(determine_level(None), None);
    }

    #[test]
    fn test_empty_profile_is_none() {
        assert_eq!(determine_level(Some(&ProfileData::default())), None);
    }

    #[test]
    fn test_senior_title_takes_precedence() {
        assert_eq!(
            level_of(vec![entry(Some("Senior Engineer"), Some("2015-2023"))]),
            Some(Level::Senior)
        );
    }

    #[test]
    fn test_junior_title_with_one_year() {
        assert_eq!(
            level_of(vec![entry(Some("Junior Dev"), Some("2022-2023"))]),
            Some(Level::Junior)
        );
    }

    #[test]
    fn test_untitled_long_history_is_senior() {
        assert_eq!(level_of(vec![entry(None, Some("2010-2023"))]), Some(Level::Senior));
    }

    #[test]
    fn test_developer_with_three_years_is_mid() {
        assert_eq!(
            level_of(vec![entry(Some("Developer"), Some("2020-2023"))]),
            Some(Level::Mid)
        );
    }

    #[test]
    fn test_senior_title_is_sticky_over_later_junior() {
        assert_eq!(
            level_of(vec![
                entry(Some("Team Lead"), Some("2023-2024")),
                entry(Some("Junior Developer"), Some("2022-2023")),
            ]),
            Some(Level::Senior)
        );
    }

    #[test]
    fn test_later_senior_title_overwrites_earlier_junior() {
        assert_eq!(
            level_of(vec![
                entry(Some("Intern"), Some("2023-2024")),
                entry(Some("Head of Data"), None),
            ]),
            Some(Level::Senior)
        );
    }

    #[test]
    fn test_first_non_senior_title_sticks() {
        // Junior is set first; the later mid title cannot replace it.
        assert_eq!(
            level_of(vec![
                entry(Some("Graduate Trainee"), Some("2023-2024")),
                entry(Some("Software Engineer"), None),
            ]),
            Some(Level::Junior)
        );
    }

    #[test]
    fn test_junior_title_with_enough_years_follows_years() {
        assert_eq!(
            level_of(vec![entry(Some("Junior Analyst"), Some("2016-2023"))]),
            Some(Level::Senior)
        );
        assert_eq!(
            level_of(vec![entry(Some("Junior Analyst"), Some("2020-2023"))]),
            Some(Level::Mid)
        );
    }

    #[test]
    fn test_single_year_runs_to_current_year() {
        assert_eq!(years_spanned("Mar 2021 - Present", YEAR), 3);
        assert_eq!(
            level_of(vec![entry(None, Some("since 2021"))]),
            Some(Level::Mid)
        );
    }

    #[test]
    fn test_years_ignore_non_matching_numbers() {
        assert_eq!(years_spanned("12/1899 - 2150", YEAR), 0);
        assert_eq!(years_spanned("no dates", YEAR), 0);
        assert_eq!(years_spanned("20155-2018", YEAR), 6);
    }

    #[test]
    fn test_years_next_to_non_ascii_letters() {
        assert_eq!(years_spanned("2015г - 2018г", YEAR), 3);
        assert_eq!(years_spanned("depuis 2019é", YEAR), 5);
        // Arabic-Indic digits are not years.
        assert_eq!(years_spanned("٢٠١٥ - ٢٠١٨", YEAR), 0);
    }

    #[test]
    fn test_reversed_range_counts_zero() {
        assert_eq!(years_spanned("2023 - 2019", YEAR), 0);
    }

    #[test]
    fn test_overlapping_entries_are_summed() {
        // Two identical three-year stints add up to six.
        assert_eq!(
            level_of(vec![
                entry(None, Some("2018-2021")),
                entry(None, Some("2018-2021")),
            ]),
            Some(Level::Senior)
        );
    }

    #[test]
    fn test_entries_without_data_default_to_junior() {
        assert_eq!(level_of(vec![entry(None, None)]), Some(Level::Junior));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        assert_eq!(
            level_of(vec![entry(Some("PRINCIPAL consultant"), None)]),
            Some(Level::Senior)
        );
        // "internal" contains "intern".
        assert_eq!(
            level_of(vec![entry(Some("Internal Auditor"), Some("2023-2024"))]),
            Some(Level::Junior)
        );
    }

    #[test]
    fn test_level_description_lookup() {
        assert_eq!(level_description("senior"), "Senior (5+ years)");
        assert_eq!(level_description("mid"), "Mid-level (2-5 years)");
        assert_eq!(level_description("junior"), "Entry level (0-2 years)");
        assert_eq!(level_description("bogus"), "Unknown Level");
    }

    #[test]
    fn test_level_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Level::Senior).unwrap(), r#""senior""#);
        assert_eq!(Level::Mid.to_string(), "mid");
    }
}
