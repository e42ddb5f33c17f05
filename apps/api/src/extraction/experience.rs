//! Years-of-experience inference from date ranges in free text.
//!
//! The estimate deliberately under-counts: a range is dropped when it sits
//! next to an internship mention, when either endpoint falls inside an
//! education period, or when it repeats a period already counted.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::patterns;

/// Characters inspected on each side of a date range for internship markers.
const INTERNSHIP_WINDOW_CHARS: usize = 50;
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceOptions {
    /// Count month-bearing ranges in months (floor-divided by 12) instead of
    /// whole calendar years.
    pub month_precision: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateRange {
    start_year: i32,
    end_year: i32,
    /// Length in months, only known for month-bearing matches.
    months: Option<i32>,
    start: usize,
    end: usize,
}

impl DateRange {
    fn whole_years(&self, month_precision: bool) -> u32 {
        let years = match self.months {
            Some(months) if month_precision => months.max(0) / 12,
            _ => (self.end_year - self.start_year).max(0),
        };
        years as u32
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Estimates total years of professional experience as of `today`.
///
/// Returns 0 unless the text carries an explicit work-experience section
/// marker.
pub fn experience_years(text: &str, today: NaiveDate, options: &ExperienceOptions) -> u32 {
    if !patterns::experience_marker().is_match(text) {
        return 0;
    }

    let ranges = scan_date_ranges(text, today);
    let excluded = education_years(text, &ranges);

    let mut seen = HashSet::new();
    let mut total: u32 = 0;

    for range in &ranges {
        if near_internship(text, range) {
            debug!(
                start_year = range.start_year,
                end_year = range.end_year,
                "Skipping date range next to internship marker"
            );
            continue;
        }
        if excluded.contains(&range.start_year) || excluded.contains(&range.end_year) {
            debug!(
                start_year = range.start_year,
                end_year = range.end_year,
                "Skipping date range overlapping education"
            );
            continue;
        }
        if !seen.insert((range.start_year, range.end_year)) {
            continue;
        }
        total = total.saturating_add(range.whole_years(options.month_precision));
    }

    total
}

/// Collects every date range in text order. Month-bearing matches are scanned
/// first and shadow any plain year match inside their span.
fn scan_date_ranges(text: &str, today: NaiveDate) -> Vec<DateRange> {
    let mut ranges = Vec::new();

    for caps in patterns::month_range().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let start_year = caps.get(2).and_then(|m| parse_year(m.as_str()));
        let start_month = caps.get(1).and_then(|m| patterns::month_number(m.as_str()));
        let (end_year, end_month) = if caps.get(5).is_some() {
            (Some(today.year()), Some(today.month()))
        } else {
            (
                caps.get(4).and_then(|m| parse_year(m.as_str())),
                caps.get(3).and_then(|m| patterns::month_number(m.as_str())),
            )
        };

        let (Some(start_year), Some(start_month), Some(end_year), Some(end_month)) =
            (start_year, start_month, end_year, end_month)
        else {
            continue;
        };

        let months = (end_year * 12 + end_month as i32) - (start_year * 12 + start_month as i32);
        ranges.push(DateRange {
            start_year,
            end_year,
            months: Some(months),
            start: whole.start(),
            end: whole.end(),
        });
    }

    let month_spans = ranges.clone();

    for caps in patterns::year_range().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if month_spans
            .iter()
            .any(|r| r.overlaps(whole.start(), whole.end()))
        {
            continue;
        }

        let start_year = caps.get(1).and_then(|m| parse_year(m.as_str()));
        let end_year = caps.get(2).and_then(|m| {
            if m.as_str().chars().all(|c| c.is_ascii_digit()) {
                parse_year(m.as_str())
            } else {
                Some(today.year())
            }
        });

        let (Some(start_year), Some(end_year)) = (start_year, end_year) else {
            continue;
        };

        ranges.push(DateRange {
            start_year,
            end_year,
            months: None,
            start: whole.start(),
            end: whole.end(),
        });
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>()
        .ok()
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
}

/// Every year covered by a range that sits inside an education section, or
/// whose line (or the closest non-empty line above it) mentions education.
fn education_years(text: &str, ranges: &[DateRange]) -> BTreeSet<i32> {
    let sections = education_sections(text);
    let mut years = BTreeSet::new();

    for range in ranges {
        let in_section = sections
            .iter()
            .any(|&(start, end)| range.start >= start && range.start < end);

        if in_section || mentions_education_nearby(text, range) {
            years.extend(range.start_year..=range.end_year);
        }
    }

    years
}

/// Byte spans from just after an education heading up to the next section
/// heading or work-experience marker (or the end of the text).
fn education_sections(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let line = line.trim_end_matches(['\r', '\n']);

        let opens_education = match patterns::section_heading().captures(line) {
            Some(caps) => caps.get(1).is_some(),
            None if patterns::experience_marker().is_match(line) => false,
            None => continue,
        };

        if let Some(start) = open.take() {
            spans.push((start, line_start));
        }
        if opens_education {
            open = Some(offset);
        }
    }

    if let Some(start) = open {
        spans.push((start, text.len()));
    }
    spans
}

fn mentions_education_nearby(text: &str, range: &DateRange) -> bool {
    let line_start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[range.end..]
        .find('\n')
        .map_or(text.len(), |i| range.end + i);
    let line = &text[line_start..line_end];
    let previous = text[..line_start]
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let education = patterns::education();
    education.is_match(line) || education.is_match(previous)
}

fn near_internship(text: &str, range: &DateRange) -> bool {
    let from = text[..range.start]
        .char_indices()
        .rev()
        .take(INTERNSHIP_WINDOW_CHARS)
        .last()
        .map_or(range.start, |(i, _)| i);
    let to = text[range.end..]
        .char_indices()
        .nth(INTERNSHIP_WINDOW_CHARS)
        .map_or(text.len(), |(i, _)| range.end + i);

    patterns::internship().is_match(&text[from..to])
}
