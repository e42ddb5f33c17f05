//! Compiled regular expressions shared by the extractors.
//!
//! Every pattern is compiled once on first use. The literals are fixed, so a
//! compile failure is a programming error caught by the tests below.

use std::sync::OnceLock;

use regex::Regex;

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EXPERIENCE_MARKER_RE: OnceLock<Regex> = OnceLock::new();
static MONTH_RANGE_RE: OnceLock<Regex> = OnceLock::new();
static YEAR_RANGE_RE: OnceLock<Regex> = OnceLock::new();
static INTERNSHIP_RE: OnceLock<Regex> = OnceLock::new();
static EDUCATION_RE: OnceLock<Regex> = OnceLock::new();
static SECTION_HEADING_RE: OnceLock<Regex> = OnceLock::new();

pub fn email() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email regex")
    })
}

/// Loose local/international phone pattern. Over-matches digit runs such as
/// `2018-2021`; callers accept that tradeoff.
pub fn phone() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"\b(?:\+?\d{1,3})?\s?(?:\(?\d{3}\)?[\s.-]?)?\d{3}[\s.-]?\d{4}\b")
            .expect("phone regex")
    })
}

pub fn experience_marker() -> &'static Regex {
    EXPERIENCE_MARKER_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:work|professional)\s+experience\b|\bemployment\s+history\b")
            .expect("experience marker regex")
    })
}

/// `Month YYYY - Month YYYY` or `Month YYYY - Present`.
///
/// Groups: 1 start month, 2 start year, 3 end month, 4 end year, 5 open end.
pub fn month_range() -> &'static Regex {
    MONTH_RANGE_RE.get_or_init(|| {
        let pattern = format!(
            r"(?i)\b{MONTH}\s+(\d{{4}})\s*(?:[-–—]|\bto\b)\s*(?:{MONTH}\s+(\d{{4}})|(present|current))\b"
        );
        Regex::new(&pattern).expect("month range regex")
    })
}

/// `YYYY-YYYY`, `YYYY - Present` and `YYYY to YYYY` (hyphen, en dash or em dash).
///
/// Groups: 1 start year, 2 end year or open end.
pub fn year_range() -> &'static Regex {
    YEAR_RANGE_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{4})(?:\s*[-–—]\s*|\s+to\s+)(\d{4}|present|current)\b")
            .expect("year range regex")
    })
}

pub fn internship() -> &'static Regex {
    INTERNSHIP_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:virtual\s+)?intern(?:ship)?s?\b").expect("internship regex")
    })
}

pub fn education() -> &'static Regex {
    EDUCATION_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:bachelor'?s?|master'?s?|ph\.?d|diploma|college|university|education|c?gpa|grade|percentage)\b",
        )
        .expect("education regex")
    })
}

/// A whole line that is a resume section title, optionally followed by a colon.
///
/// Group 1 is set when the heading opens an education section.
pub fn section_heading() -> &'static Regex {
    SECTION_HEADING_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:(education(?:al)?(?:\s+(?:background|details|qualifications?))?|academic\s+(?:background|qualifications?|history)|academics|qualifications)|(?:work|professional)\s+experience|experience|employment(?:\s+history)?|internships?|skills|technical\s+skills|projects|certifications?|achievements|awards|publications|summary|objective|profile|about\s+me|languages|interests|hobbies|references)\s*:?\s*$",
        )
        .expect("section heading regex")
    })
}

/// Maps a matched month token (any accepted spelling) to 1..=12.
pub fn month_number(token: &str) -> Option<u32> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
