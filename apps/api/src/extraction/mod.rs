//! Field Extractor: turns raw resume text into a structured `ResumeRecord`.
//!
//! Layered heuristics: first-line checks, vocabulary membership, date-range
//! parsing and a fallback to an injected person-name detector. Nothing here
//! fails; a field that cannot be determined is `None` or an empty set.

pub mod experience;
pub mod handlers;
pub mod names;
pub mod patterns;
pub mod vocabulary;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::experience::{experience_years, ExperienceOptions};
use crate::extraction::names::PersonNameDetector;
use crate::extraction::vocabulary::Vocabulary;

/// Structured output of extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub job_role: BTreeSet<String>,
    pub domain: BTreeSet<String>,
}

impl ResumeRecord {
    /// Serializes the record as `key: value` lines so it can be scored like
    /// any other document. Absent fields and empty sets are omitted.
    pub fn to_document(&self) -> String {
        let mut lines = Vec::new();
        if let Some(name) = &self.name {
            lines.push(format!("name: {name}"));
        }
        if let Some(email) = &self.email {
            lines.push(format!("email: {email}"));
        }
        if let Some(phone) = &self.phone {
            lines.push(format!("phone: {phone}"));
        }
        push_set(&mut lines, "skills", &self.skills);
        lines.push(format!("experience_years: {}", self.experience_years));
        push_set(&mut lines, "job_role", &self.job_role);
        push_set(&mut lines, "domain", &self.domain);
        lines.join("\n")
    }
}

fn push_set(lines: &mut Vec<String>, key: &str, values: &BTreeSet<String>) {
    if !values.is_empty() {
        let joined: Vec<&str> = values.iter().map(String::as_str).collect();
        lines.push(format!("{key}: {}", joined.join(", ")));
    }
}

/// Stateless extractor configured with a vocabulary and a name detector.
pub struct FieldExtractor {
    vocabulary: Vocabulary,
    names: Arc<dyn PersonNameDetector>,
    options: ExperienceOptions,
}

impl FieldExtractor {
    pub fn new(
        vocabulary: Vocabulary,
        names: Arc<dyn PersonNameDetector>,
        options: ExperienceOptions,
    ) -> Self {
        Self {
            vocabulary,
            names,
            options,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Runs every field extractor over `text`.
    pub async fn extract(&self, text: &str) -> ResumeRecord {
        let record = ResumeRecord {
            name: self.extract_name(text).await,
            email: extract_email(text),
            phone: extract_phone(text),
            skills: self.extract_skills(text),
            experience_years: self.extract_experience_years(text),
            job_role: self.extract_job_role(text),
            domain: self.extract_domain(text),
        };

        debug!(
            has_name = record.name.is_some(),
            skills = record.skills.len(),
            roles = record.job_role.len(),
            domains = record.domain.len(),
            experience_years = record.experience_years,
            "Extracted resume record"
        );

        record
    }

    /// Accepts the first non-empty line when it reads like a name (2–4
    /// alphabetic words), otherwise defers to the name detector.
    pub async fn extract_name(&self, text: &str) -> Option<String> {
        let first_line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

        if looks_like_name(first_line) {
            return Some(first_line.to_string());
        }

        self.names.find_person_names(text).await.into_iter().next()
    }

    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        substring_matches(&self.vocabulary.skills, text)
    }

    pub fn extract_experience_years(&self, text: &str) -> u32 {
        self.experience_years_as_of(text, Utc::now().date_naive())
    }

    pub fn experience_years_as_of(&self, text: &str, today: NaiveDate) -> u32 {
        experience_years(text, today, &self.options)
    }

    /// Whole-word role titles plus "about me" phrases found anywhere.
    pub fn extract_job_role(&self, text: &str) -> BTreeSet<String> {
        let words = normalize_words(text);
        let mut roles: BTreeSet<String> = self
            .vocabulary
            .job_roles
            .iter()
            .filter(|role| {
                let phrase = normalize_words(role);
                !phrase.trim().is_empty() && words.contains(&phrase)
            })
            .cloned()
            .collect();

        roles.extend(substring_matches(&self.vocabulary.about_me_roles, text));
        roles
    }

    pub fn extract_domain(&self, text: &str) -> BTreeSet<String> {
        substring_matches(&self.vocabulary.domains, text)
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    patterns::email()
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// First phone-shaped match, reduced to its digits. A `+` directly before
/// the digits is kept.
pub fn extract_phone(text: &str) -> Option<String> {
    let found = patterns::phone().find(text)?;
    let raw = found.as_str().trim();
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    if raw.starts_with('+') || text[..found.start()].ends_with('+') {
        Some(format!("+{digits}"))
    } else {
        Some(digits)
    }
}

fn looks_like_name(line: &str) -> bool {
    let tokens = line.split_whitespace().count();
    (2..=4).contains(&tokens) && line.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
}

/// Case-insensitive substring membership of each vocabulary entry.
fn substring_matches(vocabulary: &BTreeSet<String>, text: &str) -> BTreeSet<String> {
    let text_lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|entry| {
            let entry_lower = entry.trim().to_lowercase();
            !entry_lower.is_empty() && text_lower.contains(&entry_lower)
        })
        .cloned()
        .collect()
}

/// Lowercased alphanumeric words joined by single spaces, padded on both
/// sides so phrase lookups only hit whole words.
fn normalize_words(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}
