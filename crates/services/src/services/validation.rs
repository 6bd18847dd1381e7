//! Field-level request validation.
//!
//! A [`Validator`] runs in one of two modes. On create every `required()` field must be
//! supplied; on update absent fields are skipped and only supplied values are checked.
//! Errors are collected per field so one response can report all of them.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Messages keyed by field name, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// First message, with a count of the rest: "The name field is required. (and 2 more errors)"
    pub fn summary(&self) -> String {
        let mut messages = self.errors.values().flatten();
        let Some(first) = messages.next() else {
            return "The given data was invalid.".to_string();
        };
        match messages.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// Human form of a field name: `farmer_id` -> `farmer id`
pub fn label(field: &str) -> String {
    field.replace('_', " ")
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", label(field))
}

/// Unwrap a value that validation already proved present.
pub fn take<T>(value: Option<T>, field: &str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| ValidationErrors::single(field, required_message(field)))
}

/// Values that can be supplied but still count as missing (blank strings).
pub trait Present {
    fn is_present(&self) -> bool {
        true
    }
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Present for f64 {}
impl Present for i32 {}
impl Present for bool {}
impl Present for Uuid {}

pub struct Validator {
    mode: Mode,
    errors: ValidationErrors,
}

impl Validator {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            errors: ValidationErrors::default(),
        }
    }

    pub fn field<T>(&mut self, name: &'static str, value: Option<T>) -> Rule<'_, T> {
        Rule {
            errors: &mut self.errors,
            mode: self.mode,
            name,
            value,
            failed: false,
        }
    }

    /// Like [`Validator::field`] but trims surrounding whitespace first.
    pub fn text(&mut self, name: &'static str, value: Option<String>) -> Rule<'_, String> {
        let value = value.map(|s| s.trim().to_string());
        self.field(name, value)
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Record the outcome of a referenced-row lookup.
    pub fn exists(&mut self, field: &str, found: bool) {
        if !found {
            self.error(field, format!("The selected {} is invalid.", label(field)));
        }
    }

    /// Record the outcome of a uniqueness lookup.
    pub fn unique(&mut self, field: &str, taken: bool) {
        if taken {
            self.error(field, format!("The {} has already been taken.", label(field)));
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Rules applied to one field. After the first failure the value is dropped and
/// later rules are skipped, so each field reports one message.
pub struct Rule<'v, T> {
    errors: &'v mut ValidationErrors,
    mode: Mode,
    name: &'static str,
    value: Option<T>,
    failed: bool,
}

impl<'v, T> Rule<'v, T> {
    fn fail(&mut self, message: String) {
        if !self.failed {
            self.errors.add(self.name, message);
            self.failed = true;
        }
        self.value = None;
    }

    pub fn check(
        mut self,
        ok: impl FnOnce(&T) -> bool,
        message: impl FnOnce(&str) -> String,
    ) -> Self {
        let passed = self.value.as_ref().is_none_or(ok);
        if !passed {
            let message = message(&label(self.name));
            self.fail(message);
        }
        self
    }

    /// Convert the value, reporting the returned message on failure.
    pub fn map<U>(mut self, f: impl FnOnce(T) -> Result<U, String>) -> Rule<'v, U> {
        let value = match self.value.take().map(f) {
            Some(Ok(converted)) => Some(converted),
            Some(Err(message)) => {
                self.fail(message);
                None
            }
            None => None,
        };
        Rule {
            errors: self.errors,
            mode: self.mode,
            name: self.name,
            value,
            failed: self.failed,
        }
    }

    pub fn value(self) -> Option<T> {
        self.value
    }
}

impl<T: Present> Rule<'_, T> {
    /// Missing on create, or supplied blank in either mode, is an error.
    pub fn required(mut self) -> Self {
        let missing = match &self.value {
            None => self.mode == Mode::Create,
            Some(value) => !value.is_present(),
        };
        if missing {
            self.fail(required_message(self.name));
        }
        self
    }
}

impl<'v> Rule<'v, String> {
    pub fn max_len(self, max: usize) -> Self {
        self.check(
            |s| s.chars().count() <= max,
            |label| format!("The {label} field must not be greater than {max} characters."),
        )
    }

    pub fn min_len(self, min: usize) -> Self {
        self.check(
            |s| s.chars().count() >= min,
            |label| format!("The {label} field must be at least {min} characters."),
        )
    }

    pub fn email(self) -> Self {
        self.check(
            |s| EMAIL_RE.is_match(s),
            |label| format!("The {label} field must be a valid email address."),
        )
    }

    pub fn url(self) -> Self {
        self.check(
            |s| {
                url::Url::parse(s)
                    .map(|url| matches!(url.scheme(), "http" | "https"))
                    .unwrap_or(false)
            },
            |label| format!("The {label} field must be a valid URL."),
        )
    }

    pub fn date(self) -> Rule<'v, NaiveDate> {
        let message = format!("The {} field must be a valid date.", label(self.name));
        self.map(|s| parse_date(&s).ok_or(message))
    }

    pub fn datetime(self) -> Rule<'v, DateTime<Utc>> {
        let message = format!("The {} field must be a valid date.", label(self.name));
        self.map(|s| parse_datetime(&s).ok_or(message))
    }
}

impl Rule<'_, f64> {
    pub fn between(self, min: f64, max: f64) -> Self {
        self.check(
            |n| (min..=max).contains(n),
            |label| format!("The {label} field must be between {min} and {max}."),
        )
    }

    pub fn at_least(self, min: f64) -> Self {
        self.check(
            |n| *n >= min,
            |label| format!("The {label} field must be at least {min}."),
        )
    }
}

/// `YYYY-MM-DD`, or the date part of a full timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(input).map(|dt| dt.date_naive()))
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` (taken as UTC), or a bare date at midnight UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
