//! Per-field checks and the error set they produce

use super::policy::PasswordPolicy;
use super::rules::{FieldKind, FieldRule};
use crate::state::FieldValue;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Field name → message, recomputed on every validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrorSet(BTreeMap<String, String>);

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Drop every error for the given fields
    pub fn clear_fields(&mut self, fields: &BTreeSet<String>) {
        self.0.retain(|field, _| !fields.contains(field));
    }

    /// Replace errors for `scope` with the ones from a fresh pass
    pub fn replace_scope(&mut self, scope: &BTreeSet<String>, fresh: ValidationErrorSet) {
        self.clear_fields(scope);
        self.0.extend(fresh.0);
    }

    /// Only the errors belonging to `fields`
    pub fn scoped<'a, I>(&self, fields: I) -> ValidationErrorSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self(
            fields
                .into_iter()
                .filter_map(|f| self.0.get_key_value(f))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Check one field, returning the message to show on failure
pub(crate) fn check_field(
    rule: &FieldRule,
    value: Option<&FieldValue>,
    policy: &PasswordPolicy,
) -> Option<String> {
    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ if rule.required => return Some(format!("{} is required", rule.label)),
        _ => return None,
    };

    let invalid = || Some(format!("{} has an invalid value", rule.label));

    match rule.kind {
        FieldKind::Text { min_len, max_len } => {
            let Some(text) = value.as_text() else {
                return invalid();
            };
            let len = text.chars().count();
            if let Some(min) = min_len.filter(|min| len < *min) {
                return Some(format!("{} must be at least {} characters", rule.label, min));
            }
            if let Some(max) = max_len.filter(|max| len > *max) {
                return Some(format!("{} must be at most {} characters", rule.label, max));
            }
            None
        }
        FieldKind::Password => match value {
            FieldValue::Text(raw) => policy.check(raw),
            _ => invalid(),
        },
        FieldKind::Email => value
            .as_text()
            .filter(|t| is_valid_email(t))
            .map_or_else(|| Some("Enter a valid email address".to_string()), |_| None),
        FieldKind::Phone => value
            .as_text()
            .filter(|t| is_valid_phone(t))
            .map_or_else(|| Some("Enter a valid phone number".to_string()), |_| None),
        FieldKind::Date => value
            .as_text()
            .and_then(|t| parse_date(&t))
            .map_or_else(
                || Some(format!("{} must be a date in YYYY-MM-DD form", rule.label)),
                |_| None,
            ),
        FieldKind::PostalCode => value
            .as_text()
            .filter(|t| is_valid_postal_code(t))
            .map_or_else(|| Some("Enter a valid postal code".to_string()), |_| None),
        FieldKind::Integer { min, max } => {
            let Some(n) = value.as_integer() else {
                return Some(format!("{} must be a whole number", rule.label));
            };
            if let Some(min) = min.filter(|min| n < *min) {
                return Some(format!("{} must be at least {}", rule.label, min));
            }
            if let Some(max) = max.filter(|max| n > *max) {
                return Some(format!("{} must be at most {}", rule.label, max));
            }
            None
        }
        FieldKind::Counter => match value.as_integer() {
            Some(n) if n < 0 => Some(format!("{} cannot be negative", rule.label)),
            _ => None,
        },
        FieldKind::Choice { options } => match value.as_text() {
            Some(text) if options.contains(&text.as_str()) => None,
            _ => Some(format!("Choose a valid option for {}", rule.label)),
        },
        FieldKind::Reference => value.as_text().map_or_else(invalid, |_| None),
        FieldKind::Flag => value.as_flag().map_or_else(invalid, |_| None),
        FieldKind::List => match value {
            FieldValue::List(_) | FieldValue::Text(_) => None,
            _ => invalid(),
        },
    }
}

pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Optional leading `+`, then 7 to 15 digits; spaces, dashes, dots and parentheses are ignored
pub(crate) fn is_valid_phone(value: &str) -> bool {
    let rest = value.strip_prefix('+').unwrap_or(value);
    let mut digits = 0;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }
    (7..=15).contains(&digits)
}

pub(crate) fn is_valid_postal_code(value: &str) -> bool {
    let len = value.chars().count();
    (3..=10).contains(&len)
        && value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
