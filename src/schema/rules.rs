//! Declarative rule types the field catalogue is written in

use crate::state::{FieldValue, FieldValues, Role};
use serde::Serialize;

/// Input type and format constraint of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    /// Length checked against the schema's password policy
    Password,
    Email,
    Phone,
    /// Calendar date written as `YYYY-MM-DD`
    Date,
    PostalCode,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    /// Optional non-negative count; blank or unreadable input counts as zero
    Counter,
    Choice {
        options: &'static [&'static str],
    },
    /// Identifier of an entity picked from a collaborator lookup
    Reference,
    Flag,
    List,
}

impl FieldKind {
    /// Value a field starts with after a role change
    pub fn default_value(&self) -> Option<FieldValue> {
        match self {
            Self::List => Some(FieldValue::List(Vec::new())),
            Self::Flag => Some(FieldValue::Flag(false)),
            _ => None,
        }
    }
}

/// "`field` equals `equals`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldCondition {
    pub field: &'static str,
    pub equals: &'static str,
}

impl FieldCondition {
    pub fn holds(&self, values: &FieldValues) -> bool {
        values.text(self.field).as_deref() == Some(self.equals)
    }
}

/// When a catalogue field must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Required for the listed roles, optional for the rest
    RequiredFor(&'static [Role]),
    /// Active and required only while the condition holds
    RequiredWhen(FieldCondition),
}

/// One entry of a schema fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Required,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Optional,
        }
    }

    pub const fn required_for(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        roles: &'static [Role],
    ) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::RequiredFor(roles),
        }
    }

    pub const fn required_when(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        field: &'static str,
        equals: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::RequiredWhen(FieldCondition { field, equals }),
        }
    }
}

/// Rules that relate two fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CrossFieldRule {
    /// `field` is only in play (and then required) while `when` holds
    RequiredWhen {
        field: &'static str,
        when: FieldCondition,
    },
    /// `field` must hold exactly the same value as `other`
    MustMatch {
        field: &'static str,
        other: &'static str,
        message: &'static str,
    },
}

/// A named group of fields and the cross-field rules among them
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub rules: &'static [CrossFieldRule],
}

/// A field as it appears in a resolved schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}
