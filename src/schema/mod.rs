//! Schema resolution: role → validation schema
//!
//! A schema is assembled from the fragments a role's profile lists. It is
//! built fresh for each role and never mutated afterwards.

pub mod catalog;
mod policy;
mod rules;
mod validate;

pub use policy::{PasswordPolicy, DEFAULT_PASSWORD_MIN_LENGTH, PASSWORD_MIN_LENGTH_FLOOR};
pub use rules::{
    CrossFieldRule, FieldCondition, FieldKind, FieldRule, FieldSpec, Fragment, Requirement,
};
pub use validate::ValidationErrorSet;

use crate::profile;
use crate::state::{FieldValues, Role};
use std::collections::BTreeSet;
use validate::check_field;

/// Field rules plus cross-field rules for one role
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSchema {
    role: Option<Role>,
    policy: PasswordPolicy,
    fields: Vec<FieldRule>,
    rules: Vec<CrossFieldRule>,
}

/// Resolve the schema for a role using the default password policy
///
/// `None` (no role chosen yet) yields the base schema.
pub fn resolve_schema(role: Option<Role>) -> ValidationSchema {
    resolve_schema_with(role, PasswordPolicy::default())
}

pub fn resolve_schema_with(role: Option<Role>, policy: PasswordPolicy) -> ValidationSchema {
    let profile = profile::lookup(role);
    let mut fields = Vec::new();
    let mut rules = Vec::new();

    for fragment in profile.fragments {
        for spec in fragment.fields {
            let required = match spec.requirement {
                Requirement::Required => true,
                Requirement::Optional => false,
                Requirement::RequiredFor(roles) => role.is_some_and(|r| roles.contains(&r)),
                Requirement::RequiredWhen(when) => {
                    rules.push(CrossFieldRule::RequiredWhen {
                        field: spec.name,
                        when,
                    });
                    true
                }
            };
            fields.push(FieldRule {
                name: spec.name,
                label: spec.label,
                kind: spec.kind,
                required,
            });
        }
        rules.extend(fragment.rules.iter().copied());
    }

    ValidationSchema {
        role,
        policy,
        fields,
        rules,
    }
}

/// Resolve from a role name, falling back to the base schema for unknown names
pub fn resolve_schema_named(name: &str, policy: PasswordPolicy) -> ValidationSchema {
    match name.parse::<Role>() {
        Ok(role) => resolve_schema_with(Some(role), policy),
        Err(err) => {
            tracing::debug!(%err, "falling back to the base registration schema");
            resolve_schema_with(None, policy)
        }
    }
}

impl ValidationSchema {
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        self.policy
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the schema declares the field at all
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// A field is inactive while any `RequiredWhen` condition on it fails
    pub fn is_active(&self, name: &str, values: &FieldValues) -> bool {
        self.rules.iter().all(|rule| match *rule {
            CrossFieldRule::RequiredWhen { field, when } if field == name => when.holds(values),
            _ => true,
        })
    }

    /// Declared required and currently active
    pub fn is_required(&self, name: &str, values: &FieldValues) -> bool {
        self.field(name).is_some_and(|f| f.required) && self.is_active(name, values)
    }

    /// Values a fresh wizard starts with for this schema
    pub fn default_values(&self) -> FieldValues {
        self.fields
            .iter()
            .filter_map(|f| f.kind.default_value().map(|v| (f.name, v)))
            .collect()
    }

    /// Validate every active field
    pub fn validate(&self, values: &FieldValues) -> ValidationErrorSet {
        self.validate_where(values, |_| true)
    }

    /// Validate only the named fields; names the schema does not declare are ignored
    pub fn validate_fields(
        &self,
        values: &FieldValues,
        scope: &BTreeSet<String>,
    ) -> ValidationErrorSet {
        self.validate_where(values, |name| scope.contains(name))
    }

    fn validate_where<F>(&self, values: &FieldValues, in_scope: F) -> ValidationErrorSet
    where
        F: Fn(&str) -> bool,
    {
        let mut errors = ValidationErrorSet::new();

        for rule in &self.fields {
            if !in_scope(rule.name) || !self.is_active(rule.name, values) {
                continue;
            }
            if let Some(message) = check_field(rule, values.get(rule.name), &self.policy) {
                errors.insert(rule.name, message);
            }
        }

        for rule in &self.rules {
            if let CrossFieldRule::MustMatch {
                field,
                other,
                message,
            } = *rule
            {
                if in_scope(field)
                    && !errors.contains(field)
                    && values.is_filled(field)
                    && values.get(field) != values.get(other)
                {
                    errors.insert(field, message);
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;
    use pretty_assertions::assert_eq;

    fn names(schema: &ValidationSchema) -> Vec<&'static str> {
        schema.field_names().collect()
    }

    mod resolution {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_no_role_yields_base_schema() {
            let schema = resolve_schema(None);
            assert_eq!(
                names(&schema),
                vec!["firstName", "lastName", "email", "password", "confirmPassword"]
            );
        }

        #[test]
        fn test_unknown_role_name_falls_back_to_base() {
            let schema = resolve_schema_named("nurse", PasswordPolicy::default());
            assert_eq!(schema, resolve_schema(None));
        }

        #[test]
        fn test_known_role_name_resolves() {
            let schema = resolve_schema_named("doctor", PasswordPolicy::default());
            assert_eq!(schema.role(), Some(Role::Doctor));
        }

        #[test]
        fn test_every_role_extends_base() {
            let base = resolve_schema(None);
            for role in Role::ALL {
                let schema = resolve_schema(Some(role));
                for name in base.field_names() {
                    assert!(schema.declares(name), "{role} lacks {name}");
                }
            }
        }

        #[test]
        fn test_role_conditioned_requirements() {
            let patient = resolve_schema(Some(Role::Patient));
            let doctor = resolve_schema(Some(Role::Doctor));
            assert!(patient.field("dateOfBirth").unwrap().required);
            assert!(!doctor.field("dateOfBirth").unwrap().required);
            assert!(patient.field("address").unwrap().required);
            assert!(!doctor.field("address").unwrap().required);
        }

        #[test]
        fn test_patient_lacks_doctor_fields() {
            let schema = resolve_schema(Some(Role::Patient));
            assert!(!schema.declares("licenseNumber"));
            assert!(!schema.declares("practiceType"));
            assert!(!schema.declares("totalBeds"));
        }

        #[test]
        fn test_doctor_branch_rules_are_cross_field_rules() {
            let schema = resolve_schema(Some(Role::Doctor));
            let conditioned: Vec<&str> = schema
                .rules()
                .iter()
                .filter_map(|r| match r {
                    CrossFieldRule::RequiredWhen { field, .. } => Some(*field),
                    _ => None,
                })
                .collect();
            assert!(conditioned.contains(&"clinic.city"));
            assert!(conditioned.contains(&"hospitalId"));
            assert!(!conditioned.contains(&"licenseNumber"));
        }

        #[test]
        fn test_policy_is_carried() {
            let schema = resolve_schema_with(None, PasswordPolicy::new(10));
            assert_eq!(schema.password_policy().min_length(), 10);
        }

        #[test]
        fn test_default_values_cover_lists_and_flags() {
            let defaults = resolve_schema(Some(Role::OrganizationAdmin)).default_values();
            assert_eq!(defaults.get("specialties"), Some(&FieldValue::List(vec![])));
            assert_eq!(defaults.get("acceptsInsurance"), Some(&FieldValue::Flag(false)));
            assert_eq!(defaults.get("totalBeds"), None);
        }
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_short_matching_passwords_flag_only_password() {
            let schema = resolve_schema(None);
            let values: FieldValues = [("password", "short"), ("confirmPassword", "short")]
                .into_iter()
                .collect();
            let scope: BTreeSet<String> = ["password", "confirmPassword"]
                .iter()
                .map(|s| s.to_string())
                .collect();
            let errors = schema.validate_fields(&values, &scope);
            assert_eq!(
                errors.get("password"),
                Some("Password must be at least 8 characters")
            );
            assert!(!errors.contains("confirmPassword"));
        }

        #[test]
        fn test_mismatched_confirmation() {
            let schema = resolve_schema(None);
            let values: FieldValues = [("password", "Passw0rd!"), ("confirmPassword", "Passw0rd?")]
                .into_iter()
                .collect();
            let errors = schema.validate(&values);
            assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
            assert!(!errors.contains("password"));
        }

        #[test]
        fn test_scope_limits_errors() {
            let schema = resolve_schema(None);
            let scope: BTreeSet<String> = ["email".to_string()].into_iter().collect();
            let errors = schema.validate_fields(&FieldValues::new(), &scope);
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email"]);
        }

        #[test]
        fn test_inactive_branch_fields_are_skipped() {
            let schema = resolve_schema(Some(Role::Doctor));
            let mut values = FieldValues::new();
            values.set("practiceType", "hospital");
            values.set("clinic.zipCode", "!!");
            let errors = schema.validate(&values);
            assert!(!errors.contains("clinic.zipCode"));
            assert!(!errors.contains("clinic.name"));
            assert!(errors.contains("hospitalId"));
        }

        #[test]
        fn test_unset_branch_requires_neither_group() {
            let schema = resolve_schema(Some(Role::Doctor));
            let errors = schema.validate(&FieldValues::new());
            assert!(errors.contains("practiceType"));
            assert!(!errors.contains("hospitalId"));
            assert!(!errors.contains("clinic.name"));
        }

        #[test]
        fn test_is_required_tracks_branch() {
            let schema = resolve_schema(Some(Role::Doctor));
            let mut values = FieldValues::new();
            values.set("practiceType", "own_clinic");
            assert!(schema.is_required("clinic.city", &values));
            assert!(!schema.is_required("hospitalId", &values));
            assert!(!schema.is_required("qualifications", &values));
        }
    }
}
