use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One rule of a validation chain. Rules for the same field are evaluated in
/// order and the first failing one wins.
pub struct Check<T> {
    pub field: &'static str,
    pub message: &'static str,
    pub test: fn(&T) -> bool,
}

impl<T> Check<T> {
    pub const fn new(field: &'static str, message: &'static str, test: fn(&T) -> bool) -> Self {
        Self {
            field,
            message,
            test,
        }
    }
}

/// Field name to message, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Keeps the first message recorded for a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

pub fn run_checks<T>(value: &T, checks: &[Check<T>]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for check in checks {
        if errors.get(check.field).is_some() {
            continue;
        }

        if !(check.test)(value) {
            errors.add(check.field, check.message);
        }
    }

    errors.into_result()
}

pub fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !value.chars().any(char::is_whitespace)
}
