//! String-keyed parameter map with typed access.
//!
//! One type serves both parameter views on a request: path parameters
//! (bound by dispatch after route match) and query parameters (parsed once
//! from the target). Storage is an ordered list of pairs; lookup is by
//! name, last write wins, so `?limit=10&limit=20` reads as `20`.

use std::any::type_name;
use std::str::FromStr;

use thiserror::Error;

/// Missing or unconvertible parameter.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParamError {
    #[error("missing parameter `{name}`")]
    Missing { name: String },
    #[error("parameter `{name}`=`{value}` is not a valid {expected}")]
    Invalid { name: String, value: String, expected: &'static str },
}

/// An ordered set of named parameters.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: String) {
        self.entries.push((name.to_owned(), value));
    }

    /// Raw string lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Typed lookup that fails predictably: [`ParamError::Missing`] when the
    /// parameter is absent, [`ParamError::Invalid`] when it does not parse
    /// as `T`.
    ///
    /// ```
    /// # use swell::Params;
    /// # let params = Params::new();
    /// let id = params.mandatory::<u64>("id");
    /// assert!(id.is_err());
    /// ```
    pub fn mandatory<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        let value = self.get(name).ok_or_else(|| ParamError::Missing { name: name.to_owned() })?;
        value.parse().map_err(|_| ParamError::Invalid {
            name: name.to_owned(),
            value: value.to_owned(),
            expected: type_name::<T>(),
        })
    }

    /// Typed lookup that never fails: the fallback substitutes for absence
    /// and for conversion failure alike.
    pub fn or_default<T: FromStr>(&self, name: &str, fallback: T) -> T {
        self.get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        let mut p = Params::new();
        for (k, v) in pairs {
            p.insert(k, (*v).to_owned());
        }
        p
    }

    #[test]
    fn mandatory_coerces() {
        let p = params(&[("id", "42"), ("ratio", "0.5")]);
        assert_eq!(p.mandatory::<u64>("id").unwrap(), 42);
        assert_eq!(p.mandatory::<f64>("ratio").unwrap(), 0.5);
        assert_eq!(p.mandatory::<String>("id").unwrap(), "42");
    }

    #[test]
    fn mandatory_fails_on_absence_and_bad_conversion() {
        let p = params(&[("id", "abc")]);
        assert_eq!(
            p.mandatory::<u64>("missing").unwrap_err(),
            ParamError::Missing { name: "missing".into() }
        );
        assert!(matches!(
            p.mandatory::<u64>("id").unwrap_err(),
            ParamError::Invalid { .. }
        ));
    }

    #[test]
    fn or_default_never_fails() {
        let p = params(&[("limit", "not-a-number")]);
        assert_eq!(p.or_default::<u32>("limit", 25), 25);
        assert_eq!(p.or_default::<u32>("absent", 10), 10);
        let p = params(&[("limit", "50")]);
        assert_eq!(p.or_default::<u32>("limit", 25), 50);
    }

    #[test]
    fn last_write_wins() {
        let p = params(&[("limit", "10"), ("limit", "20")]);
        assert_eq!(p.get("limit"), Some("20"));
    }
}
