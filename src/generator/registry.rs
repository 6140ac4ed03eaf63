//! Identifier registry.
//!
//! Hands out symbolic names of the form
//! `{application}-{role}[-{region}][-{index}]`. A registry lives for exactly
//! one generation run and is never shared between runs.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{Error, Result};

/// The logical identity a name is reserved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    pub role: String,
    pub region: Option<String>,
    pub index: Option<String>,
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role '{}'", self.role)?;
        if let Some(region) = &self.region {
            write!(f, " in region '{}'", region)?;
        }
        if let Some(index) = &self.index {
            write!(f, " at index '{}'", index)?;
        }
        Ok(())
    }
}

/// Assigns and tracks symbolic names for one generation run.
#[derive(Debug)]
pub struct IdentifierRegistry {
    prefix: String,
    by_key: HashMap<NameKey, String>,
    owners: HashMap<String, NameKey>,
    declared: HashSet<String>,
    order: Vec<String>,
}

impl IdentifierRegistry {
    /// Create a registry rooted at the application name.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            prefix: application_name.into(),
            by_key: HashMap::new(),
            owners: HashMap::new(),
            declared: HashSet::new(),
            order: Vec::new(),
        }
    }

    /// Reserve (or look up) the name for a logical role.
    ///
    /// The same arguments always yield the same name. Two different keys
    /// that spell the same literal name fail with [`Error::NameCollision`].
    pub fn reserve(&mut self, role: &str, region: Option<&str>, index: Option<&str>) -> Result<String> {
        let key = NameKey {
            role: role.to_string(),
            region: region.map(str::to_string),
            index: index.map(str::to_string),
        };

        if let Some(name) = self.by_key.get(&key) {
            return Ok(name.clone());
        }

        let mut name = format!("{}-{}", self.prefix, role);
        if let Some(region) = region {
            name.push('-');
            name.push_str(region);
        }
        if let Some(index) = index {
            name.push('-');
            name.push_str(index);
        }

        if let Some(existing) = self.owners.get(&name) {
            return Err(Error::NameCollision {
                name,
                existing: existing.to_string(),
                requested: key.to_string(),
            });
        }

        self.owners.insert(name.clone(), key.clone());
        self.by_key.insert(key, name.clone());
        Ok(name)
    }

    /// Record that a declaration now carries `name`. A name can be declared
    /// only once per run.
    pub fn claim(&mut self, name: &str, kind: &str) -> Result<()> {
        if !self.declared.insert(name.to_string()) {
            let existing = self
                .owners
                .get(name)
                .map(ToString::to_string)
                .unwrap_or_else(|| "an earlier declaration".to_string());
            return Err(Error::NameCollision {
                name: name.to_string(),
                existing,
                requested: format!("a second {} declaration", kind),
            });
        }
        self.order.push(name.to_string());
        Ok(())
    }

    /// Names declared so far, in declaration order.
    pub fn declared(&self) -> &[String] {
        &self.order
    }

    /// Name previously reserved for a key, if any.
    pub fn lookup(&self, role: &str, region: Option<&str>, index: Option<&str>) -> Option<&str> {
        let key = NameKey {
            role: role.to_string(),
            region: region.map(str::to_string),
            index: index.map(str::to_string),
        };
        self.by_key.get(&key).map(String::as_str)
    }

    /// Number of reserved names.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
