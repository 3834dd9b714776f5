//! Identifier types used throughout the transfer engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{EntityKind, Error};

/// Identity assigned by the storage layer when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbId(u64);

impl DbId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DbId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidDbId(s.to_string()))
    }
}

/// Document-local reference id, `<kind-prefix><sequence>`.
///
/// Only meaningful inside the document that carries it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonId(String);

impl JsonId {
    /// Builds the id for the `sequence`-th element of `kind`.
    #[must_use]
    pub fn new(kind: EntityKind, sequence: u64) -> Self {
        Self(format!("{}{}", kind.prefix(), sequence))
    }

    /// Wraps an id read from a document without checking its prefix.
    #[must_use]
    pub fn from_document(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the kind whose prefix this id carries.
    pub fn kind(&self) -> Result<EntityKind, Error> {
        EntityKind::ALL
            .iter()
            .copied()
            .filter(|k| !k.prefix().is_empty())
            .find(|k| self.0.starts_with(k.prefix()))
            .ok_or_else(|| Error::UnknownPrefix(self.0.clone()))
    }
}

impl fmt::Display for JsonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JsonId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self(s.to_string());
        id.kind()?;
        Ok(id)
    }
}

/// Identity of a record that exists only for the duration of an export,
/// such as a publication merged in from an external catalog.
/// Uses UUID v7 which embeds a timestamp for natural ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransientId(Uuid);

impl TransientId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
