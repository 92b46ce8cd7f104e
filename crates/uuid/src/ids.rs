//! Entity and encounter identifiers.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical identifier for an entity inside a consultation record.
///
/// Once constructed the inner UUID is guaranteed to display in canonical form.
///
/// # Construction
/// - [`EntityId::new`] generates a fresh identifier (editors call this when creating an entity).
/// - [`EntityId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Uuid);

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "identifier must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Purely syntactic check for the canonical form.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for EntityId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntityId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A time-prefixed encounter identifier.
///
/// Format: `YYYYMMDDTHHMMSS.mmmZ-<canonical uuid>`
///
/// Example: `20260111T143522.045Z-550e8400e29b41d4a716446655440000`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncounterId {
    started_at: DateTime<Utc>,
    uuid: EntityId,
}

impl EncounterId {
    /// Generates a new encounter identifier stamped with the current time.
    ///
    /// When `previous` is given the new timestamp is strictly greater than it (by at least
    /// 1 ms), so ids issued by one workstation keep their order even if the clock stalls.
    pub fn generate(previous: Option<&EncounterId>) -> Self {
        let now = Utc::now();

        let started_at = match previous {
            Some(prev) if now <= prev.started_at => prev.started_at + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            started_at,
            uuid: EntityId::new(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uuid(&self) -> &EntityId {
        &self.uuid
    }
}

impl FromStr for EncounterId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, uuid_str) = s.split_once('-').ok_or_else(|| {
            UuidError::InvalidInput(format!("invalid encounter id format: '{}'", s))
        })?;

        let ts_no_z = ts_str.strip_suffix('Z').ok_or_else(|| {
            UuidError::InvalidInput(format!("timestamp must end with 'Z': '{}'", ts_str))
        })?;

        let naive =
            chrono::NaiveDateTime::parse_from_str(ts_no_z, "%Y%m%dT%H%M%S%.3f").map_err(|e| {
                UuidError::InvalidInput(format!("invalid timestamp '{}': {}", ts_str, e))
            })?;

        Ok(Self {
            started_at: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            uuid: EntityId::parse(uuid_str)?,
        })
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.started_at.format("%Y%m%dT%H%M%S%.3fZ"),
            self.uuid
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EncounterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EncounterId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_canonical_id() {
        let id = EntityId::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 32);
        assert!(EntityId::is_canonical(&canonical));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_round_trips_canonical_input() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let id = EntityId::parse(canonical).unwrap();
        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a7164466554400000",
            "550e8400e29b41d4a716446655440zzz",
            "",
        ] {
            let err = EntityId::parse(input).expect_err("should reject");
            assert!(matches!(err, UuidError::InvalidInput(msg) if msg.contains("32 lowercase hex")));
        }
    }

    #[test]
    fn entity_id_serde_uses_canonical_string() {
        let id = EntityId::parse("00000000000000000000000000000001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000000000000000000000000001\"");

        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<EntityId>("\"not-an-id\"").is_err());
    }

    #[test]
    fn encounter_id_display_and_parse() {
        let input = "20260111T143522.045Z-550e8400e29b41d4a716446655440000";
        let id: EncounterId = input.parse().unwrap();

        assert_eq!(id.to_string(), input);
        assert_eq!(
            id.uuid().to_string(),
            "550e8400e29b41d4a716446655440000"
        );
        assert_eq!(
            id.started_at().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2026-01-11 14:35:22.045"
        );
    }

    #[test]
    fn encounter_id_rejects_missing_z_suffix() {
        let err = "20260111T143522.045-550e8400e29b41d4a716446655440000"
            .parse::<EncounterId>()
            .unwrap_err();
        assert!(matches!(err, UuidError::InvalidInput(msg) if msg.contains("must end with 'Z'")));
    }

    #[test]
    fn encounter_id_generate_is_strictly_monotonic() {
        let future = EncounterId {
            started_at: Utc::now() + Duration::seconds(5),
            uuid: EntityId::new(),
        };

        let next = EncounterId::generate(Some(&future));
        assert_eq!(
            next.started_at(),
            future.started_at() + Duration::milliseconds(1)
        );
        assert_ne!(next.uuid(), future.uuid());
    }
}
