//! Operator login and the explicit operator session.
//!
//! There is no process-wide "current user". A successful [`OperatorDirectory::authenticate`]
//! returns an [`OperatorSession`] that the caller owns and passes to whatever needs the role.
//! The role is fixed for the lifetime of the session.
//!
//! Failed logins return [`AuthError::InvalidCredentials`] and nothing else happens: no retry,
//! no lockout, no throttling. The caller shows the message and leaves the form re-enterable.

use crate::{Role, RoutePolicy, Section};
use chrono::{DateTime, Utc};
use hims_types::NonEmptyText;
use hims_uuid::EntityId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

/// Login failure. Deliberately does not say which half of the credentials was wrong.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors loading the operator directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read operator directory: {0}")]
    FileRead(std::io::Error),
    #[error("failed to parse operator directory YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("duplicate operator username: {0}")]
    DuplicateUsername(String),
    #[error("password digest for '{0}' is not 64 lowercase hex characters")]
    InvalidDigest(String),
}

/// One configured operator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OperatorAccount {
    pub username: NonEmptyText,
    pub display_name: NonEmptyText,
    pub role: Role,
    /// Hex SHA-256 of `"<username>:<password>"`, see [`password_digest`].
    pub password_sha256: String,
}

#[derive(Deserialize)]
struct DirectoryFile {
    operators: Vec<OperatorAccount>,
}

/// Static reference list of operators who may log in.
#[derive(Clone, Debug, Default)]
pub struct OperatorDirectory {
    accounts: Vec<OperatorAccount>,
}

impl OperatorDirectory {
    /// Builds a directory, rejecting duplicate usernames and malformed digests.
    pub fn new(accounts: Vec<OperatorAccount>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::new();
        for account in &accounts {
            if !seen.insert(account.username.as_str().to_owned()) {
                return Err(DirectoryError::DuplicateUsername(
                    account.username.to_string(),
                ));
            }
            let digest_ok = account.password_sha256.len() == 64
                && account
                    .password_sha256
                    .bytes()
                    .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
            if !digest_ok {
                return Err(DirectoryError::InvalidDigest(account.username.to_string()));
            }
        }
        Ok(Self { accounts })
    }

    /// Parses the YAML form:
    ///
    /// ```yaml
    /// operators:
    ///   - username: dr.li
    ///     display_name: Dr Li Wei
    ///     role: doctor
    ///     password_sha256: 5e88...
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DirectoryError> {
        let file: DirectoryFile =
            serde_yaml::from_str(yaml).map_err(DirectoryError::YamlDeserialization)?;
        Self::new(file.operators)
    }

    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let yaml = std::fs::read_to_string(path).map_err(DirectoryError::FileRead)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Checks credentials and starts an operator session.
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult<OperatorSession> {
        let username = username.trim();
        let Some(account) = self
            .accounts
            .iter()
            .find(|account| account.username.as_str() == username)
        else {
            tracing::warn!(username, "login rejected: unknown operator");
            return Err(AuthError::InvalidCredentials);
        };

        if !digests_match(&password_digest(username, password), &account.password_sha256) {
            tracing::warn!(username, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = OperatorSession {
            session_id: EntityId::new(),
            username: account.username.to_string(),
            display_name: account.display_name.to_string(),
            role: account.role,
            started_at: Utc::now(),
        };
        tracing::info!(username, role = %session.role, "operator session started");
        Ok(session)
    }
}

/// Digest stored in the directory for a username/password pair.
///
/// Unsalted SHA-256 of `username:password`. Good enough for a static workstation directory;
/// not a production credential store.
pub fn password_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two digests without stopping at the first differing byte.
fn digests_match(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |diff, (x, y)| diff | (x ^ y))
            == 0
}

/// An authenticated operator. Constructed only by [`OperatorDirectory::authenticate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperatorSession {
    session_id: EntityId,
    username: String,
    display_name: String,
    role: Role,
    started_at: DateTime<Utc>,
}

impl OperatorSession {
    pub fn session_id(&self) -> EntityId {
        self.session_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn can_access(&self, section: Section) -> bool {
        RoutePolicy::can_access(self.role, section)
    }

    #[cfg(test)]
    pub(crate) fn for_tests(username: &str, role: Role) -> Self {
        Self {
            session_id: EntityId::new(),
            username: username.to_owned(),
            display_name: username.to_owned(),
            role,
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn directory_yaml() -> String {
        format!(
            "operators:\n\
             \x20 - username: dr.li\n\
             \x20   display_name: Dr Li Wei\n\
             \x20   role: doctor\n\
             \x20   password_sha256: {}\n\
             \x20 - username: cash.wu\n\
             \x20   display_name: Wu Fang\n\
             \x20   role: cashier\n\
             \x20   password_sha256: {}\n",
            password_digest("dr.li", "s3cret"),
            password_digest("cash.wu", "till")
        )
    }

    #[test]
    fn authenticate_returns_session_with_configured_role() {
        let directory = OperatorDirectory::from_yaml_str(&directory_yaml()).unwrap();
        assert_eq!(directory.len(), 2);

        let session = directory.authenticate("dr.li", "s3cret").unwrap();
        assert_eq!(session.role(), Role::Doctor);
        assert_eq!(session.display_name(), "Dr Li Wei");
        assert!(session.can_access(Section::Consultation));

        let cashier = directory.authenticate(" cash.wu ", "till").unwrap();
        assert_eq!(cashier.role(), Role::Cashier);
        assert!(!cashier.can_access(Section::Consultation));
    }

    #[test]
    fn digests_match_only_on_identical_input() {
        let digest = password_digest("dr.li", "s3cret");
        assert!(digests_match(&digest, &password_digest("dr.li", "s3cret")));
        assert!(!digests_match(&digest, &password_digest("dr.li", "s3cret!")));
        assert!(!digests_match(&digest, &digest[..63]));
        assert!(!digests_match(&digest, ""));
    }

    #[test]
    fn bad_credentials_are_indistinguishable_and_retryable() {
        let directory = OperatorDirectory::from_yaml_str(&directory_yaml()).unwrap();

        let wrong_password = directory.authenticate("dr.li", "nope").unwrap_err();
        let unknown_user = directory.authenticate("dr.who", "s3cret").unwrap_err();
        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_user, AuthError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), "Invalid username or password");

        // No lockout: repeated failures do not prevent a correct login.
        for _ in 0..10 {
            assert!(directory.authenticate("dr.li", "nope").is_err());
        }
        assert!(directory.authenticate("dr.li", "s3cret").is_ok());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let directory = OperatorDirectory::from_yaml_str(&directory_yaml()).unwrap();
        let a = directory.authenticate("dr.li", "s3cret").unwrap();
        let b = directory.authenticate("dr.li", "s3cret").unwrap();
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn directory_rejects_duplicates_and_bad_digests() {
        let yaml = format!(
            "operators:\n  - {{username: a, display_name: A, role: nurse, password_sha256: {d}}}\n  - {{username: a, display_name: B, role: nurse, password_sha256: {d}}}\n",
            d = password_digest("a", "x")
        );
        assert!(matches!(
            OperatorDirectory::from_yaml_str(&yaml),
            Err(DirectoryError::DuplicateUsername(name)) if name == "a"
        ));

        let yaml = "operators:\n  - {username: a, display_name: A, role: nurse, password_sha256: xyz}\n";
        assert!(matches!(
            OperatorDirectory::from_yaml_str(yaml),
            Err(DirectoryError::InvalidDigest(_))
        ));

        let yaml = "operators:\n  - {username: a, display_name: A, role: physician, password_sha256: xyz}\n";
        assert!(matches!(
            OperatorDirectory::from_yaml_str(yaml),
            Err(DirectoryError::YamlDeserialization(_))
        ));
    }

    #[test]
    fn load_reads_directory_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(directory_yaml().as_bytes()).unwrap();

        let directory = OperatorDirectory::load(file.path()).unwrap();
        assert_eq!(directory.len(), 2);

        let missing = OperatorDirectory::load(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(missing, Err(DirectoryError::FileRead(_))));
    }
}
