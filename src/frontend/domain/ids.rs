//! Identifier and resource-name types for frontend resources.

use super::FrontendDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length of a user-settable resource ID.
const MAX_USER_SETTABLE_ID_LENGTH: usize = 63;

/// Characters accepted inside a resource-name segment besides alphanumerics.
const NAME_SEGMENT_PUNCTUATION: &[char] = &['-', '.', '_', '~'];

/// Final component of a resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Generates a system-assigned resource ID.
    #[must_use]
    pub fn system_generated() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validates a client-supplied resource ID.
    ///
    /// User-settable IDs are 1 to 63 characters of lowercase ASCII letters,
    /// digits and hyphens. They start with a letter, do not end with a
    /// hyphen and are never UUIDs, which are reserved for system-generated
    /// IDs.
    ///
    /// # Errors
    ///
    /// Returns [`FrontendDomainError::InvalidResourceId`] when the ID does not
    /// satisfy these rules.
    pub fn user_settable(value: impl Into<String>) -> Result<Self, FrontendDomainError> {
        let id = value.into();

        if id.is_empty() || id.len() > MAX_USER_SETTABLE_ID_LENGTH {
            return Err(FrontendDomainError::invalid_resource_id(
                &id,
                "user-settable ID must be between 1 and 63 characters",
            ));
        }

        if !id.starts_with(|character: char| character.is_ascii_lowercase()) {
            return Err(FrontendDomainError::invalid_resource_id(
                &id,
                "user-settable ID must begin with a lowercase letter",
            ));
        }

        if id.ends_with('-') {
            return Err(FrontendDomainError::invalid_resource_id(
                &id,
                "user-settable ID must end with a letter or number",
            ));
        }

        if let Some((position, character)) = id.char_indices().find(|&(_, character)| {
            !(character.is_ascii_lowercase() || character.is_ascii_digit() || character == '-')
        }) {
            return Err(FrontendDomainError::invalid_resource_id(
                &id,
                format!(
                    "user-settable ID must only contain lowercase, numbers and hyphens (got '{character}' in position {position})"
                ),
            ));
        }

        if Uuid::try_parse(&id).is_ok() {
            return Err(FrontendDomainError::invalid_resource_id(
                &id,
                "user-settable ID must not be a valid UUID",
            ));
        }

        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated resource name, the registry key of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Builds the canonical name of a resource under `prefix`.
    #[must_use]
    pub fn from_id(prefix: &str, id: &ResourceId) -> Self {
        Self(format!("{}/{id}", prefix.trim_end_matches('/')))
    }

    /// Parses a client-supplied resource name.
    ///
    /// Names are `/`-separated segments, optionally preceded by a
    /// `//service` authority. Segments must be non-empty and may contain ASCII
    /// alphanumerics and `-._~`.
    ///
    /// # Errors
    ///
    /// Returns [`FrontendDomainError::InvalidResourceName`] when the name is
    /// malformed.
    pub fn parse(value: impl Into<String>) -> Result<Self, FrontendDomainError> {
        let name = value.into();

        if name.is_empty() {
            return Err(FrontendDomainError::invalid_resource_name(
                &name,
                "resource name must not be empty",
            ));
        }

        let relative = match name.strip_prefix("//") {
            Some(full_name) => {
                let (service, rest) = full_name.split_once('/').unwrap_or((full_name, ""));
                if service.is_empty() {
                    return Err(FrontendDomainError::invalid_resource_name(
                        &name,
                        "service name must not be empty",
                    ));
                }
                validate_segment(&name, service)?;
                if rest.is_empty() {
                    return Err(FrontendDomainError::invalid_resource_name(
                        &name,
                        "full resource name must contain a path after the service name",
                    ));
                }
                rest
            }
            None => name.as_str(),
        };

        for segment in relative.split('/') {
            validate_segment(&name, segment)?;
        }

        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_segment(name: &str, segment: &str) -> Result<(), FrontendDomainError> {
    if segment.is_empty() {
        return Err(FrontendDomainError::invalid_resource_name(
            name,
            "resource name segments must not be empty",
        ));
    }

    if let Some(character) = segment.chars().find(|character| {
        !(character.is_ascii_alphanumeric() || NAME_SEGMENT_PUNCTUATION.contains(character))
    }) {
        return Err(FrontendDomainError::invalid_resource_name(
            name,
            format!("segment '{segment}' contains invalid character '{character}'"),
        ));
    }

    Ok(())
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Key of an NVMe subsystem in the subsystem registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubsystemKey(String);

impl SubsystemKey {
    /// Creates a subsystem key.
    ///
    /// # Errors
    ///
    /// Returns [`FrontendDomainError::EmptySubsystemReference`] when the key
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, FrontendDomainError> {
        let key = value.into().trim().to_owned();
        if key.is_empty() {
            return Err(FrontendDomainError::EmptySubsystemReference);
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubsystemKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Opaque pagination cursor handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// Mints a fresh unique token.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps a token received from a client.
    #[must_use]
    pub fn from_client(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its string form.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for PageToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
