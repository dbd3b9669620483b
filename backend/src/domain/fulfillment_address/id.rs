//! Identifier for fulfillment address records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entity_id::{ENTITY_ID_SEPARATOR, generate_entity_id};

/// Validation errors returned by [`FulfillmentAddressId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentAddressIdError {
    /// The id was empty.
    Empty,
    /// The id carried leading or trailing whitespace.
    Whitespace,
    /// The id did not start with `fuladdr_`.
    MissingPrefix,
    /// Nothing followed the `fuladdr_` prefix.
    MissingSuffix,
}

impl fmt::Display for FulfillmentAddressIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "address id must not be empty"),
            Self::Whitespace => write!(f, "address id must not contain surrounding whitespace"),
            Self::MissingPrefix => write!(
                f,
                "address id must start with `{}{}`",
                FulfillmentAddressId::PREFIX,
                ENTITY_ID_SEPARATOR
            ),
            Self::MissingSuffix => write!(f, "address id must have a suffix after its prefix"),
        }
    }
}

impl std::error::Error for FulfillmentAddressIdError {}

/// Stable identifier of a fulfillment address, always `fuladdr_<suffix>`.
///
/// ## Invariants
/// - Never empty.
/// - Always starts with `fuladdr_` followed by a non-empty suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FulfillmentAddressId(String);

impl FulfillmentAddressId {
    /// Namespace prefix shared by every address id.
    pub const PREFIX: &'static str = "fuladdr";

    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        Self(generate_entity_id(None, Self::PREFIX))
    }

    /// Validate and construct an identifier from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, FulfillmentAddressIdError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Keep `current` when it is set, otherwise generate a new identifier.
    ///
    /// This is the single id-assignment rule shared by construction and
    /// rehydration. Running it on its own output returns the same id.
    ///
    /// # Examples
    /// ```
    /// use fulfillment::domain::FulfillmentAddressId;
    ///
    /// let first = FulfillmentAddressId::ensure(None).expect("generated id is valid");
    /// let second = FulfillmentAddressId::ensure(Some(first.as_str())).expect("kept id is valid");
    /// assert_eq!(first, second);
    /// ```
    pub fn ensure(current: Option<&str>) -> Result<Self, FulfillmentAddressIdError> {
        Self::from_owned(generate_entity_id(current, Self::PREFIX))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn from_owned(id: String) -> Result<Self, FulfillmentAddressIdError> {
        if id.is_empty() {
            return Err(FulfillmentAddressIdError::Empty);
        }
        if id.trim() != id {
            return Err(FulfillmentAddressIdError::Whitespace);
        }
        let suffix = id
            .strip_prefix(Self::PREFIX)
            .and_then(|rest| rest.strip_prefix(ENTITY_ID_SEPARATOR))
            .ok_or(FulfillmentAddressIdError::MissingPrefix)?;
        if suffix.is_empty() {
            return Err(FulfillmentAddressIdError::MissingSuffix);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for FulfillmentAddressId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FulfillmentAddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FulfillmentAddressId> for String {
    fn from(value: FulfillmentAddressId) -> Self {
        value.0
    }
}

impl TryFrom<String> for FulfillmentAddressId {
    type Error = FulfillmentAddressIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
