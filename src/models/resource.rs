//! Resource (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Sqlite};
use utoipa::ToSchema;
use validator::Validate;

/// Kind of lendable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Book,
    Game,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Book => "book",
            ResourceKind::Game => "game",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "book" => Ok(ResourceKind::Book),
            "game" => Ok(ResourceKind::Game),
            _ => Err(format!("Invalid resource kind: {}", s)),
        }
    }
}

// SQLx conversion for ResourceKind (stored as TEXT)
impl sqlx::Type<Sqlite> for ResourceKind {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

impl<'r> Decode<'r, Sqlite> for ResourceKind {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Sqlite>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl<'q> Encode<'q, Sqlite> for ResourceKind {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> sqlx::encode::IsNull {
        <String as Encode<Sqlite>>::encode(self.as_str().to_string(), buf)
    }
}

/// Resource availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Available,
    Borrowed,
    Disabled,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Available => "available",
            ResourceStatus::Borrowed => "borrowed",
            ResourceStatus::Disabled => "disabled",
        }
    }
}

impl Default for ResourceStatus {
    fn default() -> Self {
        ResourceStatus::Available
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(ResourceStatus::Available),
            "borrowed" => Ok(ResourceStatus::Borrowed),
            "disabled" => Ok(ResourceStatus::Disabled),
            _ => Err(format!("Invalid resource status: {}", s)),
        }
    }
}

// SQLx conversion for ResourceStatus (stored as TEXT)
impl sqlx::Type<Sqlite> for ResourceStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

impl<'r> Decode<'r, Sqlite> for ResourceStatus {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Sqlite>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl<'q> Encode<'q, Sqlite> for ResourceStatus {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> sqlx::encode::IsNull {
        <String as Encode<Sqlite>>::encode(self.as_str().to_string(), buf)
    }
}

/// Resource model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub status: ResourceStatus,
}

/// Create resource request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResource {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Initial status, defaults to "available"
    pub status: Option<ResourceStatus>,
}
