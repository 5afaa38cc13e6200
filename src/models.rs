use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::Postgres;

use crate::errors::ServiceError;

// Mode label attached to tests and to an account's last played session
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    Singleplayer,
    Multiplayer,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Singleplayer => "SINGLEPLAYER",
            TestType::Multiplayer => "MULTIPLAYER",
        }
    }
}

impl TryFrom<String> for TestType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SINGLEPLAYER" => Ok(TestType::Singleplayer),
            "MULTIPLAYER" => Ok(TestType::Multiplayer),
            other => Err(format!("unknown test type {other}")),
        }
    }
}

// Stored as plain TEXT so the label stays readable in the database
impl sqlx::Type<Postgres> for TestType {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for TestType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let label = <String as sqlx::Decode<Postgres>>::decode(value)?;
        Ok(TestType::try_from(label)?)
    }
}

impl sqlx::Encode<'_, Postgres> for TestType {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as sqlx::Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, SimpleObject, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub last_played: Option<TestType>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, SimpleObject, sqlx::FromRow)]
pub struct Test {
    pub id: String,
    pub cpm: f64,
    pub raw_cpm: f64,
    pub wpm: f64,
    pub correct: i32,
    pub incorrect: i32,
    pub corrections: i32,
    #[graphql(name = "type")]
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub test_type: TestType,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
}

// Metrics of a finished typing attempt, as submitted by the client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, InputObject)]
#[graphql(name = "NewTestInput")]
pub struct NewTest {
    pub cpm: f64,
    pub raw_cpm: f64,
    pub wpm: f64,
    pub correct: i32,
    pub incorrect: i32,
    pub corrections: i32,
}

impl NewTest {
    // Speeds must be finite and non-negative, counts non-negative
    pub fn validate(&self) -> Result<(), ServiceError> {
        for (name, value) in [("cpm", self.cpm), ("rawCpm", self.raw_cpm), ("wpm", self.wpm)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ServiceError::Validation(format!("{name} must be a non-negative number")));
            }
        }
        for (name, value) in [("correct", self.correct), ("incorrect", self.incorrect), ("corrections", self.corrections)] {
            if value < 0 {
                return Err(ServiceError::Validation(format!("{name} must not be negative")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, InputObject)]
#[graphql(name = "PaginationArgs")]
pub struct Pagination {
    #[graphql(default)]
    #[serde(default)]
    pub skip: i32,
    #[graphql(default = 10)]
    #[serde(default = "default_first")]
    pub first: i32,
}

fn default_first() -> i32 {
    10
}

// Changes applied to an account when the caller shows activity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountTouch {
    pub last_seen: DateTime<Utc>,
    pub last_played: Option<TestType>,
}
