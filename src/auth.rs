use async_graphql::{Context, ErrorExtensions, Guard};
use super::database::Store;
use super::errors::{ServiceError, StoreError};

// Caller identity resolved once per request and passed to every operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Account(String),
}

static ANONYMOUS: Identity = Identity::Anonymous;

impl Identity {
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Identity::Account(id) => Some(id),
            Identity::Anonymous => None,
        }
    }

    // Account id of the caller, or `NotAuthenticated`
    pub fn require(&self) -> Result<&str, ServiceError> {
        self.account_id().ok_or(ServiceError::NotAuthenticated)
    }

    pub fn label(&self) -> &str {
        self.account_id().unwrap_or("anonymous")
    }
}

// Maps a bearer token to an identity; unknown or missing tokens are anonymous
pub async fn resolve_identity(store: &dyn Store, token: Option<&str>) -> Result<Identity, StoreError> {
    let Some(token) = token else {
        return Ok(Identity::Anonymous);
    };
    Ok(store
        .account_for_token(token)
        .await?
        .map(Identity::Account)
        .unwrap_or_default())
}

// Identity attached to the GraphQL request, anonymous when none was attached
pub fn identity<'a>(ctx: &'a Context<'_>) -> &'a Identity {
    ctx.data_opt::<Identity>().unwrap_or(&ANONYMOUS)
}

// Rejects anonymous callers before the resolver body runs
pub struct Authenticated;

impl Guard for Authenticated {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        identity(ctx).require().map(|_| ()).map_err(|e| e.extend())
    }
}
