use async_graphql::extensions::{Extension, ExtensionContext, ExtensionFactory, NextResolve, ResolveInfo};
use async_graphql::{ServerResult, Value};
use log::info;
use std::sync::Arc;
use super::super::auth::Identity;
use super::super::metrics::FIELDS_REQUESTED;

// Logs and counts every top-level query or mutation field together with the caller
pub struct AccessLog;

impl ExtensionFactory for AccessLog {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(AccessLogExtension)
    }
}

struct AccessLogExtension;

#[async_trait::async_trait]
impl Extension for AccessLogExtension {
    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<Value>> {
        if info.path_node.parent.is_none() && !info.is_for_introspection {
            let caller = ctx.data_opt::<Identity>().map(Identity::label).unwrap_or("anonymous");
            info!("{}.{} requested by {}", info.parent_type, info.name, caller);
            FIELDS_REQUESTED.with_label_values(&[info.name]).inc();
        }
        next.run(ctx, info).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::WordSetCache;
    use crate::config::Config;
    use crate::database::MemoryStore;
    use crate::graphql::build_schema;
    use async_graphql::Request;
    use std::time::Duration;

    fn requested(field: &str) -> u64 {
        FIELDS_REQUESTED.with_label_values(&[field]).get()
    }

    #[tokio::test]
    async fn test_access_log_records_top_level_fields_only() {
        let store = Arc::new(MemoryStore::new().with_session("secret", "alice"));
        let cache = Arc::new(WordSetCache::new(Duration::from_secs(60), 10));
        let schema = build_schema(store, cache, &Config::default()).unwrap();

        let seen_before = requested("seen");
        let me_before = requested("me");
        let id_before = requested("id");

        let caller = Identity::Account("alice".to_string());
        let response = schema.execute(Request::new("mutation { seen }").data(caller.clone())).await;
        assert!(response.errors.is_empty());
        let response = schema.execute(Request::new("mutation { seen }").data(Identity::Anonymous)).await;
        assert!(response.errors.is_empty());
        let response = schema.execute(Request::new("{ me { id lastSeen } }").data(caller)).await;
        assert!(response.errors.is_empty());

        assert_eq!(requested("seen"), seen_before + 2);
        assert_eq!(requested("me"), me_before + 1);
        // Nested fields are not top-level
        assert_eq!(requested("id"), id_before);
    }
}
