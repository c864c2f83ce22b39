//! Help centre articles.

use crate::loading::LoadingFlag;
use rcap_core::envelope::Envelope;
use rcap_core::error::Result;
use rcap_core::help::{ArticleFilters, ArticleSearch, HelpArticle, HelpCategory};
use rcap_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct HelpState {
    articles: Vec<HelpArticle>,
    current: Option<HelpArticle>,
    categories: Vec<HelpCategory>,
    search_results: Vec<HelpArticle>,
}

pub struct HelpStore {
    client: Arc<ApiClient>,
    state: RwLock<HelpState>,
    loading: LoadingFlag,
}

impl HelpStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(HelpState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn articles(&self) -> Vec<HelpArticle> {
        self.state.read().await.articles.clone()
    }

    pub async fn current_article(&self) -> Option<HelpArticle> {
        self.state.read().await.current.clone()
    }

    pub async fn categories(&self) -> Vec<HelpCategory> {
        self.state.read().await.categories.clone()
    }

    pub async fn search_results(&self) -> Vec<HelpArticle> {
        self.state.read().await.search_results.clone()
    }

    pub async fn fetch_articles(&self, filters: &ArticleFilters) -> Result<Vec<HelpArticle>> {
        let _loading = self.loading.begin();
        let articles = self
            .client
            .get_with::<Envelope<Vec<HelpArticle>>, _>("/help/articles", filters)
            .await?
            .into_inner();

        self.state.write().await.articles = articles.clone();
        Ok(articles)
    }

    pub async fn fetch_article(&self, id: u64) -> Result<HelpArticle> {
        let _loading = self.loading.begin();
        let article = self
            .client
            .get::<Envelope<HelpArticle>>(&format!("/help/articles/{}", id))
            .await?
            .into_inner();

        self.state.write().await.current = Some(article.clone());
        Ok(article)
    }

    pub async fn search_articles(&self, query: &str, category: Option<&str>) -> Result<Vec<HelpArticle>> {
        let _loading = self.loading.begin();
        let search = ArticleSearch {
            q: query.to_string(),
            category: category.map(str::to_string),
        };
        let results = self
            .client
            .get_with::<Envelope<Vec<HelpArticle>>, _>("/help/search", &search)
            .await?
            .into_inner();

        self.state.write().await.search_results = results.clone();
        Ok(results)
    }

    /// Lists categories. Failures yield an empty list and keep the cache.
    pub async fn fetch_categories(&self) -> Vec<HelpCategory> {
        match self
            .client
            .get::<Envelope<Vec<HelpCategory>>>("/help/categories")
            .await
        {
            Ok(categories) => {
                let categories = categories.into_inner();
                self.state.write().await.categories = categories.clone();
                categories
            }
            Err(e) => {
                tracing::debug!("[HelpStore] Categories unavailable: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, user_with_role};
    use rcap_core::user::Role;
    use rcap_interaction::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_sends_query_and_category() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport.respond(
            Method::Get,
            "/help/search",
            200,
            json!([{ "id": 1, "title": "Submitting reports", "slug": "submitting-reports",
                     "category": "activities", "role_access": ["user", "admin"] }]),
        );
        let store = HelpStore::new(h.client.clone());

        let results = store
            .search_articles("submit", Some("activities"))
            .await
            .unwrap();

        assert!(results[0].is_visible_to(Role::User));
        assert!(!results[0].is_visible_to(Role::SuperAdmin));
        assert_eq!(store.search_results().await.len(), 1);
        let sent = &h.transport.requests_to(Method::Get, "/help/search")[0];
        assert_eq!(sent.query_value("q"), Some("submit"));
        assert_eq!(sent.query_value("category"), Some("activities"));
    }

    #[tokio::test]
    async fn test_categories_failure_keeps_cache() {
        let h = Harness::signed_in(user_with_role(1, Role::User)).await;
        h.transport
            .respond(
                Method::Get,
                "/help/categories",
                200,
                json!({ "data": [{ "name": "activities", "count": 4 }] }),
            )
            .respond(Method::Get, "/help/categories", 500, json!({}));
        let store = HelpStore::new(h.client.clone());

        assert_eq!(store.fetch_categories().await.len(), 1);
        assert!(store.fetch_categories().await.is_empty());
        assert_eq!(store.categories().await.len(), 1);
    }

    #[tokio::test]
    async fn test_articles_and_article() {
        let h = Harness::signed_in(user_with_role(1, Role::Admin)).await;
        let article = json!({ "id": 7, "title": "Roles", "slug": "roles", "content": "...",
                              "category": "accounts" });
        h.transport
            .respond(Method::Get, "/help/articles", 200, json!({ "data": [article.clone()] }))
            .respond(Method::Get, "/help/articles/7", 200, article);
        let store = HelpStore::new(h.client.clone());

        store
            .fetch_articles(&ArticleFilters {
                category: None,
                role: Some(Role::Admin),
            })
            .await
            .unwrap();
        store.fetch_article(7).await.unwrap();

        assert_eq!(store.articles().await.len(), 1);
        assert_eq!(store.current_article().await.unwrap().slug, "roles");
        let sent = &h.transport.requests_to(Method::Get, "/help/articles")[0];
        assert_eq!(sent.query_value("role"), Some("admin"));
    }
}
