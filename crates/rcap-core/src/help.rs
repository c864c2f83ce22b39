//! Help centre articles.

use crate::user::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpArticle {
    pub id: u64,
    pub title: String,
    pub slug: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub category: String,
    /// Roles allowed to read the article; `None` means everyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_access: Option<Vec<Role>>,
}

impl HelpArticle {
    pub fn is_visible_to(&self, role: Role) -> bool {
        self.role_access
            .as_ref()
            .is_none_or(|roles| roles.is_empty() || roles.contains(&role))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpCategory {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSearch {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
