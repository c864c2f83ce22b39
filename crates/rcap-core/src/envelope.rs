//! Response envelope decoding.
//!
//! The API returns some resources wrapped as `{ "data": ... }` (often with
//! pagination metadata beside it) and others bare. Endpoints that may use
//! either shape decode into [`Envelope<T>`]; anything matching neither shape
//! is a decode error.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

/// A response that is always wrapped as `{ "data": ... }`.
///
/// Used where the payload type would also accept an unrelated bare object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Pagination metadata returned next to a wrapped list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default)]
        meta: Option<PageMeta>,
        #[serde(default)]
        links: Option<Value>,
    },
    Bare(Vec<T>),
}

/// A list endpoint response: `{ data: [...], meta, links }` or a bare array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PageRepr<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
    pub links: Option<Value>,
}

impl<T> From<PageRepr<T>> for Page<T> {
    fn from(repr: PageRepr<T>) -> Self {
        match repr {
            PageRepr::Wrapped { data, meta, links } => Self {
                items: data,
                meta,
                links,
            },
            PageRepr::Bare(items) => Self {
                items,
                meta: None,
                links: None,
            },
        }
    }
}

/// Body of `/notifications/unread-count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Count {
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: u64,
    }

    #[test]
    fn test_wrapped_and_bare_lists() {
        let wrapped: Envelope<Vec<Item>> =
            serde_json::from_str(r#"{"data": [{"id": 1}], "meta": {"page": 1}}"#).unwrap();
        let bare: Envelope<Vec<Item>> = serde_json::from_str(r#"[{"id": 2}]"#).unwrap();

        assert_eq!(wrapped.into_inner(), vec![Item { id: 1 }]);
        assert_eq!(bare.into_inner(), vec![Item { id: 2 }]);
    }

    #[test]
    fn test_count_in_either_shape() {
        let wrapped: Envelope<Count> = serde_json::from_str(r#"{"data": {"count": 4}}"#).unwrap();
        let bare: Envelope<Count> = serde_json::from_str(r#"{"count": 3}"#).unwrap();

        assert_eq!(wrapped.into_inner().count, 4);
        assert_eq!(bare.into_inner().count, 3);
    }

    #[test]
    fn test_page_keeps_meta() {
        let page: Page<Item> = serde_json::from_str(
            r#"{"data": [{"id": 1}, {"id": 2}], "meta": {"current_page": 1, "last_page": 3, "total": 30}}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.unwrap().last_page, Some(3));

        let bare: Page<Item> = serde_json::from_str(r#"[{"id": 9}]"#).unwrap();
        assert_eq!(bare.items, vec![Item { id: 9 }]);
        assert!(bare.meta.is_none());
    }

    #[test]
    fn test_mismatched_shape_fails() {
        let result = serde_json::from_str::<Envelope<Vec<Item>>>(r#"{"items": []}"#);
        assert!(result.is_err());
    }
}
