//! Lesson pages

use serde::{Deserialize, Serialize};

use super::serde_helpers::deserialize_id;

pub type PageId = String;

/// An independently laid-out canvas within a lesson
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Page {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: PageId,

    #[serde(default)]
    pub title: String,

    /// 1-based display position; contiguous across the lesson
    #[serde(default)]
    pub order: u32,
}

impl Page {
    pub fn new(id: impl Into<PageId>, title: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
        }
    }

    /// Page with a fresh random id and the default title for `order`
    pub fn fresh(order: u32) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), default_title(order), order)
    }
}

/// Title given to pages that were never renamed
pub fn default_title(order: u32) -> String {
    format!("Page {}", order)
}
