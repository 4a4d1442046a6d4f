//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// 数据库 OFFSET 以有符号 64 位整数绑定
const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationParams {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self { page, limit }
    }

    /// 页码，最小为 1
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// 每页数量，限制在 1..=100
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page(), self.limit())
    }
}

/// 超大页码不会溢出，只会落在最后一条记录之后
pub fn page_offset(page: u64, limit: u64) -> u64 {
    (page.max(1) - 1).saturating_mul(limit).min(MAX_OFFSET)
}

/// 序列化后与实体列表平铺在同一层：`{ "<entities>": [...], "totalPages", "currentPage", "count" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_pages: u64,
    pub current_page: u64,
    pub count: u64,
}

impl PageMeta {
    pub fn new(params: &PaginationParams, count: u64) -> Self {
        Self {
            total_pages: count.div_ceil(params.limit()),
            current_page: params.page(),
            count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }
}

impl<T: Serialize> Paginated<T> {
    /// `{ "<key>": [...], "totalPages", "currentPage", "count" }`
    pub fn to_json(&self, key: &str) -> serde_json::Value {
        let mut body = json!({
            "totalPages": self.meta.total_pages,
            "currentPage": self.meta.current_page,
            "count": self.meta.count,
        });
        body[key] = json!(self.items);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams::new(Some(0), Some(0));
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_second_page_of_fifteen_rows() {
        let params = PaginationParams::new(Some(2), Some(10));
        assert_eq!(params.offset(), 10);

        let meta = PageMeta::new(&params, 15);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.count, 15);
    }

    #[test]
    fn test_huge_page_and_limit_do_not_overflow() {
        let params = PaginationParams::new(Some(u64::MAX), Some(10));
        assert_eq!(params.offset(), i64::MAX as u64);
        assert_eq!(params.page(), u64::MAX);

        let params = PaginationParams::new(Some(3), Some(u64::MAX));
        assert_eq!(params.limit(), MAX_LIMIT);
        assert_eq!(params.offset(), 200);
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let meta = PageMeta::new(&PaginationParams::default(), 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn test_paginated_envelope() {
        let params = PaginationParams::new(Some(2), Some(2));
        let page = Paginated::new(vec!["c", "d"], PageMeta::new(&params, 5));
        let body = page.to_json("merchants");
        assert_eq!(body["merchants"], json!(["c", "d"]));
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["count"], 5);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PageMeta::new(&PaginationParams::new(Some(1), Some(5)), 11);
        let value = serde_json::to_value(meta).unwrap();
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["count"], 11);
    }
}
