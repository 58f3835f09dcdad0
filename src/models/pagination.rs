use serde::Serialize;

use crate::query::parser::Pagination;

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Meta {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        Meta {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: pagination.total_pages(total),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(pagination: Pagination, total: i64, data: Vec<T>) -> Self {
        Paginated {
            meta: Meta::new(pagination, total),
            data,
        }
    }
}
