//! List-endpoint filters: page/size bounds, sort safelist, pagination metadata.

use crate::validator::{self, Validator};
use serde::Serialize;

/// Paging and ordering parameters for a list endpoint. The safelist is the
/// only source of column names that may reach an ORDER BY clause.
#[derive(Debug)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: Vec<&'static str>,
}

impl Filters {
    /// Run every check so all violations are reported in one response.
    pub fn validate(&self, v: &mut Validator) {
        v.check(self.page > 0, "page", "must be greater than zero");
        v.check(
            self.page <= 10_000_000,
            "page",
            "must be a maximum of 10 million",
        );
        v.check(self.page_size > 0, "page_size", "must be greater than zero");
        v.check(
            self.page_size <= 100,
            "page_size",
            "must be a maximum of 100",
        );
        v.check(
            validator::in_list(&self.sort, &self.sort_safelist),
            "sort",
            "invalid sort value",
        );
    }

    /// Bare column name for the ORDER BY clause. Only ever derived from a
    /// safelisted token; reaching the panic means `validate` was skipped.
    pub fn sort_column(&self) -> &str {
        for safe in &self.sort_safelist {
            if self.sort == *safe {
                return self.sort.trim_start_matches('-');
            }
        }
        panic!("unsafe sort parameter: {}", self.sort);
    }

    /// `DESC` when the raw sort token carries a `-` prefix, else `ASC`.
    pub fn sort_direction(&self) -> &'static str {
        if self.sort.starts_with('-') {
            "DESC"
        } else {
            "ASC"
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Page summary returned alongside list results. All-zero (serialized as an
/// empty object) when the result set is empty.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl Metadata {
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 {
            return Metadata::default();
        }
        Metadata {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}
