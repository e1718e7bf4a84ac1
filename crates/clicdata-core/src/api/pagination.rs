//! Walking `?page=N` endpoints until the server reports no more data.
//!
//! The server decides when to stop: a page whose `has_more_data` never turns
//! false keeps the loop going. There is no client-side page ceiling.

use super::client::ClicDataClient;
use super::models::Page;
use super::request::ApiRequest;
use crate::error::{ApiError, AppError};
use serde_json::Value;

/// What to do when a page comes back with a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePolicy {
    /// Fail with the status code and body text.
    Strict,
    /// Log a warning and keep the records fetched before the failure.
    Lenient,
}

/// Records gathered across pages, in server order.
#[derive(Debug, Clone)]
pub struct PageAccumulator {
    records: Vec<Value>,
    next_page: u32,
}

impl PageAccumulator {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_page: 1,
        }
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a page and report whether another one should be requested.
    pub fn push(&mut self, page: Page) -> bool {
        self.records.extend(page.data);
        self.next_page += 1;
        page.has_more_data
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}

impl Default for PageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClicDataClient {
    /// Fetch every page of `suffix` and return the concatenated `data` records.
    pub async fn fetch_all(
        &mut self,
        suffix: &str,
        policy: PagePolicy,
    ) -> Result<Vec<Value>, AppError> {
        let mut accumulator = PageAccumulator::new();

        loop {
            let page_number = accumulator.next_page();
            let response = self
                .call(ApiRequest::get(suffix).param("page", page_number))
                .await?;

            if !response.is_success() {
                let status = response.status.as_u16();
                match policy {
                    PagePolicy::Strict => {
                        return Err(ApiError::Http {
                            status,
                            endpoint: suffix.to_string(),
                            message: format!("page {}: {}", page_number, response.body),
                        }
                        .into());
                    }
                    PagePolicy::Lenient => {
                        log::warn!(
                            "Stopped reading {} at page {} (status {}): {}. Returning {} records fetched before the error",
                            suffix,
                            page_number,
                            status,
                            response.body,
                            accumulator.len()
                        );
                        break;
                    }
                }
            }

            let page: Page = response.json()?;
            log::debug!(
                "{} page {}: {} records, has_more_data={}",
                suffix,
                page_number,
                page.data.len(),
                page.has_more_data
            );
            if !accumulator.push(page) {
                break;
            }
        }

        Ok(accumulator.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accumulator_keeps_page_order() {
        let mut accumulator = PageAccumulator::new();
        assert_eq!(accumulator.next_page(), 1);
        assert!(accumulator.is_empty());

        let more = accumulator.push(Page {
            has_more_data: true,
            data: vec![json!({"n": 1}), json!({"n": 2})],
        });
        assert!(more);
        assert_eq!(accumulator.next_page(), 2);

        let more = accumulator.push(Page {
            has_more_data: false,
            data: vec![json!({"n": 3})],
        });
        assert!(!more);
        assert_eq!(
            accumulator.into_records(),
            vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]
        );
    }
}
