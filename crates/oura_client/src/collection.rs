//! Per-collection resolvers: single lookup, windowed pages and raw ranges.

use chrono::{NaiveDate, Utc};
use futures_util::Stream;
use futures_util::stream;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::window::{self, PageRequest};
use crate::{Collection, DailyRecord, ListResponse, OuraClient, OuraError, RangeQuery};

/// One page of results in ascending day order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for [`CollectionResolver::fetch_next`]; `None` on the last page.
    pub next: Option<PageRequest>,
}

/// Reference from a collection item back to its `one(id)` lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ItemRef {
    pub collection: Collection,
    pub id: String,
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.one(id:{:?})",
            self.collection.resolver_name(),
            self.id
        )
    }
}

#[derive(Clone)]
pub struct CollectionResolver {
    client: Arc<dyn OuraClient>,
    collection: Collection,
}

impl CollectionResolver {
    pub fn new(client: Arc<dyn OuraClient>, collection: Collection) -> Self {
        Self { client, collection }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub async fn one(&self, id: &str) -> Result<DailyRecord, OuraError> {
        self.client.get_document(self.collection, id).await
    }

    pub async fn page(&self, req: &PageRequest) -> Result<Page<DailyRecord>, OuraError> {
        self.page_at(req, Utc::now().date_naive()).await
    }

    /// [`page`](Self::page) with an explicit "today" for date defaults.
    pub async fn page_at(
        &self,
        req: &PageRequest,
        today: NaiveDate,
    ) -> Result<Page<DailyRecord>, OuraError> {
        let plan = window::compute_at(req, today)?;
        tracing::debug!(
            collection = %self.collection,
            start = %plan.window.start,
            end = %plan.window.end,
            more = plan.continuation.is_some(),
            "fetching page"
        );
        let resp = self
            .client
            .list_documents(self.collection, &plan.window.to_query())
            .await?;
        // The API lists newest first.
        let mut items = resp.data;
        items.reverse();
        Ok(Page {
            items,
            next: plan.continuation,
        })
    }

    /// Fetch the page after `page`, or `None` if `page` was the last one.
    ///
    /// Omitted dates in the continuation are resolved against the current
    /// clock; use [`fetch_next_at`](Self::fetch_next_at) to keep the "today"
    /// the first page was computed with.
    pub async fn fetch_next(
        &self,
        page: &Page<DailyRecord>,
    ) -> Result<Option<Page<DailyRecord>>, OuraError> {
        self.fetch_next_at(page, Utc::now().date_naive()).await
    }

    pub async fn fetch_next_at(
        &self,
        page: &Page<DailyRecord>,
        today: NaiveDate,
    ) -> Result<Option<Page<DailyRecord>>, OuraError> {
        match &page.next {
            Some(req) => self.page_at(req, today).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lazily follow the continuation chain starting at `req`. Stops after the
    /// last page or the first error.
    pub fn pages(
        &self,
        req: PageRequest,
    ) -> impl Stream<Item = Result<Page<DailyRecord>, OuraError>> + Send + use<> {
        let this = self.clone();
        stream::unfold(Some(req), move |cursor| {
            let this = this.clone();
            async move {
                let req = cursor?;
                match this.page(&req).await {
                    Ok(page) => {
                        let next = page.next.clone();
                        Some((Ok(page), next))
                    }
                    Err(e) => Some((Err(e), None)),
                }
            }
        })
    }

    /// Query the list endpoint directly, paging with the API's `next_token`.
    pub async fn range(&self, query: &RangeQuery) -> Result<ListResponse, OuraError> {
        self.client.list_documents(self.collection, query).await
    }

    pub fn gref(&self, record: &DailyRecord) -> ItemRef {
        ItemRef {
            collection: self.collection,
            id: record.id.clone(),
        }
    }
}
