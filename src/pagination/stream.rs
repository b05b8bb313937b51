//! Collection stream
//!
//! Flattens a chain of linked pages into one lazy stream of items. At most
//! one page is held in memory; the next page is only requested once the
//! current one has been drained.

use super::types::{NextPage, Page, DEFAULT_NEXT_PATH};
use crate::error::Result;
use crate::http::ApiClient;
use crate::path::BoundCall;
use crate::retry;
use futures::stream::{self, Stream};
use serde_json::Value;
use std::pin::Pin;
use std::vec;
use tracing::debug;

/// Lazy stream of collection items
pub type ModelStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

/// Follows `links.next` style continuations across a collection.
///
/// Every page goes through the client `find` was built from, so its calling
/// context and retry policy apply to continuation requests too.
#[derive(Debug, Clone)]
pub struct CollectionPaginator {
    model_name: String,
    next_path: String,
}

enum Cursor {
    Start(BoundCall),
    Page {
        items: vec::IntoIter<Value>,
        next: NextPage,
    },
}

impl CollectionPaginator {
    /// Create a paginator for the collection stored under `model_name`
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            next_path: DEFAULT_NEXT_PATH.to_string(),
        }
    }

    /// Override where the continuation link is read from
    #[must_use]
    pub fn next_path(mut self, path: impl Into<String>) -> Self {
        self.next_path = path.into();
        self
    }

    /// Stream every item, starting from the page returned by `find`.
    ///
    /// The first error ends the stream.
    pub fn stream(self, find: BoundCall) -> ModelStream {
        let client = find.client().clone();
        Box::pin(stream::try_unfold(Cursor::Start(find), move |cursor| {
            let paginator = self.clone();
            let client = client.clone();
            async move { paginator.advance(&client, cursor).await }
        }))
    }

    async fn advance(
        &self,
        client: &ApiClient,
        mut cursor: Cursor,
    ) -> Result<Option<(Value, Cursor)>> {
        loop {
            cursor = match cursor {
                Cursor::Start(find) => match find.send_with_retry().await? {
                    Some(body) => self.open(body)?,
                    None => return Ok(None),
                },
                Cursor::Page { mut items, next } => {
                    if let Some(item) = items.next() {
                        return Ok(Some((item, Cursor::Page { items, next })));
                    }
                    match next {
                        NextPage::Continue { url } => match fetch(client, &url).await? {
                            Some(body) => self.open(body)?,
                            None => return Ok(None),
                        },
                        NextPage::Done => return Ok(None),
                    }
                }
            };
        }
    }

    fn open(&self, body: Value) -> Result<Cursor> {
        let page = Page::from_body(body, &self.model_name, &self.next_path)?;
        debug!(
            model = %self.model_name,
            items = page.items.len(),
            last_page = page.is_last(),
            "Fetched {} page",
            self.model_name
        );

        Ok(Cursor::Page {
            items: page.items.into_iter(),
            next: page.next,
        })
    }
}

async fn fetch(client: &ApiClient, url: &str) -> Result<Option<Value>> {
    let operation = format!("GET {url}");
    retry::with_backoff(&client.config().retry, &operation, || client.get(url, &[])).await
}

impl ApiClient {
    /// Stream every item of a linked collection.
    ///
    /// Nothing is fetched until the stream is polled. Page one comes from
    /// `find` (sent with retry); later pages follow `links.next` through the
    /// same client as `find`, keeping any attached [`CallContext`].
    ///
    /// [`CallContext`]: crate::http::CallContext
    pub fn iter_collection(&self, model_name: impl Into<String>, find: BoundCall) -> ModelStream {
        CollectionPaginator::new(model_name).stream(find)
    }
}
