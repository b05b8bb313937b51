//! Pagination module
//!
//! Iterates linked collections: each page holds its items under the model's
//! plural name and points at the next page through `links.next`.
//!
//! # Overview
//!
//! [`Page`] decodes a single page into items and a [`NextPage`]. The
//! [`CollectionPaginator`] chains pages into a lazy [`ModelStream`], which
//! is what [`ApiClient::iter_collection`](crate::ApiClient::iter_collection)
//! returns.

mod stream;
mod types;

pub use stream::{CollectionPaginator, ModelStream};
pub use types::{extract_path, NextPage, Page, DEFAULT_NEXT_PATH};
