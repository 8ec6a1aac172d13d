use incognitus_core::error::ClientError;

use crate::client::BackendClient;
use crate::types::InboxMessage;

/// Offset-based walk over the inbox.
///
/// When the server reports `has_more`, that decides whether another page is
/// fetched, so a backend that caps `limit` below `page_size` is still walked
/// to the end. Without it the walk stops after a page shorter than `page_size`.
pub struct InboxPager<'a> {
    client: &'a BackendClient,
    init_data: &'a str,
    page_size: u32,
    offset: u64,
    done: bool,
}

impl<'a> InboxPager<'a> {
    pub(crate) fn new(client: &'a BackendClient, init_data: &'a str, page_size: u32) -> Self {
        Self {
            client,
            init_data,
            page_size: page_size.max(1),
            offset: 0,
            done: false,
        }
    }

    /// Offset the next page will be requested at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Fetch the next page; `None` once the inbox is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<InboxMessage>>, ClientError> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .client
            .inbox(self.init_data, self.offset, self.page_size)
            .await?;

        let len = page.messages.len() as u64;
        self.offset += len;
        self.done = match page.has_more {
            Some(more) => !more || len == 0,
            None => len < u64::from(self.page_size),
        };

        if len == 0 {
            return Ok(None);
        }
        Ok(Some(page.messages))
    }

    /// Drain every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<InboxMessage>, ClientError> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }
}
