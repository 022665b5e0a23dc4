// Post list state.
// Owns pagination, the single-slot session cache, and list/search fetching.

use std::sync::Arc;

use ratatui::widgets::ListState;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{Article, PostsApi, PostsResponse};
use crate::cache::SessionStore;
use crate::error::Result;
use crate::event::AppEvent;

use super::loading;

/// Session key holding the cached page as JSON.
pub const POSTS_STORAGE_KEY: &str = "posts";
/// Session key holding the last successfully fetched page number.
pub const PAGE_STORAGE_KEY: &str = "currentPage";

/// Page sizes offered by the `+`/`-` keys.
pub const PAGE_SIZES: [u32; 4] = [5, 10, 20, 30];

/// The single cached page. Only valid while `page` and `limit` match the list state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPosts {
    pub posts: Vec<Article>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Number of pages needed for `total` items, never less than one.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 1;
    }
    total
        .div_ceil(u64::from(limit))
        .clamp(1, u64::from(u32::MAX)) as u32
}

/// Drop the cached page left by an earlier run, keeping the saved page number.
///
/// The session store may outlive the process, so a new run refetches its
/// first page instead of serving posts of unknown age.
pub fn discard_cached_page(store: &dyn SessionStore) {
    if let Err(e) = store.remove(POSTS_STORAGE_KEY) {
        tracing::warn!(error = %e, "could not drop cached page from previous session");
    }
}

/// State of the paged post list.
pub struct PostListState {
    pub posts: Vec<Article>,
    pub total_pages: u32,
    pub is_loading: bool,
    pub error: Option<String>,
    pub list_state: ListState,
    current_page: u32,
    limit: u32,
    text_query: String,
    /// Sequence number of the latest issued fetch.
    seq: u64,
    activated: bool,
    api: Arc<dyn PostsApi>,
    store: Arc<dyn SessionStore>,
    tx: UnboundedSender<AppEvent>,
}

impl PostListState {
    /// Create the list state, restoring the page number saved in the session.
    pub fn new(
        api: Arc<dyn PostsApi>,
        store: Arc<dyn SessionStore>,
        tx: UnboundedSender<AppEvent>,
        initial_limit: u32,
    ) -> Self {
        let mut state = Self {
            posts: Vec::new(),
            total_pages: 0,
            is_loading: false,
            error: None,
            list_state: ListState::default(),
            current_page: 1,
            limit: initial_limit.max(1),
            text_query: String::new(),
            seq: 0,
            activated: false,
            api,
            store,
            tx,
        };

        if let Some(page) = state.saved_page() {
            state.current_page = page;
        }
        state
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn text_query(&self) -> &str {
        &self.text_query
    }

    /// First load: serve the cached page if it matches, otherwise fetch.
    pub fn activate(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;

        self.is_loading = true;
        self.error = None;

        let cached = self
            .read_cache()
            .filter(|c| c.page == self.current_page && c.limit == self.limit);
        if let Some(cached) = cached {
            tracing::debug!(page = cached.page, limit = cached.limit, "serving posts from session cache");
            self.total_pages = total_pages(cached.total, self.limit);
            self.posts = cached.posts;
            loading::reset_selection(&mut self.list_state, self.posts.len());
            self.is_loading = false;
            return;
        }

        self.fetch();
    }

    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if page == self.current_page {
            return;
        }
        self.current_page = page;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages {
            self.set_page(self.current_page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.set_page(self.current_page - 1);
        }
    }

    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if limit == self.limit {
            return;
        }
        self.limit = limit;
        self.refresh();
    }

    /// Step to the next (or previous) entry of [`PAGE_SIZES`].
    pub fn cycle_limit(&mut self, forward: bool) {
        let idx = PAGE_SIZES.iter().position(|&size| size >= self.limit);
        let next = match (idx, forward) {
            (Some(i), true) if PAGE_SIZES[i] == self.limit => (i + 1).min(PAGE_SIZES.len() - 1),
            (Some(i), true) => i,
            (Some(i), false) => i.saturating_sub(1),
            (None, _) => PAGE_SIZES.len() - 1,
        };
        self.set_limit(PAGE_SIZES[next]);
    }

    pub fn set_text_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.text_query {
            return;
        }
        self.text_query = query;
        self.refresh();
    }

    /// Drop the cached page and fetch the current one again.
    pub fn refresh(&mut self) {
        self.remove_key(POSTS_STORAGE_KEY);
        self.fetch();
    }

    /// Remove both the cached page and the saved page number.
    pub fn clear_cache(&mut self) {
        self.remove_key(POSTS_STORAGE_KEY);
        self.remove_key(PAGE_STORAGE_KEY);
    }

    /// Start a fetch for the current page/limit/query. Returns its sequence number.
    pub fn fetch(&mut self) -> u64 {
        self.is_loading = true;
        self.error = None;
        self.seq += 1;

        let seq = self.seq;
        let page = self.current_page;
        let limit = self.limit;
        let query = self.text_query.trim().to_string();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = if query.is_empty() {
                let skip = u64::from(page - 1) * u64::from(limit);
                api.list_posts(limit, skip).await
            } else {
                api.search_posts(&query).await
            };
            let _ = tx.send(AppEvent::PostsFetched {
                seq,
                page,
                limit,
                result,
            });
        });

        seq
    }

    /// Apply a finished fetch. Returns false if a newer fetch superseded it.
    pub fn apply_fetch(
        &mut self,
        seq: u64,
        page: u32,
        limit: u32,
        result: Result<PostsResponse>,
    ) -> bool {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, page, "discarding stale posts response");
            return false;
        }
        self.is_loading = false;

        match result {
            Ok(response) => {
                self.total_pages = total_pages(response.total, limit);
                self.write_cache(&CachedPosts {
                    posts: response.posts.clone(),
                    total: response.total,
                    page,
                    limit,
                });
                self.posts = response.posts;
                loading::reset_selection(&mut self.list_state, self.posts.len());
            }
            Err(e) => {
                tracing::error!(page, limit, error = %e, "fetch posts failed");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn select_next(&mut self) {
        loading::select_next(&mut self.list_state, self.posts.len());
    }

    pub fn select_prev(&mut self) {
        loading::select_prev(&mut self.list_state, self.posts.len());
    }

    pub fn selected_post(&self) -> Option<&Article> {
        self.posts.get(self.list_state.selected()?)
    }

    fn saved_page(&self) -> Option<u32> {
        let raw = match self.store.get(PAGE_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved page");
                return None;
            }
        };
        raw.trim().parse::<u32>().ok().filter(|&page| page > 0)
    }

    fn read_cache(&self) -> Option<CachedPosts> {
        let raw = match self.store.get(POSTS_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read posts cache");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable posts cache");
                None
            }
        }
    }

    fn write_cache(&self, cached: &CachedPosts) {
        let json = match serde_json::to_string(cached) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize posts cache");
                return;
            }
        };
        if let Err(e) = self
            .store
            .set(POSTS_STORAGE_KEY, &json)
            .and_then(|_| self.store.set(PAGE_STORAGE_KEY, &cached.page.to_string()))
        {
            tracing::warn!(error = %e, "could not write posts cache");
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "could not remove session key");
        }
    }
}
