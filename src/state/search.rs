// Search tab state.
// Debounced lookup by id plus mutually exclusive title/body text search.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{Article, PostsApi, PostsResponse};
use crate::error::{IdInputError, Result};
use crate::event::AppEvent;

use super::debounce::Debouncer;
use super::loading;

pub const ID_INVALID_MESSAGE: &str = "Enter a valid numeric ID";
pub const ID_NOT_FOUND_MESSAGE: &str = "Post with this ID was not found";

/// The three debounced search inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Id,
    Title,
    Body,
}

/// Keyboard focus within the search tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Id,
    Title,
    Body,
    Results,
}

impl SearchFocus {
    pub fn next(&self) -> Self {
        match self {
            SearchFocus::Id => SearchFocus::Title,
            SearchFocus::Title => SearchFocus::Body,
            SearchFocus::Body => SearchFocus::Results,
            SearchFocus::Results => SearchFocus::Results,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SearchFocus::Id => SearchFocus::Id,
            SearchFocus::Title => SearchFocus::Id,
            SearchFocus::Body => SearchFocus::Title,
            SearchFocus::Results => SearchFocus::Body,
        }
    }
}

/// Parse the id field. Blank input is `Ok(None)`.
pub fn parse_post_id(input: &str) -> std::result::Result<Option<u64>, IdInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 => Ok(Some(n as u64)),
        Ok(_) => Err(IdInputError::NotPositive),
        Err(_) => Err(IdInputError::NotInteger),
    }
}

/// Run `search` for a trimmed query and store the outcome in `slot`.
///
/// A blank query stores `None` without calling `search`. A failed search
/// stores an empty list so the caller can tell "no query" from "no results".
pub async fn do_data_search<F, Fut>(search: F, query: &str, slot: &mut Option<Vec<Article>>)
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<PostsResponse>>,
{
    let trimmed = query.trim();
    if trimmed.is_empty() {
        *slot = None;
        return;
    }

    let posts = match search(trimmed.to_string()).await {
        Ok(response) => response.posts,
        Err(e) => {
            tracing::warn!(query = trimmed, error = %e, "search failed, showing no results");
            Vec::new()
        }
    };
    *slot = Some(posts);
}

/// State of the search tab.
pub struct SearchState {
    pub search_results: Option<Vec<Article>>,
    pub explicit_id_result: Option<Article>,
    pub id_error: Option<String>,
    pub searching: bool,
    pub id_loading: bool,
    pub focus: SearchFocus,
    pub list_state: ListState,
    by_id_query: String,
    title_query: String,
    body_query: String,
    debouncer: Debouncer<SearchField>,
    /// Latest issued title/body search.
    text_seq: u64,
    /// Latest issued id lookup.
    id_seq: u64,
    api: Arc<dyn PostsApi>,
    tx: UnboundedSender<AppEvent>,
}

impl SearchState {
    pub fn new(api: Arc<dyn PostsApi>, tx: UnboundedSender<AppEvent>, debounce: Duration) -> Self {
        Self {
            search_results: None,
            explicit_id_result: None,
            id_error: None,
            searching: false,
            id_loading: false,
            focus: SearchFocus::default(),
            list_state: ListState::default(),
            by_id_query: String::new(),
            title_query: String::new(),
            body_query: String::new(),
            debouncer: Debouncer::new(debounce),
            text_seq: 0,
            id_seq: 0,
            api,
            tx,
        }
    }

    pub fn by_id_query(&self) -> &str {
        &self.by_id_query
    }

    pub fn title_query(&self) -> &str {
        &self.title_query
    }

    pub fn body_query(&self) -> &str {
        &self.body_query
    }

    pub fn is_pending(&self, field: SearchField) -> bool {
        self.debouncer.is_pending(field)
    }

    pub fn set_id_query(&mut self, value: impl Into<String>) {
        self.by_id_query = value.into();

        match parse_post_id(&self.by_id_query) {
            Ok(Some(_)) => {
                self.debouncer.schedule(SearchField::Id, &self.tx, |generation| {
                    AppEvent::DebounceFired {
                        field: SearchField::Id,
                        generation,
                    }
                });
            }
            Ok(None) => {
                self.abandon_id_lookup();
                self.id_error = None;
            }
            Err(reason) => {
                tracing::debug!(input = %self.by_id_query, %reason, "rejected id input");
                self.abandon_id_lookup();
                self.id_error = Some(ID_INVALID_MESSAGE.to_string());
            }
        }
    }

    pub fn set_title_query(&mut self, value: impl Into<String>) {
        self.title_query = value.into();
        self.text_changed(SearchField::Title);
    }

    pub fn set_body_query(&mut self, value: impl Into<String>) {
        self.body_query = value.into();
        self.text_changed(SearchField::Body);
    }

    /// A debounce timer for `field` fired: start the actual request.
    /// Returns false if the timer was superseded after it fired.
    pub fn on_debounce_fired(&mut self, field: SearchField, generation: u64) -> bool {
        if !self.debouncer.take_fired(field, generation) {
            tracing::debug!(?field, generation, "discarding superseded debounce");
            return false;
        }

        match field {
            SearchField::Id => {
                let Ok(Some(id)) = parse_post_id(&self.by_id_query) else {
                    return true;
                };
                self.id_seq += 1;
                self.id_loading = true;

                let seq = self.id_seq;
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.get_post(id).await;
                    let _ = tx.send(AppEvent::IdLookupFinished { seq, result });
                });
            }
            SearchField::Title | SearchField::Body => {
                let query = self.text_query(field).trim().to_string();
                // Cleared or displaced by the other field since the timer started
                if query.is_empty() {
                    return true;
                }
                self.text_seq += 1;
                self.searching = true;

                let seq = self.text_seq;
                let api = Arc::clone(&self.api);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let mut results = None;
                    do_data_search(
                        |q| async move { api.search_posts(&q).await },
                        &query,
                        &mut results,
                    )
                    .await;
                    let _ = tx.send(AppEvent::SearchFinished { seq, results });
                });
            }
        }
        true
    }

    /// Apply a finished text search. Returns false if it was superseded.
    pub fn apply_search(&mut self, seq: u64, results: Option<Vec<Article>>) -> bool {
        if seq != self.text_seq {
            tracing::debug!(seq, latest = self.text_seq, "discarding stale search results");
            return false;
        }
        self.searching = false;
        let len = results.as_ref().map_or(0, Vec::len);
        self.search_results = results;
        loading::reset_selection(&mut self.list_state, len);
        true
    }

    /// Apply a finished id lookup. Returns false if it was superseded.
    pub fn apply_id_lookup(&mut self, seq: u64, result: Result<Article>) -> bool {
        if seq != self.id_seq {
            tracing::debug!(seq, latest = self.id_seq, "discarding stale id lookup");
            return false;
        }
        self.id_loading = false;

        match result {
            Ok(article) => {
                self.explicit_id_result = Some(article);
                self.id_error = None;
            }
            Err(e) => {
                tracing::debug!(id = %self.by_id_query, error = %e, "id lookup failed");
                self.explicit_id_result = None;
                self.id_error = Some(ID_NOT_FOUND_MESSAGE.to_string());
            }
        }
        true
    }

    /// Type a character into the focused field.
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            SearchFocus::Id => {
                let mut value = self.by_id_query.clone();
                value.push(c);
                self.set_id_query(value);
            }
            SearchFocus::Title => {
                let mut value = self.title_query.clone();
                value.push(c);
                self.set_title_query(value);
            }
            SearchFocus::Body => {
                let mut value = self.body_query.clone();
                value.push(c);
                self.set_body_query(value);
            }
            SearchFocus::Results => {}
        }
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        match self.focus {
            SearchFocus::Id => {
                let mut value = self.by_id_query.clone();
                if value.pop().is_some() {
                    self.set_id_query(value);
                }
            }
            SearchFocus::Title => {
                let mut value = self.title_query.clone();
                if value.pop().is_some() {
                    self.set_title_query(value);
                }
            }
            SearchFocus::Body => {
                let mut value = self.body_query.clone();
                if value.pop().is_some() {
                    self.set_body_query(value);
                }
            }
            SearchFocus::Results => {}
        }
    }

    pub fn focus_next(&mut self) {
        if self.focus == SearchFocus::Results {
            let count = self.result_count();
            loading::select_next(&mut self.list_state, count);
        } else {
            self.focus = self.focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.focus == SearchFocus::Results && self.list_state.selected().unwrap_or(0) > 0 {
            let count = self.result_count();
            loading::select_prev(&mut self.list_state, count);
        } else {
            self.focus = self.focus.prev();
        }
    }

    pub fn is_editing(&self) -> bool {
        self.focus != SearchFocus::Results
    }

    /// The article Enter should open, depending on focus.
    pub fn selected_article(&self) -> Option<&Article> {
        match self.focus {
            SearchFocus::Id => self.explicit_id_result.as_ref(),
            SearchFocus::Title | SearchFocus::Body | SearchFocus::Results => self
                .search_results
                .as_ref()?
                .get(self.list_state.selected()?),
        }
    }

    fn result_count(&self) -> usize {
        self.search_results.as_ref().map_or(0, Vec::len)
    }

    fn text_query(&self, field: SearchField) -> &str {
        match field {
            SearchField::Title => &self.title_query,
            SearchField::Body => &self.body_query,
            SearchField::Id => &self.by_id_query,
        }
    }

    fn text_changed(&mut self, field: SearchField) {
        let other = match field {
            SearchField::Title => SearchField::Body,
            _ => SearchField::Title,
        };
        // Any edit supersedes searches already in flight
        self.text_seq += 1;
        self.searching = false;

        if self.text_query(field).trim().is_empty() {
            self.debouncer.cancel(field);
            if self.text_query(other).trim().is_empty() {
                self.search_results = None;
                self.list_state.select(None);
            }
            return;
        }

        match other {
            SearchField::Title => self.title_query.clear(),
            _ => self.body_query.clear(),
        }
        self.debouncer.cancel(other);
        self.debouncer.schedule(field, &self.tx, |generation| {
            AppEvent::DebounceFired { field, generation }
        });
    }

    fn abandon_id_lookup(&mut self) {
        self.debouncer.cancel(SearchField::Id);
        self.id_seq += 1;
        self.id_loading = false;
        self.explicit_id_result = None;
    }
}
