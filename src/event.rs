// Messages sent from background tasks back to the UI loop.

use crate::api::{Article, CommentsResponse, PostsResponse, ResUser};
use crate::error::Result;
use crate::state::search::SearchField;

#[derive(Debug)]
pub enum AppEvent {
    /// A page or search fetch for the post list finished.
    PostsFetched {
        seq: u64,
        page: u32,
        limit: u32,
        result: Result<PostsResponse>,
    },
    /// A search field has been quiet for the debounce period.
    /// `generation` identifies the timer; superseded ones are ignored.
    DebounceFired { field: SearchField, generation: u64 },
    /// A title/body search finished. `None` means there was no query.
    SearchFinished {
        seq: u64,
        results: Option<Vec<Article>>,
    },
    /// An explicit id lookup finished.
    IdLookupFinished { seq: u64, result: Result<Article> },
    CommentsLoaded {
        post_id: u64,
        result: Result<CommentsResponse>,
    },
    AuthorLoaded {
        post_id: u64,
        result: Result<ResUser>,
    },
    PostSaved {
        post_id: u64,
        result: Result<Article>,
    },
}
