// State management module.
// Handles post list paging, multi-field search, and the detail view.

pub mod debounce;
pub mod detail;
pub mod loading;
pub mod posts;
pub mod search;

pub use detail::{EditField, PostDetailState};
pub use loading::LoadingState;
pub use posts::PostListState;
pub use search::{SearchFocus, SearchState};
