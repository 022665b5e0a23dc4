// Post detail state.
// Loads comments and author for one post and handles title/body editing.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::{Article, Comment, CommentsResponse, PostsApi, ResUser};
use crate::error::Result;
use crate::event::AppEvent;

use super::loading::LoadingState;

/// Which editor field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Title,
    Body,
}

/// In-progress edit of a post.
#[derive(Debug, Clone)]
pub struct PostEditor {
    pub title: String,
    pub body: String,
    pub field: EditField,
}

impl PostEditor {
    fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            body: article.body.clone(),
            field: EditField::Title,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            EditField::Title => EditField::Body,
            EditField::Body => EditField::Title,
        };
    }

    pub fn push(&mut self, c: char) {
        match self.field {
            EditField::Title => self.title.push(c),
            EditField::Body => self.body.push(c),
        }
    }

    pub fn pop(&mut self) {
        match self.field {
            EditField::Title => self.title.pop(),
            EditField::Body => self.body.pop(),
        };
    }
}

/// State of the detail overlay for a single post.
#[derive(Debug)]
pub struct PostDetailState {
    pub post: Article,
    pub comments: LoadingState<Vec<Comment>>,
    pub author: LoadingState<ResUser>,
    pub editor: Option<PostEditor>,
    pub saving: bool,
    pub save_error: Option<String>,
    pub scroll: u16,
}

impl PostDetailState {
    /// Open a post and start loading its comments and author.
    pub fn open(post: Article, api: &Arc<dyn PostsApi>, tx: &UnboundedSender<AppEvent>) -> Self {
        let post_id = post.id;

        {
            let api = Arc::clone(api);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = api.get_comments(post_id).await;
                let _ = tx.send(AppEvent::CommentsLoaded { post_id, result });
            });
        }

        let author = match post.user_id {
            Some(user_id) => {
                let api = Arc::clone(api);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = api.get_user(user_id).await;
                    let _ = tx.send(AppEvent::AuthorLoaded { post_id, result });
                });
                LoadingState::Loading
            }
            None => LoadingState::Idle,
        };

        Self {
            post,
            comments: LoadingState::Loading,
            author,
            editor: None,
            saving: false,
            save_error: None,
            scroll: 0,
        }
    }

    pub fn apply_comments(&mut self, post_id: u64, result: Result<CommentsResponse>) {
        if post_id != self.post.id {
            return;
        }
        self.comments = match result {
            Ok(response) => LoadingState::Loaded(response.comments),
            Err(e) => {
                tracing::warn!(post_id, error = %e, "loading comments failed");
                LoadingState::Error(e.to_string())
            }
        };
    }

    pub fn apply_author(&mut self, post_id: u64, result: Result<ResUser>) {
        if post_id != self.post.id {
            return;
        }
        self.author = match result {
            Ok(user) => LoadingState::Loaded(user),
            Err(e) => {
                tracing::warn!(post_id, error = %e, "loading author failed");
                LoadingState::Error(e.to_string())
            }
        };
    }

    pub fn start_edit(&mut self) {
        if self.editor.is_none() {
            self.editor = Some(PostEditor::from_article(&self.post));
            self.save_error = None;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
        self.save_error = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Send the edited title and body to the server.
    pub fn save(&mut self, api: &Arc<dyn PostsApi>, tx: &UnboundedSender<AppEvent>) {
        let Some(editor) = &self.editor else {
            return;
        };
        if self.saving {
            return;
        }
        self.saving = true;
        self.save_error = None;

        let post_id = self.post.id;
        let title = editor.title.clone();
        let body = editor.body.clone();
        let api = Arc::clone(api);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = api.update_post(post_id, &title, &body).await;
            let _ = tx.send(AppEvent::PostSaved { post_id, result });
        });
    }

    pub fn apply_saved(&mut self, post_id: u64, result: Result<Article>) {
        if post_id != self.post.id {
            return;
        }
        self.saving = false;

        match result {
            Ok(article) => {
                tracing::info!(post_id, "post updated");
                self.post = article;
                self.editor = None;
            }
            Err(e) => {
                tracing::error!(post_id, error = %e, "saving post failed");
                self.save_error = Some(e.to_string());
            }
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::api::mock::{MockPostsApi, sample_article};

    fn setup() -> (
        Arc<MockPostsApi>,
        Arc<dyn PostsApi>,
        UnboundedSender<AppEvent>,
        UnboundedReceiver<AppEvent>,
    ) {
        let mock = Arc::new(MockPostsApi::with_posts(10));
        let api: Arc<dyn PostsApi> = mock.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        (mock, api, tx, rx)
    }

    async fn pump(detail: &mut PostDetailState, rx: &mut UnboundedReceiver<AppEvent>) {
        match rx.recv().await.unwrap() {
            AppEvent::CommentsLoaded { post_id, result } => detail.apply_comments(post_id, result),
            AppEvent::AuthorLoaded { post_id, result } => detail.apply_author(post_id, result),
            AppEvent::PostSaved { post_id, result } => detail.apply_saved(post_id, result),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_open_loads_comments_and_author() {
        let (_mock, api, tx, mut rx) = setup();
        let mut detail = PostDetailState::open(sample_article(3), &api, &tx);
        assert!(detail.comments.is_loading());
        assert!(detail.author.is_loading());

        pump(&mut detail, &mut rx).await;
        pump(&mut detail, &mut rx).await;

        assert_eq!(detail.comments.data().unwrap()[0].user.username, "emilys");
        assert_eq!(detail.author.data().unwrap().full_name(), "Emily Johnson");
    }

    #[tokio::test]
    async fn test_post_without_author_skips_user_lookup() {
        let (_mock, api, tx, mut rx) = setup();
        let mut article = sample_article(3);
        article.user_id = None;

        let mut detail = PostDetailState::open(article, &api, &tx);
        assert!(matches!(detail.author, LoadingState::Idle));
        pump(&mut detail, &mut rx).await;
        assert!(detail.comments.data().is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_results_for_other_post_are_ignored() {
        let (mock, api, tx, _rx) = setup();
        let mut detail = PostDetailState::open(sample_article(3), &api, &tx);

        let other = mock.get_comments(4).await;
        detail.apply_comments(4, other);
        assert!(detail.comments.is_loading());
    }

    #[tokio::test]
    async fn test_save_replaces_post() {
        let (_mock, api, tx, mut rx) = setup();
        let mut detail = PostDetailState::open(sample_article(3), &api, &tx);
        pump(&mut detail, &mut rx).await;
        pump(&mut detail, &mut rx).await;

        detail.start_edit();
        let editor = detail.editor.as_mut().unwrap();
        editor.title = "Edited".to_string();
        editor.toggle_field();
        editor.pop();
        editor.push('!');

        detail.save(&api, &tx);
        assert!(detail.saving);
        pump(&mut detail, &mut rx).await;

        assert!(!detail.saving);
        assert!(!detail.is_editing());
        assert_eq!(detail.post.title, "Edited");
        assert_eq!(detail.post.body, "Body of post !");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_editor() {
        let (mock, api, tx, mut rx) = setup();
        let mut detail = PostDetailState::open(sample_article(3), &api, &tx);
        pump(&mut detail, &mut rx).await;
        pump(&mut detail, &mut rx).await;

        mock.set_failing(true);
        detail.start_edit();
        detail.save(&api, &tx);
        pump(&mut detail, &mut rx).await;

        assert!(detail.is_editing());
        assert!(detail.save_error.is_some());
        assert_eq!(detail.post, sample_article(3));
    }
}
