// App state and main event loop.
// Manages tabs, keyboard input, and dispatch of background task results.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::PostsApi;
use crate::cache::SessionStore;
use crate::config::Config;
use crate::event::AppEvent;
use crate::state::{PostDetailState, PostListState, SearchFocus, SearchState};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Posts,
    Search,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Posts => "Posts",
            Tab::Search => "Search",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Posts => Tab::Search,
            Tab::Search => Tab::Posts,
        }
    }

    pub fn prev(&self) -> Self {
        // Two tabs, so stepping back is the same as stepping forward.
        self.next()
    }
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    pub posts: PostListState,
    pub search: SearchState,
    /// Detail overlay, drawn over either tab.
    pub detail: Option<PostDetailState>,
    /// Text query being typed on the Posts tab, committed on Enter.
    pub query_draft: Option<String>,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    api: Arc<dyn PostsApi>,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(api: Arc<dyn PostsApi>, store: Arc<dyn SessionStore>, config: &Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            active_tab: Tab::default(),
            posts: PostListState::new(Arc::clone(&api), store, tx.clone(), config.page_limit),
            search: SearchState::new(Arc::clone(&api), tx.clone(), config.debounce()),
            detail: None,
            query_draft: None,
            show_help: false,
            should_quit: false,
            api,
            tx,
            rx,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.posts.activate();

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.drain_app_events();
        }
        Ok(())
    }

    /// Whether keystrokes currently go into a text field.
    pub fn in_text_input(&self) -> bool {
        if let Some(detail) = &self.detail {
            return detail.is_editing();
        }
        match self.active_tab {
            Tab::Posts => self.query_draft.is_some(),
            Tab::Search => self.search.is_editing(),
        }
    }

    /// Handle keyboard and other terminal events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Apply every result background tasks have sent since the last frame.
    fn drain_app_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PostsFetched {
                seq,
                page,
                limit,
                result,
            } => {
                self.posts.apply_fetch(seq, page, limit, result);
            }
            AppEvent::DebounceFired { field, generation } => {
                self.search.on_debounce_fired(field, generation);
            }
            AppEvent::SearchFinished { seq, results } => {
                self.search.apply_search(seq, results);
            }
            AppEvent::IdLookupFinished { seq, result } => {
                self.search.apply_id_lookup(seq, result);
            }
            AppEvent::CommentsLoaded { post_id, result } => {
                if let Some(detail) = &mut self.detail {
                    detail.apply_comments(post_id, result);
                }
            }
            AppEvent::AuthorLoaded { post_id, result } => {
                if let Some(detail) = &mut self.detail {
                    detail.apply_author(post_id, result);
                }
            }
            AppEvent::PostSaved { post_id, result } => {
                if let Some(detail) = &mut self.detail {
                    detail.apply_saved(post_id, result);
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        if self.detail.is_some() {
            self.handle_detail_key(key);
            return;
        }

        if self.query_draft.is_some() {
            self.handle_query_draft_key(key);
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
                return;
            }
            _ => {}
        }

        if !self.in_text_input() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                    return;
                }
                _ => {}
            }
        }

        match self.active_tab {
            Tab::Posts => self.handle_posts_key(key),
            Tab::Search => self.handle_search_key(key),
        }
    }

    fn handle_posts_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.posts.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.posts.select_next(),
            KeyCode::Left | KeyCode::Char('h') => self.posts.prev_page(),
            KeyCode::Right | KeyCode::Char('l') => self.posts.next_page(),
            KeyCode::Char('+') => self.posts.cycle_limit(true),
            KeyCode::Char('-') => self.posts.cycle_limit(false),
            KeyCode::Char('/') => self.query_draft = Some(self.posts.text_query().to_string()),
            KeyCode::Char('c') => self.posts.clear_cache(),
            KeyCode::Char('r') => {
                self.posts.fetch();
            }
            KeyCode::Enter => {
                if let Some(post) = self.posts.selected_post().cloned() {
                    self.open_detail(post);
                }
            }
            _ => {}
        }
    }

    fn handle_query_draft_key(&mut self, key: KeyEvent) {
        let Some(draft) = &mut self.query_draft else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let query = std::mem::take(draft);
                self.query_draft = None;
                self.posts.set_text_query(query);
            }
            KeyCode::Esc => self.query_draft = None,
            KeyCode::Backspace => {
                draft.pop();
            }
            KeyCode::Char(c) => draft.push(c),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.search.focus_prev(),
            KeyCode::Down => self.search.focus_next(),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Esc => self.search.focus = SearchFocus::Results,
            KeyCode::Enter => {
                if let Some(post) = self.search.selected_article().cloned() {
                    self.open_detail(post);
                }
            }
            KeyCode::Char(c) => self.search.input_char(c),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let Some(detail) = &mut self.detail else {
            return;
        };

        if let Some(editor) = &mut detail.editor {
            match key.code {
                KeyCode::Esc => detail.cancel_edit(),
                KeyCode::Tab => editor.toggle_field(),
                KeyCode::Enter => detail.save(&self.api, &self.tx),
                KeyCode::Backspace => editor.pop(),
                KeyCode::Char(c) => editor.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.detail = None,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('e') => detail.start_edit(),
            KeyCode::Up | KeyCode::Char('k') => detail.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => detail.scroll_down(),
            _ => {}
        }
    }

    fn open_detail(&mut self, post: crate::api::Article) {
        tracing::debug!(post_id = post.id, "opening post detail");
        self.detail = Some(PostDetailState::open(post, &self.api, &self.tx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockPostsApi;
    use crate::cache::MemoryStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (Arc<MockPostsApi>, App) {
        let mock = Arc::new(MockPostsApi::with_posts(25));
        let config = Config {
            session_file: None,
            ..Config::default()
        };
        let app = App::new(mock.clone(), Arc::new(MemoryStore::new()), &config);
        (mock, app)
    }

    async fn pump(app: &mut App) {
        let event = app.rx.recv().await.unwrap();
        app.handle_app_event(event);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Posts.next(), Tab::Search);
        assert_eq!(Tab::Search.next(), Tab::Posts);
        assert_eq!(Tab::Posts.prev(), Tab::Search);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_while_typing() {
        let (_mock, mut app) = test_app();
        app.active_tab = Tab::Search;
        app.search.focus = SearchFocus::Title;

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.search.title_query(), "q");

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_posts_paging_keys() {
        let (mock, mut app) = test_app();
        app.posts.activate();
        pump(&mut app).await;
        assert_eq!(app.posts.posts.len(), 10);

        app.handle_key(key(KeyCode::Right));
        pump(&mut app).await;
        assert_eq!(app.posts.current_page(), 2);
        assert_eq!(app.posts.posts[0].id, 11);

        app.handle_key(key(KeyCode::Char('+')));
        pump(&mut app).await;
        assert_eq!(app.posts.limit(), 20);
        assert_eq!(mock.list_requests().last(), Some(&(20, 20)));
    }

    #[tokio::test]
    async fn test_query_draft_commits_on_enter() {
        let (mock, mut app) = test_app();
        app.posts.activate();
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Char('/')));
        for c in "number 7".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(mock.search_calls(), 0);
        assert!(app.in_text_input());

        app.handle_key(key(KeyCode::Enter));
        pump(&mut app).await;
        assert_eq!(app.posts.text_query(), "number 7");
        assert_eq!(mock.search_queries(), vec!["number 7".to_string()]);
        assert_eq!(app.posts.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_query_draft_escape_discards() {
        let (mock, mut app) = test_app();
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));

        assert!(app.query_draft.is_none());
        assert_eq!(app.posts.text_query(), "");
        assert_eq!(mock.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_enter_opens_detail_and_esc_closes() {
        let (_mock, mut app) = test_app();
        app.posts.activate();
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.detail.as_ref().map(|d| d.post.id), Some(2));

        pump(&mut app).await;
        pump(&mut app).await;
        let detail = app.detail.as_ref().unwrap();
        assert!(detail.comments.data().is_some());
        assert!(detail.author.data().is_some());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.detail.is_none());
    }

    #[tokio::test]
    async fn test_results_for_closed_detail_are_dropped() {
        let (_mock, mut app) = test_app();
        app.posts.activate();
        pump(&mut app).await;

        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Esc));
        pump(&mut app).await;
        pump(&mut app).await;
        assert!(app.detail.is_none());
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let (_mock, mut app) = test_app();
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
    }
}
