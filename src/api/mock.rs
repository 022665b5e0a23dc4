// In-memory posts API for state tests.
// Serves a generated dataset and counts calls per operation.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::{PostdeckError, Result};

use super::endpoints::PostsApi;
use super::types::{
    Article, Comment, CommentUser, CommentsResponse, Company, PostsResponse, Reactions, ResUser,
};

/// Mock API backed by a vector of articles.
pub struct MockPostsApi {
    posts: Vec<Article>,
    failing: AtomicBool,
    list_calls: AtomicU32,
    search_calls: AtomicU32,
    get_post_calls: AtomicU32,
    list_requests: Mutex<Vec<(u32, u64)>>,
    search_queries: Mutex<Vec<String>>,
}

impl MockPostsApi {
    /// Create a mock serving `count` posts with ids `1..=count`.
    pub fn with_posts(count: u64) -> Self {
        let posts = (1..=count).map(sample_article).collect();
        Self {
            posts,
            failing: AtomicBool::new(false),
            list_calls: AtomicU32::new(0),
            search_calls: AtomicU32::new(0),
            get_post_calls: AtomicU32::new(0),
            list_requests: Mutex::new(Vec::new()),
            search_queries: Mutex::new(Vec::new()),
        }
    }

    /// Make every call fail with a transport-style error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn get_post_calls(&self) -> u32 {
        self.get_post_calls.load(Ordering::SeqCst)
    }

    /// `(limit, skip)` of every list request, in order.
    pub fn list_requests(&self) -> Vec<(u32, u64)> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(PostdeckError::Other("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn sample_article(id: u64) -> Article {
    Article {
        id,
        user_id: Some(id % 5 + 1),
        title: format!("Post number {}", id),
        body: format!("Body of post {}", id),
        tags: vec!["sample".to_string()],
        reactions: Reactions {
            likes: id * 2,
            dislikes: id,
            views: Some(id * 10),
            user_id: None,
        },
    }
}

#[async_trait]
impl PostsApi for MockPostsApi {
    async fn list_posts(&self, limit: u32, skip: u64) -> Result<PostsResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_requests.lock().unwrap().push((limit, skip));
        self.check_failing()?;

        let posts = self
            .posts
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(PostsResponse {
            posts,
            total: self.posts.len() as u64,
            skip,
            limit: limit as u64,
        })
    }

    async fn search_posts(&self, query: &str) -> Result<PostsResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_queries.lock().unwrap().push(query.to_string());
        self.check_failing()?;

        let needle = query.trim().to_lowercase();
        let posts: Vec<Article> = self
            .posts
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle) || p.body.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        let total = posts.len() as u64;
        Ok(PostsResponse {
            posts,
            total,
            skip: 0,
            limit: total,
        })
    }

    async fn get_post(&self, id: u64) -> Result<Article> {
        self.get_post_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        self.posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PostdeckError::NotFound(format!("/posts/{}", id)))
    }

    async fn get_comments(&self, id: u64) -> Result<CommentsResponse> {
        self.check_failing()?;
        Ok(CommentsResponse {
            comments: vec![Comment {
                id: id * 100,
                body: format!("Comment on {}", id),
                user: CommentUser {
                    username: "emilys".to_string(),
                },
            }],
        })
    }

    async fn update_post(&self, id: u64, title: &str, body: &str) -> Result<Article> {
        self.check_failing()?;
        let mut article = self.get_post(id).await?;
        article.title = title.to_string();
        article.body = body.to_string();
        Ok(article)
    }

    async fn get_user(&self, id: u64) -> Result<ResUser> {
        self.check_failing()?;
        Ok(ResUser {
            id,
            first_name: "Emily".to_string(),
            last_name: "Johnson".to_string(),
            company: Company {
                department: "Engineering".to_string(),
                title: "Sales Manager".to_string(),
            },
        })
    }
}
