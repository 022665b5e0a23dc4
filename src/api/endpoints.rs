// Posts and users endpoint functions.
// Maps domain operations onto typed requests against the REST API.

use async_trait::async_trait;

use crate::error::Result;

use super::client::ApiClient;
use super::types::{Article, CommentsResponse, PostsResponse, ResUser, UpdatePost};

const POSTS: &str = "/posts";
const USERS: &str = "/users";

/// Fields requested from the paged list endpoint.
const LIST_SELECT: &str = "userId,title,body,reactions";

impl ApiClient {
    /// Get one page of posts.
    pub async fn list_posts(&self, limit: u32, skip: u64) -> Result<PostsResponse> {
        let params = [
            ("select", LIST_SELECT.to_string()),
            ("limit", limit.to_string()),
            ("skip", skip.to_string()),
        ];
        let response = self.get_with_params(POSTS, &params).await?;
        let page: PostsResponse = response.json().await?;
        Ok(page)
    }

    /// Full-text search over posts.
    pub async fn search_posts(&self, query: &str) -> Result<PostsResponse> {
        let params = [("q", query.trim())];
        let response = self
            .get_with_params(&format!("{}/search", POSTS), &params)
            .await?;
        let page: PostsResponse = response.json().await?;
        Ok(page)
    }

    /// Get a single post by id.
    pub async fn get_post(&self, id: u64) -> Result<Article> {
        let response = self.get(&format!("{}/{}", POSTS, id)).await?;
        let article: Article = response.json().await?;
        Ok(article)
    }

    /// Get comments for a post.
    pub async fn get_comments(&self, id: u64) -> Result<CommentsResponse> {
        let response = self.get(&format!("{}/{}/comments", POSTS, id)).await?;
        let comments: CommentsResponse = response.json().await?;
        Ok(comments)
    }

    /// Replace a post's title and body.
    pub async fn update_post(&self, id: u64, title: &str, body: &str) -> Result<Article> {
        let response = self
            .patch_json(&format!("{}/{}", POSTS, id), &UpdatePost { title, body })
            .await?;
        let article: Article = response.json().await?;
        Ok(article)
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: u64) -> Result<ResUser> {
        let response = self.get(&format!("{}/{}", USERS, id)).await?;
        let user: ResUser = response.json().await?;
        Ok(user)
    }
}

/// Remote operations the state layer depends on.
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list_posts(&self, limit: u32, skip: u64) -> Result<PostsResponse>;

    async fn search_posts(&self, query: &str) -> Result<PostsResponse>;

    async fn get_post(&self, id: u64) -> Result<Article>;

    async fn get_comments(&self, id: u64) -> Result<CommentsResponse>;

    async fn update_post(&self, id: u64, title: &str, body: &str) -> Result<Article>;

    async fn get_user(&self, id: u64) -> Result<ResUser>;
}

#[async_trait]
impl PostsApi for ApiClient {
    async fn list_posts(&self, limit: u32, skip: u64) -> Result<PostsResponse> {
        ApiClient::list_posts(self, limit, skip).await
    }

    async fn search_posts(&self, query: &str) -> Result<PostsResponse> {
        ApiClient::search_posts(self, query).await
    }

    async fn get_post(&self, id: u64) -> Result<Article> {
        ApiClient::get_post(self, id).await
    }

    async fn get_comments(&self, id: u64) -> Result<CommentsResponse> {
        ApiClient::get_comments(self, id).await
    }

    async fn update_post(&self, id: u64, title: &str, body: &str) -> Result<Article> {
        ApiClient::update_post(self, id, title, body).await
    }

    async fn get_user(&self, id: u64) -> Result<ResUser> {
        ApiClient::get_user(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::PostdeckError;

    fn post_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "userId": 3,
            "title": title,
            "body": "body text",
            "tags": ["history"],
            "reactions": { "likes": 1, "dislikes": 0 }
        })
    }

    #[tokio::test]
    async fn test_list_posts_sends_paging_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("limit", "10"))
            .and(query_param("skip", "20"))
            .and(query_param("select", "userId,title,body,reactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post_json(21, "twenty one")],
                "total": 251,
                "skip": 20,
                "limit": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let page = client.list_posts(10, 20).await.unwrap();
        assert_eq!(page.total, 251);
        assert_eq!(page.posts[0].id, 21);
    }

    #[tokio::test]
    async fn test_search_posts_trims_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/search"))
            .and(query_param("q", "love"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post_json(4, "love story")],
                "total": 1,
                "skip": 0,
                "limit": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let page = client.search_posts("  love ").await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].title, "love story");
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/9999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Post with id '9999' not found"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_post(9999).await.unwrap_err();
        assert!(matches!(err, PostdeckError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/1/comments"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_comments(1).await.unwrap_err();
        match err {
            PostdeckError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_comments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "comments": [
                    { "id": 1, "body": "first", "postId": 1, "likes": 3, "user": { "id": 2, "username": "emilys", "fullName": "Emily" } }
                ],
                "total": 1, "skip": 0, "limit": 1
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let comments = client.get_comments(1).await.unwrap();
        assert_eq!(comments.comments.len(), 1);
        assert_eq!(comments.comments[0].user.username, "emilys");
    }

    #[tokio::test]
    async fn test_update_post_patches_title_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/posts/5"))
            .and(body_json(json!({ "title": "new title", "body": "new body" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5,
                "userId": 3,
                "title": "new title",
                "body": "new body",
                "tags": [],
                "reactions": { "likes": 0, "dislikes": 0 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let article = client.update_post(5, "new title", "new body").await.unwrap();
        assert_eq!(article.title, "new title");
        assert_eq!(article.body, "new body");
    }

    #[tokio::test]
    async fn test_get_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "firstName": "Sophia",
                "lastName": "Brown",
                "company": { "department": "Research", "title": "Analyst" }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let user = PostsApi::get_user(&client, 3).await.unwrap();
        assert_eq!(user.full_name(), "Sophia Brown");
        assert_eq!(user.company.title, "Analyst");
    }
}
