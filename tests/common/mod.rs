#![allow(dead_code)]

use async_trait::async_trait;
use blog_api::{
    AppState,
    config::AppConfig,
    models::{BlogRow, NewUser, Post, User},
    repository::{RepoError, Repository},
};
use chrono::Utc;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

// --- MOCK REPOSITORY IMPLEMENTATION ---

// In-memory stand-in for Postgres. Counts every call so tests can assert that a
// rejected request never reached the store.
#[derive(Default)]
pub struct MockRepo {
    pub users: Mutex<Vec<User>>,
    pub posts: Mutex<Vec<Post>>,
    pub calls: AtomicUsize,
    // When set, every operation fails with a database error.
    pub fail_with_db_error: bool,
    // When set, `find_user_by_email` misses, simulating a concurrent signup race.
    pub skip_email_precheck: bool,
}

impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_with_db_error: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn seed_user(&self, email: &str, password: &str, name: Option<&str>) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(str::to_string),
            password: password.to_string(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn seed_post(&self, author_id: Uuid, title: &str, content: &str) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            created_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    fn enter(&self) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_db_error {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn to_row(&self, post: &Post) -> BlogRow {
        let author_name = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == post.author_id)
            .and_then(|u| u.name.clone());
        BlogRow {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            author_name,
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.enter()?;
        if self.skip_email_precheck {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, RepoError> {
        self.enter()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.enter()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::UniqueViolation("users_email_key".to_string()));
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password: user.password,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn create_post(
        &self,
        author_id: Uuid,
        title: String,
        content: String,
    ) -> Result<Post, RepoError> {
        self.enter()?;
        let post = Post {
            id: Uuid::new_v4(),
            title,
            content,
            author_id,
            created_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, RepoError> {
        self.enter()?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        if let Some(title) = title {
            post.title = title;
        }
        if let Some(content) = content {
            post.content = content;
        }
        Ok(post.clone())
    }

    async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<BlogRow>, RepoError> {
        self.enter()?;
        let posts = self.posts.lock().unwrap().clone();
        Ok(posts
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| self.to_row(p))
            .collect())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<BlogRow>, RepoError> {
        self.enter()?;
        let post = self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned();
        Ok(post.map(|p| self.to_row(&p)))
    }
}

// --- TEST UTILITIES ---

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

pub fn test_state(repo: Arc<MockRepo>) -> AppState {
    AppState::new(repo, test_config())
}
