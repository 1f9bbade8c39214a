//! Persistent storage for blog posts and user accounts

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage for blog data
pub struct Storage {
    data_path: PathBuf,
    /// Published posts
    posts: RwLock<PostStore>,
    /// Registered user accounts
    users: RwLock<UserStore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostStore {
    /// Next post id to assign
    next_id: u64,
    posts: HashMap<u64, StoredPost>,
}

impl Default for PostStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            posts: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserStore {
    /// Maps username -> account data
    users: HashMap<String, StoredUser>,
}

/// A published blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPost {
    pub id: u64,
    pub subject: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    /// Salted password hash in `hash,salt` form
    pub pw_hash: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    /// Create a new storage instance
    pub fn new(data_path: &str) -> Result<Self> {
        let data_path = PathBuf::from(data_path);
        std::fs::create_dir_all(&data_path)
            .with_context(|| format!("Failed to create data directory: {:?}", data_path))?;

        let storage = Self {
            data_path,
            posts: RwLock::new(PostStore::default()),
            users: RwLock::new(UserStore::default()),
        };

        // Load persisted data
        storage.load_posts()?;
        storage.load_users()?;

        Ok(storage)
    }

    // --- Posts ---

    /// Store a new post and return its assigned id
    pub fn create_post(&self, subject: &str, content: &str) -> Result<u64> {
        let id = {
            let mut store = self.posts.write().unwrap();
            let id = store.next_id;
            store.next_id += 1;
            let now = Utc::now();
            store.posts.insert(
                id,
                StoredPost {
                    id,
                    subject: subject.to_string(),
                    content: content.to_string(),
                    created: now,
                    last_modified: now,
                },
            );
            id
        };
        self.save_posts()?;
        Ok(id)
    }

    /// Get a post by id
    pub fn get_post(&self, id: u64) -> Option<StoredPost> {
        let store = self.posts.read().unwrap();
        store.posts.get(&id).cloned()
    }

    /// The most recent posts, newest first
    pub fn recent_posts(&self, limit: usize) -> Vec<StoredPost> {
        let store = self.posts.read().unwrap();
        let mut posts: Vec<StoredPost> = store.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        posts.truncate(limit);
        posts
    }

    // --- Users ---

    /// Register a new user account
    pub fn create_user(&self, user: StoredUser) -> Result<()> {
        {
            let mut store = self.users.write().unwrap();
            store.users.insert(user.username.clone(), user);
        }
        self.save_users()?;
        Ok(())
    }

    /// Get a registered user by username
    pub fn get_user(&self, username: &str) -> Option<StoredUser> {
        let store = self.users.read().unwrap();
        store.users.get(username).cloned()
    }

    // --- Persistence ---

    fn posts_path(&self) -> PathBuf {
        self.data_path.join("posts.json")
    }

    fn users_path(&self) -> PathBuf {
        self.data_path.join("users.json")
    }

    fn load_posts(&self) -> Result<()> {
        let path = self.posts_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let store: PostStore = serde_json::from_str(&content)?;
            *self.posts.write().unwrap() = store;
            tracing::info!("Loaded {} posts", self.posts.read().unwrap().posts.len());
        }
        Ok(())
    }

    fn save_posts(&self) -> Result<()> {
        let store = self.posts.read().unwrap();
        let content = serde_json::to_string_pretty(&*store)?;
        std::fs::write(self.posts_path(), content)?;
        Ok(())
    }

    fn load_users(&self) -> Result<()> {
        let path = self.users_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let store: UserStore = serde_json::from_str(&content)?;
            *self.users.write().unwrap() = store;
            tracing::info!("Loaded {} user accounts", self.users.read().unwrap().users.len());
        }
        Ok(())
    }

    fn save_users(&self) -> Result<()> {
        let store = self.users.read().unwrap();
        let content = serde_json::to_string_pretty(&*store)?;
        std::fs::write(self.users_path(), content)?;
        Ok(())
    }
}

// --- Utility Functions ---

/// Generate a random salt for password hashing
pub fn generate_salt() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..16)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hash a password for storage (we don't store raw passwords)
pub fn hash_password(username: &str, password: &str, salt: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{},{}", hex::encode(hasher.finalize()), salt)
}
