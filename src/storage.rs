//! Visitor-scoped key-value storage with expiry.
//!
//! The comparison list lives on the visitor's side, so the server only ever
//! sees the copy sent with the current request and writes back a full
//! replacement.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub trait ListStore {
    fn load(&self, key: &str) -> Option<String>;
    /// Replace the whole value; `ttl` counts from now.
    fn save(&mut self, key: &str, value: String, ttl: Duration);
}

/// Cookie-backed store for one request/response cycle.
#[derive(Debug, Clone)]
pub struct CookieListStore {
    jar: CookieJar,
    path: String,
}

impl CookieListStore {
    pub fn new(jar: CookieJar, path: impl Into<String>) -> Self { Self { jar, path: path.into() } }
    pub fn into_jar(self) -> CookieJar { self.jar }
}

impl ListStore for CookieListStore {
    fn load(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|c| c.value().to_string())
    }

    fn save(&mut self, key: &str, value: String, ttl: Duration) {
        let cookie = Cookie::build((key.to_string(), value))
            .path(self.path.clone())
            .max_age(time::Duration::seconds(ttl.num_seconds()))
            .build();
        self.jar = std::mem::take(&mut self.jar).add(cookie);
    }
}

/// Process-local store honouring expiry; used by tests and embedders without
/// an HTTP layer.
#[derive(Debug, Default, Clone)]
pub struct MemoryListStore {
    entries: HashMap<String, (String, DateTime<Utc>)>,
}

impl MemoryListStore {
    pub fn new() -> Self { Self::default() }

    /// Seed a raw value, bypassing serialization.
    pub fn with_raw(mut self, key: &str, raw: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), (raw.into(), Utc::now() + Duration::days(1)));
        self
    }

    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> { self.entries.get(key).map(|(_, e)| *e) }
}

impl ListStore for MemoryListStore {
    fn load(&self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some((value, expires)) if *expires > Utc::now() => Some(value.clone()),
            _ => None,
        }
    }

    fn save(&mut self, key: &str, value: String, ttl: Duration) {
        let expires = Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(key.to_string(), (value, expires));
    }
}
