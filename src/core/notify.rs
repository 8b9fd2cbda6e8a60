use crate::utils::error::AdminError;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 5;
pub const DEFAULT_TTL_SECONDS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Transient notifications shown at the edge of the screen.
#[derive(Debug)]
pub struct NotificationCenter {
    toasts: VecDeque<Toast>,
    next_id: u64,
    capacity: usize,
    ttl: TimeDelta,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 0,
            capacity: capacity.max(1),
            ttl: TimeDelta::seconds(DEFAULT_TTL_SECONDS),
        }
    }

    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn push(&mut self, level: ToastLevel, title: &str, message: &str) -> u64 {
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id: self.next_id,
            level,
            title: title.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        });
        while self.toasts.len() > self.capacity {
            self.toasts.pop_front();
        }
        self.next_id
    }

    pub fn success(&mut self, message: &str) -> u64 {
        self.push(ToastLevel::Success, "Success", message)
    }

    pub fn info(&mut self, message: &str) -> u64 {
        self.push(ToastLevel::Info, "Info", message)
    }

    pub fn error(&mut self, message: &str) -> u64 {
        self.push(ToastLevel::Error, "Error", message)
    }

    /// Error toast for a failed request; falls back to the generic message
    /// when the server gave none.
    pub fn from_error(&mut self, err: &AdminError) -> u64 {
        tracing::error!("Surfacing error to user: {}", err);
        self.error(&err.user_friendly_message())
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drops toasts older than the TTL and returns how many went.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts.retain(|t| now - t.created_at < ttl);
        before - self.toasts.len()
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
