// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory session store.
//!
//! Holds every approved session for the lifetime of the process. Each bridge
//! instance owns its own store; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Session;

/// Session store shared between the event loop and the control API.
pub type SharedSessionStore = Arc<RwLock<SessionStore>>;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSessionStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Insert a session under its topic, returning any session it replaced.
    pub fn put(&mut self, session: Session) -> Option<Session> {
        self.sessions.insert(session.topic.clone(), session)
    }

    pub fn get(&self, topic: &str) -> Option<&Session> {
        self.sessions.get(topic)
    }

    /// Remove a session. Removing an absent topic is a no-op.
    pub fn remove(&mut self, topic: &str) -> Option<Session> {
        self.sessions.remove(topic)
    }

    /// All sessions, oldest approval first.
    pub fn list(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.topic.cmp(&b.topic))
        });
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
