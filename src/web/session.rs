use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

use tokio::{sync::Mutex, task::JoinHandle, time::Duration};
use tower_sessions::{
    ExpiredDeletion, Session, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store,
};
use tracing::error;

use crate::web::{USER, csrf::gen_csrf, error::Error};

#[derive(Default, Clone, Debug)]
pub struct MemorySessionStore(Arc<Mutex<HashMap<Id, Record>>>);

#[async_trait()]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut sessions = self.0.lock().await;
        while sessions.contains_key(&record.id) {
            record.id = Id::default();
        }
        sessions.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.0.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .0
            .lock()
            .await
            .get(session_id)
            .filter(|record| record.expiry_date > now)
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.0.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait()]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        tracing::debug!("deleting expired sessions");
        let now = OffsetDateTime::now_utc();
        self.0
            .lock()
            .await
            .retain(|_id, record| record.expiry_date >= now);
        Ok(())
    }
}

pub const SESSION_PURGE_PERIOD: Duration = Duration::from_secs(60);

/// Runs the store's expired-session deletion every `period` in the background
pub fn spawn_session_purge(store: MemorySessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            error!("Error deleting expired sessions: {e}");
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

/// The signed-in user, persisted in the session under the `user` key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub email: String,
}

/// Session data handed to page containers for the duration of one request
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    user: Option<SessionUser>,
    csrf_token: String,
}

impl SessionContext {
    pub fn new(user: Option<SessionUser>) -> Self {
        Self {
            user,
            csrf_token: String::new(),
        }
    }

    pub fn with_csrf_token(mut self, csrf_token: String) -> Self {
        self.csrf_token = csrf_token;
        self
    }

    /// Token the pages embed in their forms
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn is_employee(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.user_type == UserType::Employee)
    }

    pub fn require_employee(&self) -> Result<&SessionUser, Error> {
        self.user
            .as_ref()
            .filter(|u| u.user_type == UserType::Employee)
            .ok_or(Error::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| {
                error!("Session layer missing: {msg}");
                Error::Internal
            })?;
        let user = session.get::<SessionUser>(USER).await.map_err(|e| {
            error!("Error reading user from session: {e}");
            Error::Internal
        })?;
        let csrf_token = gen_csrf(&session).await.map_err(|e| {
            error!("Error creating csrf token: {e}");
            Error::Internal
        })?;
        Ok(Self::new(user).with_csrf_token(csrf_token))
    }
}

#[cfg(test)]
mod tests {
    use tower_sessions::cookie::time::Duration;

    use super::*;

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date,
        }
    }

    #[tokio::test]
    async fn expired_sessions_are_hidden_and_purged() {
        let store = MemorySessionStore::default();
        let mut live = record(OffsetDateTime::now_utc() + Duration::minutes(5));
        let mut stale = record(OffsetDateTime::now_utc() - Duration::minutes(5));
        store.create(&mut live).await.expect("create");
        store.create(&mut stale).await.expect("create");

        assert!(store.load(&live.id).await.expect("load").is_some());
        assert!(store.load(&stale.id).await.expect("load").is_none());

        store.delete_expired().await.expect("purge");
        assert_eq!(store.0.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn purge_task_removes_stale_sessions() {
        let store = MemorySessionStore::default();
        let mut stale = record(OffsetDateTime::now_utc() - Duration::minutes(5));
        store.create(&mut stale).await.expect("create");

        let task = spawn_session_purge(store.clone(), std::time::Duration::from_millis(10));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        task.abort();

        assert!(store.0.lock().await.is_empty());
    }

    #[test]
    fn session_user_uses_type_key() {
        let user = SessionUser {
            user_type: UserType::Employee,
            email: "a@a".into(),
        };
        let json = serde_json::to_value(&user).expect("json");
        assert_eq!(json["type"], "Employee");
    }

    #[test]
    fn only_employees_pass() {
        let admin = SessionContext::new(Some(SessionUser {
            user_type: UserType::Admin,
            email: "admin@test.tld".into(),
        }));
        assert!(!admin.is_employee());
        assert!(matches!(admin.require_employee(), Err(Error::Unauthorized)));
        assert!(SessionContext::default().require_employee().is_err());
    }
}
