//! Volatile backend: plain maps behind one lock, ids from monotonic sequences.

use crate::error::StoreError;
use crate::model::{
    BlogSubscriber, Contact, NewBlogSubscriber, NewContact, NewProjectStats, NewUser, ProjectStats, User,
};
use crate::store::{email_taken, username_taken, BackendKind, Storage};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Sequences {
    user: i64,
    contact: i64,
    subscriber: i64,
    stats: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Default)]
struct Tables {
    seq: Sequences,
    users: BTreeMap<i64, User>,
    /// Insertion order; ids ascend with it.
    contacts: Vec<Contact>,
    subscribers: Vec<BlogSubscriber>,
    stats: HashMap<String, ProjectStats>,
}

/// In-process store used when no durable backend is configured or reachable.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl Storage for MemoryStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        let mut t = self.write()?;
        if t.users.values().any(|u| u.username == data.username) {
            return Err(username_taken(&data.username));
        }
        let user = User {
            id: next(&mut t.seq.user),
            username: data.username,
            password: data.password,
            created_at: Utc::now(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn create_contact(&self, data: NewContact) -> Result<Contact, StoreError> {
        let mut t = self.write()?;
        let contact = Contact {
            id: next(&mut t.seq.contact),
            name: data.name,
            email: data.email,
            subject: data.subject,
            message: data.message,
            created_at: Utc::now(),
        };
        t.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn get_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.read()?.contacts.iter().rev().cloned().collect())
    }

    async fn create_blog_subscriber(&self, data: NewBlogSubscriber) -> Result<BlogSubscriber, StoreError> {
        let mut t = self.write()?;
        if t.subscribers.iter().any(|s| s.email == data.email) {
            return Err(email_taken(&data.email));
        }
        let subscriber = BlogSubscriber {
            id: next(&mut t.seq.subscriber),
            email: data.email,
            created_at: Utc::now(),
        };
        t.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn get_blog_subscribers(&self) -> Result<Vec<BlogSubscriber>, StoreError> {
        Ok(self.read()?.subscribers.iter().rev().cloned().collect())
    }

    async fn get_project_stats(&self, project_id: &str) -> Result<Option<ProjectStats>, StoreError> {
        Ok(self.read()?.stats.get(project_id).cloned())
    }

    async fn update_project_stats(&self, data: NewProjectStats) -> Result<ProjectStats, StoreError> {
        let mut guard = self.write()?;
        let t = &mut *guard;
        let now = Utc::now();
        let stats = match t.stats.get_mut(&data.project_id) {
            Some(existing) => {
                existing.stars = data.stars;
                existing.forks = data.forks;
                existing.watchers = data.watchers;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let created = ProjectStats {
                    id: next(&mut t.seq.stats),
                    project_id: data.project_id.clone(),
                    stars: data.stars,
                    forks: data.forks,
                    watchers: data.watchers,
                    created_at: now,
                    updated_at: now,
                };
                t.stats.insert(data.project_id, created.clone());
                created
            }
        };
        Ok(stats)
    }

    async fn get_all_project_stats(&self) -> Result<Vec<ProjectStats>, StoreError> {
        let mut all: Vec<ProjectStats> = self.read()?.stats.values().cloned().collect();
        // Byte order, matching COLLATE "C" in the durable backends.
        all.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        Ok(all)
    }
}
