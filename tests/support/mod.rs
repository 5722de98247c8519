#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use portfolio_api::model::{NewBlogSubscriber, NewContact, NewProjectStats, NewUser};
use portfolio_api::{app, AppState, MemoryStore, Settings, Storage, StoreError};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique suffix for temp files and schemas.
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    format!("{}_{}", std::process::id(), nanos)
}

/// Settings that never touch the network or a real resume file.
pub fn test_settings() -> Settings {
    Settings {
        github_api_url: "http://127.0.0.1:9".into(),
        resume_path: std::env::temp_dir().join(format!("missing-resume-{}.pdf", unique_suffix())),
        ..Settings::default()
    }
}

pub fn router(settings: Settings) -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), settings).expect("failed to build state");
    app(state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("failed to build request")
}

pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

fn contact(n: u32) -> NewContact {
    NewContact {
        name: format!("Visitor {}", n),
        email: format!("visitor{}@example.com", n),
        subject: "Hello".into(),
        message: format!("Message number {}", n),
    }
}

/// Behaviour every backend must share. Expects an empty store.
pub async fn storage_contract(store: &dyn Storage) {
    contacts_are_listed_newest_first(store).await;
    subscriber_email_is_unique(store).await;
    usernames_are_unique(store).await;
    project_stats_upsert(store).await;
}

async fn contacts_are_listed_newest_first(store: &dyn Storage) {
    assert!(store.get_contacts().await.unwrap().is_empty());
    let first = store.create_contact(contact(1)).await.unwrap();
    let second = store.create_contact(contact(2)).await.unwrap();
    assert!(first.id > 0);
    assert_ne!(first.id, second.id);
    assert_eq!(second.name, "Visitor 2");

    let listed = store.get_contacts().await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(listed[1], first);
}

async fn subscriber_email_is_unique(store: &dyn Storage) {
    let email = "reader@example.com".to_string();
    let sub = store
        .create_blog_subscriber(NewBlogSubscriber { email: email.clone() })
        .await
        .unwrap();
    assert_eq!(sub.email, email);

    let err = store
        .create_blog_subscriber(NewBlogSubscriber { email: email.clone() })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { field: "email", .. }), "got {:?}", err);

    let other = store
        .create_blog_subscriber(NewBlogSubscriber { email: "second@example.com".into() })
        .await
        .unwrap();
    let listed = store.get_blog_subscribers().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, other.id);
    assert_eq!(listed[1].id, sub.id);
}

async fn usernames_are_unique(store: &dyn Storage) {
    let user = store
        .create_user(NewUser { username: "ada".into(), password: "hash".into() })
        .await
        .unwrap();
    assert_eq!(store.get_user(user.id).await.unwrap().as_ref(), Some(&user));
    assert_eq!(store.get_user_by_username("ada").await.unwrap().map(|u| u.id), Some(user.id));
    assert!(store.get_user_by_username("grace").await.unwrap().is_none());
    assert!(store.get_user(user.id + 1000).await.unwrap().is_none());

    let err = store
        .create_user(NewUser { username: "ada".into(), password: "other".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)), "got {:?}", err);
}

async fn project_stats_upsert(store: &dyn Storage) {
    assert!(store.get_project_stats("music-webapp").await.unwrap().is_none());

    let created = store
        .update_project_stats(NewProjectStats { project_id: "music-webapp".into(), stars: 3, forks: 1, watchers: 5 })
        .await
        .unwrap();
    let updated = store
        .update_project_stats(NewProjectStats { project_id: "music-webapp".into(), stars: 9, forks: 2, watchers: 7 })
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!((updated.stars, updated.forks, updated.watchers), (9, 2, 7));

    let fetched = store.get_project_stats("music-webapp").await.unwrap().unwrap();
    assert_eq!(fetched.stars, 9);

    for project_id in ["face-recognition-attendance", "Zeta", "alpha"] {
        store
            .update_project_stats(NewProjectStats { project_id: project_id.into(), stars: 1, forks: 0, watchers: 1 })
            .await
            .unwrap();
    }
    let all: Vec<String> = store
        .get_all_project_stats()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.project_id)
        .collect();
    // Byte order on every backend: upper case sorts before lower case.
    assert_eq!(all, vec!["Zeta", "alpha", "face-recognition-attendance", "music-webapp"]);
}
