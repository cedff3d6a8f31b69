use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use evolance_portal::api::{ApiClient, PortalApi};
use evolance_portal::content::{self, ContentError, PostDraft};
use evolance_portal::models::PostType;
use evolance_portal::router::{View, ViewRouter};
use evolance_portal::session::{BearerToken, SessionManager};
use evolance_portal::storage::MemoryTokenStore;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const TOKEN: &str = "token-abc";

struct Stub {
    posts: Vec<Value>,
    hits: AtomicUsize,
    extra_likes: AtomicU64,
    slow: AtomicBool,
}

impl Stub {
    fn new(posts: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            posts,
            hits: AtomicUsize::new(0),
            extra_likes: AtomicU64::new(0),
            slow: AtomicBool::new(false),
        })
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn user_json() -> Value {
    json!({
        "id": "user-1",
        "email": "ada@example.com",
        "username": "ada",
        "full_name": "Ada Lovelace",
        "is_active": true,
        "is_admin": false,
        "created_at": "2024-05-01T10:00:00.123456",
        "avatar_url": null,
        "bio": null
    })
}

fn post_json(id: &str, post_type: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "content": "Body",
        "author_id": "user-1",
        "author_name": "Ada Lovelace",
        "post_type": post_type,
        "tags": ["ai"],
        "created_at": "2024-05-01T10:00:00.123456",
        "updated_at": "2024-05-01T10:00:00.123456",
        "likes": 0,
        "views": 3,
        "is_published": true,
        "reading_time": 1,
        "summary": null
    })
}

fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn login(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    stub.hit();
    if body["email"] == "ada@example.com" && body["password"] == "secret" {
        Ok(Json(json!({ "access_token": TOKEN, "token_type": "bearer", "user": user_json() })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn register(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Json<Value> {
    stub.hit();
    let mut user = user_json();
    user["username"] = body["username"].clone();
    user["full_name"] = body["full_name"].clone();
    Json(json!({ "access_token": TOKEN, "token_type": "bearer", "user": user }))
}

async fn me(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    stub.hit();
    authorize(&headers)?;
    Ok(Json(user_json()))
}

async fn list_posts(
    State(stub): State<Arc<Stub>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    stub.hit();
    if stub.slow.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    let extra = stub.extra_likes.load(Ordering::SeqCst);
    let posts: Vec<Value> = stub
        .posts
        .iter()
        .filter(|p| params.get("post_type").map_or(true, |t| p["post_type"] == t.as_str()))
        .map(|p| {
            let mut p = p.clone();
            if p["id"] == "p1" {
                p["likes"] = json!(extra);
            }
            p
        })
        .collect();
    Json(Value::Array(posts))
}

async fn like(
    State(stub): State<Arc<Stub>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    stub.hit();
    authorize(&headers)?;
    if id == "p1" {
        stub.extra_likes.fetch_add(1, Ordering::SeqCst);
    }
    Ok(Json(json!({ "liked": true })))
}

async fn create_post(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    stub.hit();
    authorize(&headers)?;
    let mut post = post_json("created", body["post_type"].as_str().unwrap_or("blog"));
    post["title"] = body["title"].clone();
    post["content"] = body["content"].clone();
    post["tags"] = body["tags"].clone();
    post["summary"] = body.get("summary").cloned().unwrap_or(Value::Null);
    Ok(Json(post))
}

async fn stats(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    stub.hit();
    authorize(&headers)?;
    Ok(Json(json!({ "posts": 2, "likes": 5, "views": 40 })))
}

async fn comments(State(stub): State<Arc<Stub>>, Path(id): Path<String>) -> Json<Value> {
    stub.hit();
    Json(json!([{
        "id": "c1",
        "post_id": id,
        "user_id": "user-1",
        "user_name": "Ada Lovelace",
        "content": "Fascinating",
        "created_at": "2024-05-02T09:00:00",
        "likes": 0
    }]))
}

/// Serves the stub on an ephemeral port from its own runtime thread.
fn serve(stub: Arc<Stub>) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    listener.set_nonblocking(true).expect("nonblocking");

    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/me", get(me))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/:id/like", post(like))
        .route("/api/posts/:id/comments", get(comments))
        .route("/api/dashboard/stats", get(stats))
        .with_state(stub);

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve stub");
        });
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(1)).expect("client")
}

fn default_posts() -> Vec<Value> {
    vec![post_json("p1", "research"), post_json("p2", "blog")]
}

#[test]
fn login_then_browse_without_reauthenticating() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub.clone()));
    let store = MemoryTokenStore::default();
    let mut session = SessionManager::new(Box::new(store.clone()));
    let mut router = ViewRouter::new();
    router.navigate(View::Login, session.is_authenticated());

    assert!(session.login(&api, "ada@example.com", "secret"));
    router.navigate(View::Home, session.is_authenticated());

    assert_eq!(router.current(), View::Home);
    assert_eq!(session.user().map(|u| u.display_name()), Some("Ada Lovelace"));
    assert_eq!(store.get().as_deref(), Some(TOKEN));

    let posts = content::list_posts(&api, None).expect("listing");
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].created_at, "2024-05-01T10:00:00.123456");
}

#[test]
fn wrong_password_leaves_session_logged_out() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));
    let mut session = SessionManager::new(Box::new(MemoryTokenStore::default()));

    assert!(!session.login(&api, "ada@example.com", "nope"));
    assert!(!session.is_authenticated());
    assert_eq!(session.state().token(), None);
}

#[test]
fn register_establishes_session() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));
    let mut session = SessionManager::new(Box::new(MemoryTokenStore::default()));
    let registration = evolance_portal::models::Registration {
        email: "grace@example.com".into(),
        password: "secret".into(),
        username: "grace".into(),
        full_name: "Grace Hopper".into(),
        bio: Some("Compilers".into()),
    };

    assert!(session.register(&api, &registration));
    assert_eq!(session.user().map(|u| u.username.as_str()), Some("grace"));
}

#[test]
fn restore_accepts_valid_and_drops_invalid_tokens() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));

    let mut valid = SessionManager::new(Box::new(MemoryTokenStore::with_token(TOKEN)));
    assert!(valid.restore_session(&api));
    assert!(valid.is_authenticated());

    let stale_store = MemoryTokenStore::with_token("expired");
    let mut stale = SessionManager::new(Box::new(stale_store.clone()));
    assert!(!stale.restore_session(&api));
    assert_eq!(stale.state().token(), None);
    assert_eq!(stale.state().user(), None);
    assert_eq!(stale_store.get(), None);
}

#[test]
fn listing_filters_by_post_type() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));

    let research = api.list_posts(Some(PostType::Research)).expect("research");
    assert_eq!(research.len(), 1);
    assert_eq!(research[0].post_type, PostType::Research);

    let blogs = api.list_posts(Some(PostType::Blog)).expect("blogs");
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].id, "p2");
}

#[test]
fn empty_research_listing_is_not_an_error() {
    let stub = Stub::new(vec![post_json("p2", "blog")]);
    let api = client(&serve(stub));

    let posts = content::list_posts(&api, Some(PostType::Research)).expect("listing");
    assert!(posts.is_empty());
}

#[test]
fn unknown_post_type_does_not_hide_the_feed() {
    let stub = Stub::new(vec![post_json("p1", "research"), post_json("x1", "podcast")]);
    let api = client(&serve(stub));

    let posts = content::list_posts(&api, None).expect("listing");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "p1");
}

#[test]
fn refetch_after_like_shows_server_count() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));
    let token = BearerToken::new(TOKEN);

    let response = content::like_post(&api, Some(&token), "p1").expect("like");
    assert_eq!(response.liked, Some(true));

    let posts = content::list_posts(&api, Some(PostType::Research)).expect("refetch");
    assert_eq!(posts[0].likes, 1);
}

#[test]
fn like_without_session_never_reaches_server() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub.clone()));

    let err = content::like_post(&api, None, "p1").unwrap_err();
    assert!(matches!(err, ContentError::LoginRequired(_)));
    assert_eq!(stub.hits(), 0);
}

#[test]
fn like_with_rejected_token_fails() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));

    let result = api.like_post(&BearerToken::new("forged"), "p1");
    assert!(result.is_err());
}

#[test]
fn create_post_sends_parsed_tags() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub.clone()));
    let token = BearerToken::new(TOKEN);
    let draft = PostDraft {
        title: "Consciousness".into(),
        content: "A long essay".into(),
        post_type: PostType::Research,
        summary: "Short".into(),
        tags: "ai, psychology , , spirituality".into(),
    };

    let post = content::create_post(&api, Some(&token), &draft).expect("create");
    assert_eq!(post.title, "Consciousness");
    assert_eq!(post.post_type, PostType::Research);
    assert_eq!(post.tags, vec!["ai", "psychology", "spirituality"]);
    assert_eq!(post.summary.as_deref(), Some("Short"));

    let hits = stub.hits();
    let mut empty = draft.clone();
    empty.title.clear();
    assert!(content::create_post(&api, Some(&token), &empty).is_err());
    assert_eq!(stub.hits(), hits);
}

#[test]
fn dashboard_stats_and_comments() {
    let stub = Stub::new(default_posts());
    let api = client(&serve(stub));
    let token = BearerToken::new(TOKEN);

    let stats = content::dashboard_stats(&api, Some(&token)).expect("stats");
    assert_eq!((stats.posts, stats.likes, stats.views), (2, 5, 40));

    let comments = content::list_comments(&api, "p1").expect("comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].post_id, "p1");
}

#[test]
fn slow_server_times_out_into_failure() {
    let stub = Stub::new(default_posts());
    stub.slow.store(true, Ordering::SeqCst);
    let api = client(&serve(stub));

    let err = content::list_posts(&api, None).unwrap_err();
    assert!(matches!(err, ContentError::Request(_)));
}

#[test]
fn unreachable_backend_is_a_plain_failure() {
    let api = client("http://127.0.0.1:9");
    let mut session = SessionManager::new(Box::new(MemoryTokenStore::default()));
    assert!(!session.login(&api, "ada@example.com", "secret"));
    assert!(api.list_posts(None).is_err());
}
