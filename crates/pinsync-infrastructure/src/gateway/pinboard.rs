//! Pinboard endpoints over a bounded transport.

use std::sync::Arc;

use async_trait::async_trait;
use pinsync_core::bookmark::{AddPost, PinboardApi, Post};
use pinsync_core::config::SyncConfig;
use pinsync_core::error::{Result, SyncError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Semaphore;

use super::transport::{HttpResponse, HttpTransport, ReqwestTransport};

const DEFAULT_FORMAT: &str = "json";
const RESULT_DONE: &str = "done";

const AUTH_TOKEN_PATH: &str = "/user/auth_token";
const POSTS_GET_PATH: &str = "/posts/get";
const POSTS_SUGGEST_PATH: &str = "/posts/suggest";
const POSTS_ADD_PATH: &str = "/posts/add";

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    posts: Vec<Post>,
}

/// Client for the Pinboard v1 API.
///
/// At most `max_concurrent` requests are on the wire at once. Further calls
/// wait for a free slot in arrival order (tokio's semaphore is fair). A slot
/// is released when its call returns, whatever the outcome.
///
/// Calls are never retried here.
#[derive(Clone)]
pub struct PinboardGateway {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    limiter: Arc<Semaphore>,
}

impl PinboardGateway {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Builds a gateway over `reqwest` from configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::new(
            Arc::new(transport),
            config.api_base_url.clone(),
            config.max_concurrent_requests,
        ))
    }

    /// Slots currently free.
    pub fn available_slots(&self) -> usize {
        self.limiter.available_permits()
    }

    /// Calls `path` and returns only the HTTP status.
    ///
    /// Meant for endpoints answered in a non-JSON `format`. A 401 still
    /// fails with [`SyncError::Auth`].
    pub async fn call_status(&self, path: &str, params: &[(&str, &str)]) -> Result<u16> {
        let response = self.call(path, params).await?;
        Ok(response.status)
    }

    /// Calls `path` and decodes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Auth`] on 401
    /// - [`SyncError::Remote`] when the body carries a `result_code` other
    ///   than `done`, or the status is not a success
    /// - [`SyncError::Serialization`] when the body does not decode as `T`
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.call(path, params).await?;
        let parsed = serde_json::from_str::<Value>(&response.body);

        if let Ok(body) = &parsed
            && let Some(code) = body.get("result_code")
        {
            let code = code
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string());
            if code != RESULT_DONE {
                return Err(SyncError::remote(path, code));
            }
        }

        if !response.is_success() {
            return Err(SyncError::remote(path, format!("HTTP {}", response.status)));
        }

        Ok(serde_json::from_value(parsed?)?)
    }

    async fn call(&self, path: &str, params: &[(&str, &str)]) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url, path);
        let query = build_query(params);

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| SyncError::transport("request limiter closed"))?;

        tracing::debug!("[PinboardGateway] GET {}", path);
        let response = self.transport.get(&url, &query).await;

        match &response {
            Ok(r) => tracing::debug!("[PinboardGateway] {} -> {}", path, r.status),
            Err(e) => tracing::debug!("[PinboardGateway] {} failed: {}", path, e),
        }

        let response = response?;
        if response.status == 401 {
            return Err(SyncError::auth(path));
        }
        Ok(response)
    }
}

/// Defaults to `format=json`; caller parameters override defaults.
fn build_query(params: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut query = vec![("format".to_string(), DEFAULT_FORMAT.to_string())];
    for (key, value) in params {
        match query.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => query.push((key.to_string(), value.to_string())),
        }
    }
    query
}

#[async_trait]
impl PinboardApi for PinboardGateway {
    async fn auth_token_valid(&self, token: &str) -> Result<bool> {
        let status = self
            .call_status(AUTH_TOKEN_PATH, &[("auth_token", token), ("format", "xml")])
            .await?;
        Ok((200..300).contains(&status))
    }

    async fn posts_get(&self, token: &str, url: &str) -> Result<Vec<Post>> {
        let response: PostsResponse = self
            .call_json(POSTS_GET_PATH, &[("auth_token", token), ("url", url)])
            .await?;
        Ok(response.posts)
    }

    async fn posts_suggest(&self, token: &str, url: &str) -> Result<Value> {
        self.call_json(POSTS_SUGGEST_PATH, &[("auth_token", token), ("url", url)])
            .await
    }

    async fn posts_add(&self, token: &str, post: &AddPost) -> Result<()> {
        let replace = if post.replace { "yes" } else { "no" };
        let _: Value = self
            .call_json(
                POSTS_ADD_PATH,
                &[
                    ("auth_token", token),
                    ("url", &post.url),
                    ("description", &post.description),
                    ("tags", &post.tags),
                    ("replace", replace),
                ],
            )
            .await?;
        tracing::info!("[PinboardGateway] Stored bookmark for {}", post.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    const BASE: &str = "https://api.test/v1";

    type Recorded = (String, Vec<(String, String)>);

    /// Scripted transport keyed by path.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<HashMap<String, Result<HttpResponse>>>,
        requests: Mutex<Vec<Recorded>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Option<Duration>,
        /// Calls to these paths wait for their gate before answering
        gates: HashMap<String, Arc<Notify>>,
    }

    impl MockTransport {
        fn respond(self, path: &str, response: Result<HttpResponse>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(path.to_string(), response);
            self
        }

        fn gate(mut self, path: &str) -> (Self, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            self.gates.insert(path.to_string(), Arc::clone(&gate));
            (self, gate)
        }

        fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse> {
            let path = url.strip_prefix(BASE).unwrap_or(url).to_string();
            self.requests
                .lock()
                .unwrap()
                .push((path.clone(), query.to_vec()));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(gate) = self.gates.get(&path) {
                gate.notified().await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(&path)
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(200, r#"{"result_code":"done"}"#)))
        }
    }

    fn gateway(transport: Arc<MockTransport>, slots: usize) -> PinboardGateway {
        PinboardGateway::new(transport, BASE, slots)
    }

    fn query_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_build_query_defaults_and_overrides() {
        let query = build_query(&[("url", "https://a.example")]);
        assert_eq!(query_value(&query, "format"), Some("json"));
        assert_eq!(query_value(&query, "url"), Some("https://a.example"));

        let query = build_query(&[("format", "xml")]);
        assert_eq!(query.len(), 1);
        assert_eq!(query_value(&query, "format"), Some("xml"));
    }

    #[tokio::test]
    async fn test_posts_get_parses_posts() {
        let transport = Arc::new(MockTransport::default().respond(
            POSTS_GET_PATH,
            Ok(HttpResponse::new(
                200,
                r#"{"date":"2020-01-01T00:00:00Z","user":"u","posts":[
                    {"href":"https://a.example","description":"A","tags":"x y","time":"2020-01-01T00:00:00Z"}
                ]}"#,
            )),
        ));
        let gateway = gateway(transport.clone(), 2);

        let posts = gateway.posts_get("u:1", "https://a.example").await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].tags, "x y");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, POSTS_GET_PATH);
        assert_eq!(query_value(&requests[0].1, "format"), Some("json"));
        assert_eq!(query_value(&requests[0].1, "auth_token"), Some("u:1"));
    }

    #[tokio::test]
    async fn test_auth_check_uses_xml_and_status_only() {
        let transport = Arc::new(
            MockTransport::default()
                .respond(AUTH_TOKEN_PATH, Ok(HttpResponse::new(200, "<result>abc</result>"))),
        );
        let gateway = gateway(transport.clone(), 2);

        assert!(gateway.auth_token_valid("u:1").await.unwrap());
        assert_eq!(query_value(&transport.requests()[0].1, "format"), Some("xml"));
    }

    #[tokio::test]
    async fn test_auth_check_non_success_is_invalid() {
        let transport = Arc::new(
            MockTransport::default()
                .respond(AUTH_TOKEN_PATH, Ok(HttpResponse::new(500, "oops"))),
        );
        assert!(!gateway(transport, 2).auth_token_valid("u:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_401_is_auth_error_for_every_format() {
        let transport = Arc::new(
            MockTransport::default()
                .respond(AUTH_TOKEN_PATH, Ok(HttpResponse::new(401, "")))
                .respond(POSTS_GET_PATH, Ok(HttpResponse::new(401, "API requires authentication"))),
        );
        let gateway = gateway(transport, 2);

        let err = gateway.auth_token_valid("bad").await.unwrap_err();
        assert_eq!(err, SyncError::auth(AUTH_TOKEN_PATH));

        let err = gateway.posts_get("bad", "https://a.example").await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_result_code_other_than_done_is_remote_error() {
        let transport = Arc::new(MockTransport::default().respond(
            POSTS_ADD_PATH,
            Ok(HttpResponse::new(200, r#"{"result_code":"item already exists"}"#)),
        ));
        let post = AddPost {
            url: "https://a.example".to_string(),
            description: "A".to_string(),
            tags: "x".to_string(),
            replace: false,
        };

        let err = gateway(transport, 2).posts_add("u:1", &post).await.unwrap_err();
        assert_eq!(err, SyncError::remote(POSTS_ADD_PATH, "item already exists"));
    }

    #[tokio::test]
    async fn test_posts_add_sends_all_fields() {
        let transport = Arc::new(MockTransport::default());
        let post = AddPost {
            url: "https://a.example".to_string(),
            description: "A title".to_string(),
            tags: "rust web".to_string(),
            replace: true,
        };

        gateway(transport.clone(), 2).posts_add("u:1", &post).await.unwrap();

        let (path, query) = &transport.requests()[0];
        assert_eq!(path, POSTS_ADD_PATH);
        assert_eq!(query_value(query, "description"), Some("A title"));
        assert_eq!(query_value(query, "tags"), Some("rust web"));
        assert_eq!(query_value(query, "replace"), Some("yes"));
    }

    #[tokio::test]
    async fn test_non_success_status_without_code_is_remote_error() {
        let transport = Arc::new(
            MockTransport::default()
                .respond(POSTS_SUGGEST_PATH, Ok(HttpResponse::new(429, "Too Many Requests"))),
        );
        let err = gateway(transport, 2)
            .posts_suggest("u:1", "https://a.example")
            .await
            .unwrap_err();
        assert_eq!(err, SyncError::remote(POSTS_SUGGEST_PATH, "HTTP 429"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_serialization_error() {
        let transport = Arc::new(
            MockTransport::default()
                .respond(POSTS_GET_PATH, Ok(HttpResponse::new(200, r#"{"posts": 3}"#))),
        );
        let err = gateway(transport, 2)
            .posts_get("u:1", "https://a.example")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates_unchanged() {
        let transport = Arc::new(MockTransport::default().respond(
            POSTS_GET_PATH,
            Err(SyncError::transport("connection reset")),
        ));
        let err = gateway(transport, 2)
            .posts_get("u:1", "https://a.example")
            .await
            .unwrap_err();
        assert_eq!(err, SyncError::transport("connection reset"));
    }

    #[tokio::test]
    async fn test_limiter_never_exceeds_ceiling() {
        let transport = Arc::new(MockTransport {
            delay: Some(Duration::from_millis(20)),
            ..MockTransport::default()
        });
        let gateway = gateway(transport.clone(), 2);

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let gateway = gateway.clone();
                tokio::spawn(async move {
                    gateway
                        .posts_get("u:1", &format!("https://{}.example", i))
                        .await
                })
            })
            .collect();
        for handle in handles {
            let _ = handle.await.unwrap();
        }

        assert_eq!(transport.requests().len(), 6);
        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 2);
        assert_eq!(gateway.available_slots(), 2);
    }

    #[tokio::test]
    async fn test_suggest_passes_any_json_through() {
        let transport = Arc::new(MockTransport::default().respond(
            POSTS_SUGGEST_PATH,
            Ok(HttpResponse::new(200, r#"{"popular": [], "recommended": []}"#)),
        ));

        let body = gateway(transport, 2)
            .posts_suggest("u:1", "https://a.example")
            .await
            .unwrap();

        assert!(body.is_object());
    }

    fn add_post(url: &str) -> AddPost {
        AddPost {
            url: url.to_string(),
            description: String::new(),
            tags: String::new(),
            replace: false,
        }
    }

    async fn yield_until(condition: impl Fn() -> bool) {
        while !condition() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_failed_call_releases_its_slot() {
        let (transport, failing_gate) = MockTransport::default()
            .respond(POSTS_GET_PATH, Err(SyncError::transport("boom")))
            .gate(POSTS_GET_PATH);
        let (transport, slow_gate) = transport.gate(POSTS_SUGGEST_PATH);
        let transport = Arc::new(transport);
        let gateway = gateway(transport.clone(), 2);
        let third_post = add_post("https://c.example");

        // Two calls fill both slots; the third queues behind them.
        let (failing, slow, third, ()) = tokio::join!(
            gateway.posts_get("u:1", "https://a.example"),
            gateway.posts_suggest("u:1", "https://b.example"),
            gateway.posts_add("u:1", &third_post),
            async {
                yield_until(|| transport.in_flight.load(Ordering::SeqCst) == 2).await;
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
                assert_eq!(transport.requests().len(), 2);
                assert_eq!(gateway.available_slots(), 0);

                failing_gate.notify_one();
                yield_until(|| transport.requests().len() == 3).await;
                // Admitted while the slow call still holds its slot
                assert_eq!(transport.in_flight.load(Ordering::SeqCst), 1);

                slow_gate.notify_one();
            },
        );

        assert!(failing.unwrap_err().is_transport());
        assert!(slow.is_ok());
        assert!(third.is_ok());
        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 2);
        assert_eq!(gateway.available_slots(), 2);
    }

    #[tokio::test]
    async fn test_waiting_calls_are_admitted_in_arrival_order() {
        let (transport, gate) = MockTransport::default().gate(POSTS_SUGGEST_PATH);
        let transport = Arc::new(transport);
        let gateway = gateway(transport.clone(), 1);

        let (first, second, third, fourth, ()) = tokio::join!(
            gateway.posts_suggest("u:1", "https://0.example"),
            gateway.posts_get("u:1", "https://1.example"),
            gateway.posts_get("u:1", "https://2.example"),
            gateway.posts_get("u:1", "https://3.example"),
            async {
                yield_until(|| transport.in_flight.load(Ordering::SeqCst) == 1).await;
                gate.notify_one();
            },
        );

        assert!(first.is_ok() && second.is_ok() && third.is_ok() && fourth.is_ok());
        let urls: Vec<_> = transport
            .requests()
            .iter()
            .filter_map(|(_, query)| query_value(query, "url").map(str::to_string))
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://0.example",
                "https://1.example",
                "https://2.example",
                "https://3.example",
            ]
        );
    }
}
