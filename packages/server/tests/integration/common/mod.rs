use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, redirect};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::Value;

use tubeblog_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, GenerationConfig, ServerConfig,
    TranscriptConfig,
};
use tubeblog_server::entity::{article, user};
use tubeblog_server::repository::SeaOrmArticles;
use tubeblog_server::state::AppState;
use tubeblog_server::summarizer::{SummarizeError, Summarizer};
use tubeblog_server::youtube::{Fragment, Transcript, TranscriptError, TranscriptFetcher};

pub mod routes {
    pub const SIGNUP: &str = "/api/v1/auth/signup";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const ME: &str = "/api/v1/auth/me";
    pub const GENERATE: &str = "/api/v1/generate";
    pub const BLOGS: &str = "/api/v1/blogs";

    pub fn blog(id: i32) -> String {
        format!("/api/v1/blogs/{id}")
    }
}

pub const ARTICLE: &str = "# Testing Made Simple\n\n## Why it matters\nTests catch bugs.\n\n## Conclusion\nWrite tests.";

/// What the fake transcript service answers.
#[derive(Clone)]
pub enum TranscriptReply {
    Lines(Vec<&'static str>),
    Disabled,
    NotFound,
}

/// What the fake language model answers.
#[derive(Clone)]
pub enum SummaryReply {
    Text(String),
    Empty,
    ApiError,
}

pub struct FakeTranscripts {
    reply: TranscriptReply,
    pub requests: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl TranscriptFetcher for FakeTranscripts {
    async fn fetch(&self, video_id: &str, language: &str) -> Result<Transcript, TranscriptError> {
        self.requests
            .lock()
            .unwrap()
            .push((video_id.to_string(), language.to_string()));

        match &self.reply {
            TranscriptReply::Lines(lines) => Ok(Transcript {
                video_id: video_id.to_string(),
                language: language.to_string(),
                fragments: lines
                    .iter()
                    .enumerate()
                    .map(|(i, text)| Fragment {
                        text: text.to_string(),
                        start: i as f64,
                        duration: 1.0,
                    })
                    .collect(),
            }),
            TranscriptReply::Disabled => Err(TranscriptError::CaptionsDisabled {
                video_id: video_id.to_string(),
            }),
            TranscriptReply::NotFound => Err(TranscriptError::NotFound {
                video_id: video_id.to_string(),
                language: language.to_string(),
            }),
        }
    }
}

pub struct FakeSummarizer {
    reply: SummaryReply,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String, SummarizeError> {
        self.prompts.lock().unwrap().push(transcript.to_string());

        match &self.reply {
            SummaryReply::Text(text) => Ok(text.clone()),
            SummaryReply::Empty => Err(SummarizeError::EmptyResponse),
            SummaryReply::ApiError => Err(SummarizeError::Api {
                status: 503,
                body: "overloaded".into(),
            }),
        }
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub transcripts: Arc<FakeTranscripts>,
    pub summarizer: Arc<FakeSummarizer>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// `Location` header, if any.
    pub location: Option<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-for-integration-tests".to_string(),
            token_ttl_days: 7,
        },
        transcript: TranscriptConfig {
            language: "en".to_string(),
            request_timeout_secs: 5,
        },
        generation: GenerationConfig {
            api_key: "unused".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
            temperature: 1.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 1024,
            request_timeout_secs: 5,
        },
    }
}

/// Client that keeps no cookies and does not follow redirects.
fn bare_client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build HTTP client")
}

impl TestApp {
    /// Server whose transcript and model calls succeed.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            TranscriptReply::Lines(vec!["Welcome to the show.", "Today we talk about tests."]),
            SummaryReply::Text(ARTICLE.to_string()),
        )
        .await
    }

    pub async fn spawn_with(transcript: TranscriptReply, summary: SummaryReply) -> Self {
        let config = test_config();

        let db = tubeblog_server::database::init_db(&config.database)
            .await
            .expect("Failed to initialize test database");

        let transcripts = Arc::new(FakeTranscripts {
            reply: transcript,
            requests: Mutex::new(Vec::new()),
        });
        let summarizer = Arc::new(FakeSummarizer {
            reply: summary,
            prompts: Mutex::new(Vec::new()),
        });

        let state = AppState {
            config,
            db: db.clone(),
            articles: Arc::new(SeaOrmArticles::new(db.clone())),
            transcripts: transcripts.clone(),
            summarizer: summarizer.clone(),
        };

        let app = tubeblog_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: bare_client(),
            db,
            transcripts,
            summarizer,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Client with a cookie store, for session cookie flows.
    pub fn session_client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client")
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw_with_token(&self, path: &str, body: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Sign up a user and return their session token.
    pub async fn create_authenticated_user(&self, username: &str, password: &str) -> String {
        let res = self
            .post_without_token(
                routes::SIGNUP,
                &serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                    "repeat_password": password,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "Signup failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Signup response should contain a token")
            .to_string()
    }

    /// Generate an article through the API and return its `id`.
    pub async fn generate_article(&self, token: &str, link: &str) -> i32 {
        let res = self
            .post_with_token(routes::GENERATE, &serde_json::json!({ "link": link }), token)
            .await;
        assert_eq!(res.status, 200, "generate failed: {}", res.text);
        res.id()
    }

    pub async fn article_count(&self) -> u64 {
        article::Entity::find()
            .count(&self.db)
            .await
            .expect("DB count failed")
    }

    pub async fn user_id(&self, username: &str) -> i32 {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .expect("DB query failed")
            .expect("User not found")
            .id
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            location,
            text,
            body,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
