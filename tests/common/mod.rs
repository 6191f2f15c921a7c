//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use simpledash::api::{create_router, AppState};
use simpledash::auth::SessionStore;
use simpledash::config::{Card, Config, User};
use simpledash::templates::{TemplateSource, Templates};
use tempfile::TempDir;

pub const COOKIE_NAME: &str = "dash_test";

pub const BASE: &str = "{% block content %}{% endblock %}";

/// Minimal pages whose output is easy to assert on
pub fn test_templates() -> Templates {
    Templates::from_sources(
        BASE.to_string(),
        vec![
            TemplateSource::new(
                "home",
                "{% extends \"base\" %}{% block content %}user={{ username }};\
                 {% for card in user.cards %}[{{ dyn_template(card.type, card) }}]{% endfor %}\
                 {% endblock %}",
            ),
            TemplateSource::new("login", "login user={{ username }} error={{ error }}"),
            TemplateSource::new("error", "error {{ status_code }}: {{ reason }}"),
            TemplateSource::new("link", "<a>{{ title }}</a>"),
            TemplateSource::new("boom", "{{ missing_helper() }}"),
        ],
    )
    .expect("test templates compile")
}

pub fn user(password: &str, cards: Vec<Card>) -> User {
    User {
        password_hash: bcrypt::hash(password, 4).expect("hash"),
        show_public: false,
        cards,
    }
}

pub fn card(card_type: &str, title: &str) -> Card {
    Card {
        card_type: card_type.to_string(),
        title: title.to_string(),
        ..Card::default()
    }
}

/// Config with user `alice` / `hunter2`
pub fn test_config(login_required: bool) -> Config {
    let mut config = Config::default();
    config.title = "Test".to_string();
    config.login_required = login_required;
    config.session.name = COOKIE_NAME.to_string();
    config.users.insert(
        "alice".to_string(),
        user(
            "hunter2",
            vec![card("link", "Git"), card("nosuchtype", "Lost"), card("boom", "Broken")],
        ),
    );
    config
}

/// A running server plus handles to inspect it
pub struct TestApp {
    pub url: String,
    pub sessions: Arc<dyn SessionStore>,
    pub public: TempDir,
}

impl TestApp {
    pub async fn spawn(config: Config, sessions: Arc<dyn SessionStore>) -> Self {
        Self::spawn_with(config, test_templates(), sessions).await
    }

    pub async fn spawn_with(
        config: Config,
        templates: Templates,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let public = TempDir::new().expect("tempdir");
        let state = AppState::new(
            config,
            templates,
            sessions.clone(),
            public.path().to_path_buf(),
        )
        .expect("state");

        let url = serve(create_router(Arc::new(state))).await;
        Self {
            url,
            sessions,
            public,
        }
    }

    pub fn at(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    pub fn write_public(&self, rel: &str, content: &str) {
        write(self.public.path(), rel, content);
    }
}

/// Serve a router on an ephemeral port, returning its base URL
pub async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

/// Browser-like client: keeps cookies, does not follow redirects
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

/// Client without a cookie jar, for hand-crafted Cookie headers
pub fn bare_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

pub async fn post_login(
    client: &reqwest::Client,
    app: &TestApp,
    username: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(app.at("/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(format!("username={}&password={}", username, password))
        .send()
        .await
        .expect("login request")
}

pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Session id from the response's session cookie, if one was set
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| {
            v.split(';')
                .next()
                .and_then(|pair| pair.trim().strip_prefix(&format!("{}=", COOKIE_NAME)))
                .map(str::to_string)
        })
}

pub fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write file");
}
