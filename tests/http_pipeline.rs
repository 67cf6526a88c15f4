use movielogger::api::http_client;
use movielogger::{Config, Pipeline, server};
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Providers {
    youtube: MockServer,
    yahoo: MockServer,
    tumblr: MockServer,
}

impl Providers {
    async fn start() -> Self {
        Self {
            youtube: MockServer::start().await,
            yahoo: MockServer::start().await,
            tumblr: MockServer::start().await,
        }
    }

    fn config(&self) -> Config {
        let ini = format!(
            "tumblr_email = me@example.com\n\
             tumblr_password = hunter2\n\
             tumblr_blog = mymovies\n\
             yahoo_app_id = app-1\n\
             request_timeout_secs = 5\n\
             youtube_search_url = {}/feeds/api/videos\n\
             yahoo_search_url = {}/ysearch/web/v1\n\
             tumblr_write_url = {}/api/write\n",
            self.youtube.uri(),
            self.yahoo.uri(),
            self.tumblr.uri()
        );
        Config::from_ini_str(&ini).unwrap()
    }
}

/// Serves the router on an ephemeral port and returns its base URL.
async fn spawn_app(config: &Config) -> String {
    let pipeline = Arc::new(Pipeline::from_config(http_client(config).unwrap(), config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(pipeline)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn mount_video(server: &MockServer, id: &str) {
    let body = format!(
        r#"{{"feed": {{"entry": [{{"id": {{"$t": "http://gdata.youtube.com/feeds/api/videos/{}"}}}}]}}}}"#,
        id
    );
    Mock::given(method("GET"))
        .and(path("/feeds/api/videos"))
        .and(query_param("alt", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn posts_linked_caption_end_to_end() {
    let providers = Providers::start().await;
    mount_video(&providers.youtube, "qvsgGtivCgs").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/ysearch/web/v1/.+"))
        .and(query_param("appid", "app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"ysearchresponse": {"resultset_web": [
                {"title": "<b>Back to the Future</b> (Film) - Wikipedia",
                 "url": "https://en.wikipedia.org/wiki/Back_to_the_Future"}
            ]}}"#,
        ))
        .expect(1)
        .mount(&providers.yahoo)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/write"))
        .and(body_string_contains("type=video"))
        .and(body_string_contains("Back+to+the+Future+%281985%29"))
        .respond_with(ResponseTemplate::new(201).set_body_string("424242"))
        .expect(1)
        .mount(&providers.tumblr)
        .await;

    let base = spawn_app(&providers.config()).await;
    let resp: Value = reqwest::Client::new()
        .post(&base)
        .form(&[("q", " Back to the future 1985 "), ("comment", "")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        resp,
        serde_json::json!({"success": 1, "message": "Video posted successfully!", "post_id": "424242"})
    );
}

#[tokio::test]
async fn missing_trailer_never_reaches_other_providers() {
    let providers = Providers::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"feed": {}}"#))
        .mount(&providers.youtube)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&providers.yahoo)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&providers.tumblr)
        .await;

    let base = spawn_app(&providers.config()).await;
    let resp: Value = reqwest::Client::new()
        .get(format!("{}/?q=asdkjasdkj", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        resp,
        serde_json::json!({"success": 0, "message": "Couldn't find a trailer on YouTube!"})
    );
}

#[tokio::test]
async fn reference_outage_falls_back_to_plain_caption() {
    let providers = Providers::start().await;
    mount_video(&providers.youtube, "YoHD9XEInc0").await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&providers.yahoo)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains(
            "caption=%3Cp%3EInception+2010%3C%2Fp%3E%3Cp%3Eloved+it%3C%2Fp%3E",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_string("777"))
        .expect(1)
        .mount(&providers.tumblr)
        .await;

    let base = spawn_app(&providers.config()).await;
    let resp: Value = reqwest::Client::new()
        .post(&base)
        .form(&[("q", "Inception 2010"), ("comment", "loved it")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(resp["success"], 1);
    assert_eq!(resp["post_id"], "777");
}

#[tokio::test]
async fn blank_query_is_rejected_and_missing_query_shows_form() {
    let providers = Providers::start().await;
    let base = spawn_app(&providers.config()).await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .post(&base)
        .form(&[("q", "   ")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        resp,
        serde_json::json!({"success": 0, "message": "Please enter the name of a movie!"})
    );

    let page = client.get(&base).send().await.unwrap().text().await.unwrap();
    assert!(page.contains("movie-form"));

    let health = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(health, "ok");
}

async fn mount_no_trailer(providers: &Providers) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"feed": {}}"#))
        .mount(&providers.youtube)
        .await;
}

#[tokio::test]
async fn post_with_query_string_and_no_body_answers_json() {
    let providers = Providers::start().await;
    mount_no_trailer(&providers).await;

    let base = spawn_app(&providers.config()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/?q=asdkjasdkj", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({"success": 0, "message": "Couldn't find a trailer on YouTube!"})
    );
}

#[tokio::test]
async fn multipart_post_is_read() {
    let providers = Providers::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "asdkjasdkj trailer"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"feed": {}}"#))
        .expect(1)
        .mount(&providers.youtube)
        .await;

    let base = spawn_app(&providers.config()).await;
    let form = reqwest::multipart::Form::new()
        .text("q", "asdkjasdkj")
        .text("comment", "hi");
    let resp = reqwest::Client::new()
        .post(&base)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], 0);
    assert_eq!(body["message"], "Couldn't find a trailer on YouTube!");
}

#[tokio::test]
async fn slow_video_provider_counts_as_no_trailer() {
    let providers = Providers::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"feed": {"entry": [{"id": {"$t": "late"}}]}}"#)
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&providers.youtube)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&providers.tumblr)
        .await;

    let mut config = providers.config();
    config.request_timeout_secs = 1;
    let base = spawn_app(&config).await;
    let body: Value = reqwest::Client::new()
        .get(format!("{}/?q=Alien", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        serde_json::json!({"success": 0, "message": "Couldn't find a trailer on YouTube!"})
    );
}
