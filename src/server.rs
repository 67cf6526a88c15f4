use crate::pipeline::{Pipeline, PipelineResponse};
use crate::query::SearchQuery;
use anyhow::{Context, Result};
use axum::{
    Form, Json, Router,
    extract::{FromRequest, Multipart, Query, Request, State, rejection::QueryRejection},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const MSG_EMPTY_SEARCH: &str = "Please enter the name of a movie!";

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// `q` and `comment`, merged from the query string and a urlencoded or multipart body.
#[derive(Debug, Default, Deserialize)]
pub struct MovieForm {
    pub q: Option<String>,
    pub comment: Option<String>,
}

impl MovieForm {
    /// Body fields take precedence over query-string fields.
    fn merge(&mut self, body: MovieForm) {
        if body.q.is_some() {
            self.q = body.q;
        }
        if body.comment.is_some() {
            self.comment = body.comment;
        }
    }
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/", get(post_movie).post(post_movie))
        .route("/health", get(|| async { "ok" }))
        .with_state(AppState { pipeline })
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                // path only; the query string carries user input
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            },
        ))
}

pub async fn serve(bind_addr: &str, pipeline: Arc<Pipeline>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Movielogger listening on {}", bind_addr);
    axum::serve(listener, router(pipeline))
        .await
        .context("server error")?;
    Ok(())
}

async fn post_movie(
    State(state): State<AppState>,
    query: Result<Query<MovieForm>, QueryRejection>,
    request: Request,
) -> Response {
    let mut form = match query {
        Ok(Query(form)) => form,
        Err(err) => {
            warn!(error = %err, "Ignoring unreadable query string");
            MovieForm::default()
        }
    };
    form.merge(read_body_form(request).await);

    // no search text at all: show the entry form
    let Some(q) = form.q else {
        return Html(INDEX_HTML).into_response();
    };

    let query = match SearchQuery::new(&q, form.comment.as_deref()) {
        Ok(query) => query,
        Err(_) => return Json(PipelineResponse::failed(MSG_EMPTY_SEARCH)).into_response(),
    };

    Json(state.pipeline.run(&query).await).into_response()
}

/// Fields from a urlencoded or multipart body; anything else contributes nothing.
async fn read_body_form(request: Request) -> MovieForm {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(err) => {
                warn!(error = %err, "Ignoring unreadable multipart body");
                MovieForm::default()
            }
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        match Form::<MovieForm>::from_request(request, &()).await {
            Ok(Form(form)) => form,
            Err(err) => {
                warn!(error = %err, "Ignoring unreadable form body");
                MovieForm::default()
            }
        }
    } else {
        MovieForm::default()
    }
}

async fn read_multipart(mut multipart: Multipart) -> MovieForm {
    let mut form = MovieForm::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "Stopped reading multipart body");
                break;
            }
        };
        let name = field.name().map(str::to_string);
        let value = match field.text().await {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable multipart field");
                continue;
            }
        };
        match name.as_deref() {
            Some("q") => form.q = Some(value),
            Some("comment") => form.comment = Some(value),
            _ => {}
        }
    }
    form
}
