//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use film_catalog::config::ServiceConfig;
use film_catalog::models::{Director, Movie, Runtime};
use film_catalog::store::{ListStore, MemoryStore};
use film_catalog::{AppState, HttpServer, Shutdown};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub fn movie(id: i64, title: &str, year: i32, runtime: i32, genres: &[&str]) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        year,
        runtime: Runtime(runtime),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        version: 1,
    }
}

pub fn director(id: i64, name: &str, surname: &str, awards: &[&str]) -> Director {
    Director {
        id,
        name: name.to_string(),
        surname: surname.to_string(),
        awards: awards.iter().map(|a| a.to_string()).collect(),
    }
}

/// Three movies share 2016 so year ordering depends on the tie-break.
pub fn movies() -> Vec<Movie> {
    vec![
        movie(1, "Moana", 2016, 107, &["animation", "adventure"]),
        movie(2, "Black Panther", 2018, 134, &["action", "adventure"]),
        movie(3, "Deadpool", 2016, 108, &["action", "comedy"]),
        movie(4, "The Breakfast Club", 1986, 96, &["drama"]),
        movie(5, "Inception", 2010, 148, &["action", "sci-fi"]),
        movie(6, "Arrival", 2016, 116, &["drama", "sci-fi"]),
    ]
}

pub fn directors() -> Vec<Director> {
    vec![
        director(1, "Greta", "Gerwig", &["BAFTA"]),
        director(2, "Christopher", "Nolan", &["Oscar", "BAFTA"]),
        director(3, "Denis", "Villeneuve", &[]),
        director(4, "Sofia", "Coppola", &["Oscar"]),
    ]
}

/// Defaults with admission control switched off.
pub fn config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.limiter.enabled = false;
    config
}

pub fn limited_config(rps: f64, burst: u32) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.limiter.enabled = true;
    config.limiter.rps = rps;
    config.limiter.burst = burst;
    config
}

pub fn server(config: &ServiceConfig) -> HttpServer {
    server_with_stores(
        config,
        Arc::new(MemoryStore::new(movies())),
        Arc::new(MemoryStore::new(directors())),
    )
}

pub fn server_with_stores(
    config: &ServiceConfig,
    movies: Arc<dyn ListStore<Movie>>,
    directors: Arc<dyn ListStore<Director>>,
) -> HttpServer {
    HttpServer::new(config, AppState::new(config, movies, directors))
}

/// Issue a GET through the full middleware stack as if from `ip`.
pub async fn get_from(router: &Router, uri: &str, ip: [u8; 4]) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    get_from(router, uri, [127, 0, 0, 1]).await
}

pub fn ids(body: &Value, key: &str) -> Vec<i64> {
    body[key]
        .as_array()
        .unwrap_or_else(|| panic!("no {key} array in {body}"))
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

/// Serve on an ephemeral port. Trigger the returned handle to stop.
pub async fn spawn_server(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
