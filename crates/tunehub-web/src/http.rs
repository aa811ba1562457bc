//! UI server: the page shell plus one route per page action.
//!
//! Every action route answers with the HTML fragment it changed. Errors
//! have already been turned into toasts by `App`, so a failed action still
//! answers 200 with the unchanged fragment; only unknown list names are 404.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};
use tunehub_proto::songs::{DownloadRequest, Settings};

use crate::action::{ListContext, Page};
use crate::app::App;
use crate::component::Component;
use crate::components::download_list::DownloadList;
use crate::components::library_list::LibraryList;
use crate::components::list_panel::ListPanel;
use crate::components::playlist_grid::PlaylistGrid;
use crate::components::settings_form::SettingsForm;
use crate::components::{render_page, render_toplists};

const INDEX_HTML: &str = include_str!("../assets/index.html");

type AppState = Arc<App>;

#[derive(Debug, Deserialize)]
struct SearchForm {
    source: String,
    #[serde(default)]
    keyword: String,
}

#[derive(Debug, Deserialize)]
struct SourceForm {
    source: String,
}

#[derive(Debug, Deserialize)]
struct ItemForm {
    source: String,
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct SelectAllForm {
    checked: bool,
}

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ui/page/:page", get(page))
        .route("/ui/source", post(set_source))
        .route("/ui/search", post(search))
        .route("/ui/toplists", get(toplists))
        .route("/ui/toplist", post(select_toplist))
        .route("/ui/list/:ctx", get(list_panel))
        .route("/ui/list/:ctx/toggle/:index", post(toggle_one))
        .route("/ui/list/:ctx/select-all", post(select_all))
        .route("/ui/list/:ctx/batch-download", post(batch_download))
        .route("/ui/download", post(download))
        .route("/ui/playlists", get(playlists))
        .route("/ui/playlists/import", post(import_playlist))
        .route("/ui/playlists/open", post(open_playlist))
        .route("/ui/playlists/back", post(playlist_grid))
        .route("/ui/playlists/delete", post(delete_playlist))
        .route("/ui/library", get(library))
        .route("/ui/library/refresh", post(refresh_library))
        .route("/ui/downloads", get(downloads))
        .route("/ui/settings", get(settings).post(save_settings))
        .route("/ui/toasts", get(toasts))
        .layer(CorsLayer::permissive())
        .with_state(app)
}

pub fn start_server(bind_address: String, port: u16, app: Arc<App>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let routes = router(app);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind UI server to {}: {}", addr, e);
                return;
            }
        };

        info!("UI server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, routes).await {
            error!("UI server error: {}", e);
        }
    })
}

fn parse_context(name: &str) -> Result<ListContext, Response> {
    name.parse::<ListContext>().map_err(|e| {
        debug!("UI: {}", e);
        (StatusCode::NOT_FOUND, e).into_response()
    })
}

async fn render_list(app: &App, ctx: ListContext) -> Html<String> {
    let state = app.state().await;
    Html(ListPanel::new(ctx).render(&state))
}

async fn render_component(app: &App, component: impl Component) -> Html<String> {
    let state = app.state().await;
    Html(component.render(&state))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn page(State(app): State<AppState>, Path(name): Path<String>) -> Html<String> {
    let target = Page::from_name(&name);
    app.navigate(target).await;
    let state = app.state().await;
    Html(render_page(target, &state))
}

async fn set_source(State(app): State<AppState>, Json(form): Json<SourceForm>) -> Html<String> {
    info!("UI: source {}", form.source);
    app.set_source(&form.source).await;
    let state = app.state().await;
    Html(render_toplists(&state))
}

async fn search(State(app): State<AppState>, Json(form): Json<SearchForm>) -> Html<String> {
    info!("UI: search {:?} on {}", form.keyword, form.source);
    let _ = app.search(&form.source, &form.keyword).await;
    let state = app.state().await;
    Html(render_page(Page::Home, &state))
}

async fn toplists(State(app): State<AppState>, Query(form): Query<SourceForm>) -> Html<String> {
    let _ = app.load_toplists(&form.source).await;
    let state = app.state().await;
    Html(render_toplists(&state))
}

async fn select_toplist(State(app): State<AppState>, Json(form): Json<ItemForm>) -> Html<String> {
    info!("UI: toplist {} on {}", form.id, form.source);
    let _ = app.select_toplist(&form.source, &form.id).await;
    let state = app.state().await;
    Html(render_toplists(&state))
}

async fn list_panel(State(app): State<AppState>, Path(ctx): Path<String>) -> Response {
    match parse_context(&ctx) {
        Ok(ctx) => render_list(&app, ctx).await.into_response(),
        Err(resp) => resp,
    }
}

async fn toggle_one(
    State(app): State<AppState>,
    Path((ctx, index)): Path<(String, usize)>,
) -> Response {
    let ctx = match parse_context(&ctx) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let _ = app.toggle_one(ctx, index).await;
    render_list(&app, ctx).await.into_response()
}

async fn select_all(
    State(app): State<AppState>,
    Path(ctx): Path<String>,
    Json(form): Json<SelectAllForm>,
) -> Response {
    let ctx = match parse_context(&ctx) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    app.toggle_all(ctx, form.checked).await;
    render_list(&app, ctx).await.into_response()
}

async fn batch_download(State(app): State<AppState>, Path(ctx): Path<String>) -> Response {
    let ctx = match parse_context(&ctx) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    info!("UI: batch download on {}", ctx);
    let _ = app.batch_download(ctx).await;
    render_list(&app, ctx).await.into_response()
}

/// Single download. Answers with the current page, since the song may be
/// listed in more than one panel.
async fn download(State(app): State<AppState>, Json(request): Json<DownloadRequest>) -> Html<String> {
    info!("UI: download {}/{}", request.source, request.id);
    let _ = app.download_song(request).await;
    let state = app.state().await;
    Html(render_page(state.router.current(), &state))
}

async fn playlists(State(app): State<AppState>) -> Html<String> {
    if let Err(e) = app.load_playlists().await {
        error!("UI: loading playlists failed: {}", e);
    }
    render_component(&app, PlaylistGrid).await
}

async fn import_playlist(State(app): State<AppState>, Json(form): Json<ItemForm>) -> Html<String> {
    info!("UI: import playlist {} from {}", form.id, form.source);
    let _ = app.import_playlist(&form.source, &form.id).await;
    render_component(&app, PlaylistGrid).await
}

async fn open_playlist(State(app): State<AppState>, Json(form): Json<ItemForm>) -> Html<String> {
    if let Err(e) = app.open_playlist(&form.source, &form.id).await {
        debug!("UI: {}", e);
    }
    render_component(&app, PlaylistGrid).await
}

async fn playlist_grid(State(app): State<AppState>) -> Html<String> {
    app.show_playlist_grid().await;
    render_component(&app, PlaylistGrid).await
}

async fn delete_playlist(State(app): State<AppState>, Json(form): Json<ItemForm>) -> Html<String> {
    info!("UI: delete playlist {} from {}", form.id, form.source);
    let _ = app.delete_playlist(&form.source, &form.id).await;
    render_component(&app, PlaylistGrid).await
}

async fn library(State(app): State<AppState>) -> Html<String> {
    if let Err(e) = app.load_library().await {
        error!("UI: loading library failed: {}", e);
    }
    render_component(&app, LibraryList).await
}

async fn refresh_library(State(app): State<AppState>) -> Html<String> {
    let _ = app.refresh_library().await;
    render_component(&app, LibraryList).await
}

async fn downloads(State(app): State<AppState>) -> Html<String> {
    render_component(&app, DownloadList).await
}

async fn settings(State(app): State<AppState>) -> Html<String> {
    if let Err(e) = app.load_settings().await {
        error!("UI: loading settings failed: {}", e);
    }
    render_component(&app, SettingsForm).await
}

async fn save_settings(State(app): State<AppState>, Json(settings): Json<Settings>) -> Html<String> {
    let _ = app.save_settings(settings).await;
    render_component(&app, SettingsForm).await
}

async fn toasts(State(app): State<AppState>) -> Html<String> {
    Html(app.toasts().await)
}
