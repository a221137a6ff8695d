use crate::configuration::Settings;
use crate::routes::icon_search::search_icon;
use crate::routes::pages::{add_page, create_shortcut, edit_page, index_page, update_shortcut};
use crate::routes::shortcuts_api::{CardPresenter, delete_shortcut, list_shortcuts};
use crate::services::icon::{AvatarStyle, IconResolver};
use crate::services::icon_search::NounProjectClient;
use crate::services::shortcut::ShortcutService;
use crate::store::{ObjectStore, ShortcutRepository};
use tower_http::services::ServeDir;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get},
};
use sqlx::postgres::PgPoolOptions;

#[derive(Clone, Debug)]
pub struct AppState {
    pub shortcuts: ShortcutService,
    pub icon_search: NounProjectClient,
    pub presenter: CardPresenter,
}

pub async fn run(cfg: Settings) {
    let pg_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(cfg.database.with_db());

    let repo = ShortcutRepository::new(pg_pool);
    let object_store = ObjectStore::new(&cfg.storage);
    let icon_search = NounProjectClient::new(&cfg.icon_search);
    let avatar = AvatarStyle::new(&cfg.avatar);

    let icons = IconResolver::new(
        object_store.clone(),
        icon_search.clone(),
        cfg.icon_search.enabled,
        avatar.clone(),
    );
    let shortcuts = ShortcutService::new(repo, icons);
    let presenter = CardPresenter::new(avatar, object_store.public_base());

    let app_state = AppState {
        shortcuts,
        icon_search,
        presenter,
    };

    let app = Router::new()
        .route("/", get(index_page))
        .route("/add-shortcut", get(add_page).post(create_shortcut))
        .route("/edit/{id}", get(edit_page).post(update_shortcut))
        .route("/api/shortcuts", get(list_shortcuts))
        .route("/api/shortcuts/{id}", delete(delete_shortcut))
        .route("/api/search-icon", get(search_icon))
        .nest_service(
            "/assets",
            ServeDir::new(format!(
                "{}/public",
                std::env::current_dir().unwrap().to_str().unwrap()
            )),
        )
        // Card images come in as multipart uploads.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .with_state(app_state);

    let address = format!("{}:{}", cfg.application.host, cfg.application.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("could not bind listener");
    tracing::info!("Listening on {}", address);
    axum::serve(listener, app)
        .await
        .expect("could not start server");
}
