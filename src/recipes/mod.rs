pub mod aggregator;
pub mod category;
pub mod dto;
pub mod fanout;
pub mod handlers;
pub mod id;
pub mod normalize;
pub mod provider;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::recipe_routes())
}
