use axum::{Router, routing::get};

use super::controller::{
    create_product, delete_product, get_product, list_products, patch_product, replace_product,
};
use crate::state::AppState;

pub fn init_products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
}
