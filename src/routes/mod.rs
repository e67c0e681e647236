// Route exports
pub mod schemes;

use actix_web::web;

pub use schemes::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(schemes::configure),
    );
}
