mod dispatch_event;

use actix_web::web;
use dispatch_event::{dispatch_event_controller, dispatch_event_default_controller};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/webhooks",
        web::post().to(dispatch_event_default_controller),
    );
    cfg.route(
        "/webhooks/{source}",
        web::post().to(dispatch_event_controller),
    );
}
