mod get_user_tokens;
mod purge_stale_tokens;
mod register_token;
mod remove_token;

use actix_web::web;
use get_user_tokens::get_user_tokens_controller;
use purge_stale_tokens::purge_stale_tokens_controller;
use register_token::register_token_controller;
use remove_token::remove_token_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/tokens/register", web::post().to(register_token_controller));
    cfg.route("/tokens/remove", web::post().to(remove_token_controller));
    cfg.route(
        "/tokens/user/{user_id}",
        web::get().to(get_user_tokens_controller),
    );
    cfg.route(
        "/tokens/stale",
        web::delete().to(purge_stale_tokens_controller),
    );
}
