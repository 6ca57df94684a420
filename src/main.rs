use crate::app::AppState;
use crate::config::Config;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::users::FileUserStore;
use astra::Server;

mod app;
mod auth;
mod charts;
mod config;
mod dashboard;
mod domain;
mod errors;
mod forms;
mod responses;
mod router;
mod spreadsheets;
mod templates;
mod users;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1️⃣ Read configuration from the environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Wire up shared state: credential store, sessions, hasher
    let store = FileUserStore::new(&config.user_db_path);
    let state = AppState::new(store);

    // 3️⃣ Start the server
    log::info!("starting server at http://{}", config.bind_addr);
    let server = Server::bind(&config.bind_addr).max_workers(8);

    // 4️⃣ Serve requests, passing the shared state into the closure
    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        log::error!("server ended with error: {e}");
    }

    log::info!("server shut down cleanly");
}
