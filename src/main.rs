mod app;
mod components;
mod config;
mod core;
mod utils;

use app::App;
use leptos::prelude::*;
use tracing::Level;

fn main() {
    console_error_panic_hook::set_once();
    utils::logging::init(if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    });

    let Some(root) = utils::dom::mount_root(config::MOUNT_ID) else {
        tracing::error!(id = config::MOUNT_ID, "mount element not found");
        return;
    };

    mount_to(root, App).forget();
}
