mod app;
mod mesh;
mod render;
mod scene;

use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = app::run() {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}
