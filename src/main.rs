mod app;
mod error;
mod rendering;
mod scheduler;
mod simulation;

fn main() {
    if let Err(err) = app::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
