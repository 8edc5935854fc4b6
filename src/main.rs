mod api;
mod app;
mod cli;
mod config;
mod error;
mod library;
mod player;
mod runtime;
mod session;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
