//! Binary entry point: resolve configuration, start logging, open storage,
//! load the shelf and drive the Ratatui event loop until the user exits.
use bookshelf::logging::init_logging;
use bookshelf::{run_app, App, Config, Persistence, Shelf, ShelfView};

fn main() -> anyhow::Result<()> {
    let (persistence, _logger) = match Config::from_env() {
        Ok(config) => {
            let logger = init_logging(&config)
                .inspect_err(|err| eprintln!("bookshelf: logging disabled: {err:#}"))
                .ok();
            (Persistence::open(&config.db_path()), logger)
        }
        Err(err) => {
            eprintln!("bookshelf: {err:#}");
            (Persistence::unavailable(), None)
        }
    };

    let (shelf, outcome) = Shelf::load(persistence, ShelfView::default());
    let mut app = App::new(shelf, outcome);
    run_app(&mut app)
}
