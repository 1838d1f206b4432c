extern crate book_showcase;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use log::warn;

use crate::book_showcase::backend::{Backend, LocalBackend, RemoteBackend};
use crate::book_showcase::catalog::{Catalog, CatalogSource};
use crate::book_showcase::config::{Config, Mode};
use crate::book_showcase::controller::{Action, AppState, Controller, Notice};
use crate::book_showcase::identity::StoredIdentity;
use crate::book_showcase::models::{BookId, CommentDraft};
use crate::book_showcase::store::FileStore;
use crate::book_showcase::verification::ChallengeSlot;
use crate::book_showcase::view;

#[derive(Parser, Debug)]
#[command(name = "book-showcase", version, about = "Browse, rate and comment on books")]
struct Cli {
    /// Where ratings and comments come from [env: SHOWCASE_MODE]
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Catalog file or URL [env: SHOWCASE_CATALOG]
    #[arg(long)]
    catalog: Option<String>,

    /// API base URL [env: SHOWCASE_API]
    #[arg(long)]
    api: Option<String>,

    /// Directory for local ratings and comments [env: SHOWCASE_DATA_DIR]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List books matching the filters
    List {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        genre: String,
    },
    /// List the catalog's genres
    Genres,
    /// Show one book with its rating and comments
    Show { id: String },
    /// Rate a book from 1 to 5
    Rate {
        id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        stars: u8,
        /// Solved verification token
        #[arg(long)]
        token: String,
    },
    /// Leave a comment on a book
    Comment {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        text: String,
        /// Solved verification token
        #[arg(long)]
        token: String,
    },
    /// Print this device's identifier (local mode)
    Device,
}

fn print_notices<B: Backend>(controller: &mut Controller<B, ChallengeSlot>) {
    for notice in controller.take_notices() {
        match notice {
            Notice::Info(message) => println!("{}", message),
            Notice::Error(message) => eprintln!("{}", message),
        }
    }
}

fn open(controller: &mut Controller<impl Backend, ChallengeSlot>, id: &str) -> anyhow::Result<()> {
    controller.dispatch(Action::Open(BookId::from(id)));

    if !controller.state().is_open() {
        return Err(anyhow::anyhow!("no book with id {}", id));
    }

    Ok(())
}

fn run<B: Backend>(mut controller: Controller<B, ChallengeSlot>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { query, genre } => {
            controller.dispatch(Action::RefreshSummaries);
            controller.dispatch(Action::SetQuery(query));
            controller.dispatch(Action::SetGenre(genre));

            print!("{}\n{}", view::header(controller.state()), view::list(controller.state()));
        }
        Command::Genres => {
            for genre in controller.state().genres() {
                println!("{}", genre);
            }
        }
        Command::Show { id } => {
            open(&mut controller, &id)?;

            print!("{}", view::detail(controller.state()));
        }
        Command::Rate { id, stars, token } => {
            open(&mut controller, &id)?;
            controller.verifier_mut().solve(token);
            controller.dispatch(Action::SetDraftRating(stars));
            controller.dispatch(Action::SubmitRating);

            print_notices(&mut controller);
            print!("{}", view::detail(controller.state()));
        }
        Command::Comment {
            id,
            name,
            email,
            text,
            token,
        } => {
            open(&mut controller, &id)?;
            controller.verifier_mut().solve(token);
            controller.dispatch(Action::EditComment(CommentDraft { name, email, text }));
            controller.dispatch(Action::SubmitComment);

            print_notices(&mut controller);
            print!("{}", view::detail(controller.state()));
        }
        Command::Device => warn!("device ids only exist in local mode"),
    }

    controller.dispatch(Action::Close);
    print_notices(&mut controller);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog = CatalogSource::parse(&catalog);
    }
    if let Some(api) = cli.api {
        config.api = api;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let catalog = Catalog::load(&config.catalog);
    let state = AppState::new(config.site.clone(), catalog);

    match config.mode {
        Mode::Remote => {
            let backend = RemoteBackend::new(&config.api)?;

            run(Controller::new(state, backend, ChallengeSlot::new()), cli.command)
        }
        Mode::Local => {
            let store = Arc::new(Mutex::new(FileStore::from_file(config.store_path())));
            let backend = LocalBackend::new(Arc::clone(&store), StoredIdentity::new(store));

            if let Command::Device = cli.command {
                println!("{}", backend.device_id()?);
                return Ok(());
            }

            run(Controller::new(state, backend, ChallengeSlot::new()), cli.command)
        }
    }
}
