#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for Board Maker: runs the level store and edits levels headlessly.

mod config;
mod render;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use board_maker_core::{CellCoord, Event, LevelId, PieceKind, TerrainKind};
use board_maker_document::{export_file_name, parse, snapshot, to_pretty_json};
use board_maker_session::EditorSession;
use board_maker_store::{JsonFileRepository, StoreServer};
use board_maker_store_client::{HttpLevelStore, LevelStore};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{info, warn};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "board-maker", version, about = "Edit and store Board Maker levels")]
struct Cli {
    /// Config file; defaults to `board-maker.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raises log verbosity; repeat for debug output.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Level store API base URL, overriding `[store] url`.
    #[arg(long, global = true)]
    store_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Runs the level store HTTP server.
    Serve {
        /// Address to listen on, overriding `[server] bind`.
        #[arg(long)]
        bind: Option<String>,
        /// Route prefix, overriding `[server] api_prefix`.
        #[arg(long)]
        api_prefix: Option<String>,
        /// Directory holding `levels.json`, overriding `[server] data_dir`.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Lists saved levels, most recent first.
    List,
    /// Prints a preview of a saved level.
    Show {
        /// Identifier of the level.
        level_id: String,
    },
    /// Writes a saved level to `{level_id}.json`.
    Download {
        /// Identifier of the level.
        level_id: String,
        /// Directory to write into.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Validates a level file and saves it to the store under a new identifier.
    Push {
        /// Level file to upload.
        file: PathBuf,
        /// Name to save under; defaults to the name in the file.
        #[arg(long)]
        name: Option<String>,
    },
    /// Builds a level from edit flags, previews it and optionally saves or exports it.
    New(NewArgs),
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Board width, overriding `[editor] width`.
    #[arg(long)]
    width: Option<String>,
    /// Board height, overriding `[editor] height`.
    #[arg(long)]
    height: Option<String>,
    /// Terrain painted over the whole board first.
    #[arg(long)]
    fill: Option<TerrainKind>,
    /// Paints one cell, as `terrain:x,y`; repeatable.
    #[arg(long, value_parser = parse_paint)]
    paint: Vec<(TerrainKind, CellCoord)>,
    /// Places one enemy piece, as `kind:x,y`; repeatable.
    #[arg(long, value_parser = parse_piece)]
    piece: Vec<(PieceKind, CellCoord)>,
    /// Level name.
    #[arg(long, default_value = "")]
    name: String,
    /// Saves the level to the store.
    #[arg(long)]
    save: bool,
    /// Writes the level as `{level_id}.json` into this directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let store_url = cli.store_url.unwrap_or_else(|| config.store.url.clone());
    let store = HttpLevelStore::new(store_url);

    match cli.command {
        Commands::Serve {
            bind,
            api_prefix,
            data_dir,
        } => serve(
            &bind.unwrap_or(config.server.bind),
            &api_prefix.unwrap_or(config.server.api_prefix),
            &data_dir.unwrap_or(config.server.data_dir),
        ),
        Commands::List => list(&store),
        Commands::Show { level_id } => show(&store, &LevelId::new(level_id)),
        Commands::Download { level_id, out } => download(&store, &LevelId::new(level_id), &out),
        Commands::Push { file, name } => push(&store, &file, name),
        Commands::New(args) => new_level(&store, &config, args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn serve(bind: &str, api_prefix: &str, data_dir: &Path) -> Result<()> {
    let repository = JsonFileRepository::open(data_dir)
        .with_context(|| format!("failed to open level data in {}", data_dir.display()))?;
    info!("persisting levels to {}", repository.path().display());
    let server = StoreServer::bind(bind, Box::new(repository), api_prefix)?;
    if let Some(addr) = server.local_addr() {
        println!("serving levels on http://{addr}{api_prefix}");
    }
    server.run();
    Ok(())
}

fn list(store: &HttpLevelStore) -> Result<()> {
    let session = EditorSession::connect(store).context("failed to list levels")?;
    let levels = session.levels();
    if levels.is_empty() {
        println!("no saved levels");
    }
    for level in levels {
        println!("{}\t{}", level.level_id, level.name);
    }
    Ok(())
}

fn show(store: &HttpLevelStore, level_id: &LevelId) -> Result<()> {
    let mut session = EditorSession::new();
    let metadata = session
        .load(store, level_id)
        .with_context(|| format!("failed to load level {level_id}"))?;
    if let Some(name) = metadata.name {
        println!("{name}");
    }
    print_preview(&session);
    Ok(())
}

fn download(store: &HttpLevelStore, level_id: &LevelId, out: &Path) -> Result<()> {
    let value = store
        .fetch(level_id)
        .with_context(|| format!("failed to fetch level {level_id}"))?;
    let parsed = parse(&value).with_context(|| format!("level {level_id} is invalid"))?;

    let document = snapshot(&parsed.board, level_id.clone(), parsed.name);
    let path = out.join(export_file_name(&document));
    fs::write(&path, to_pretty_json(&document)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn push(store: &HttpLevelStore, file: &Path, name: Option<String>) -> Result<()> {
    let mut session = EditorSession::new();
    let metadata = session
        .load_file(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    if let Some(name) = name.or(metadata.name) {
        session.set_level_name(name);
    }

    let level_id = session.save(store).context("failed to save level")?;
    println!("{level_id}");
    Ok(())
}

fn new_level(store: &HttpLevelStore, config: &Config, args: NewArgs) -> Result<()> {
    let size = config.editor.board_size()?;
    let mut session = EditorSession::with_size(size);
    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or_else(|| size.width().to_string());
        let height = args.height.unwrap_or_else(|| size.height().to_string());
        let _ = session.resize_from_input(&width, &height)?;
    }
    session.set_level_name(args.name);

    if let Some(terrain) = args.fill {
        session.select_terrain(terrain);
        let _ = session.fill_all();
    }
    for (terrain, cell) in args.paint {
        session.select_terrain(terrain);
        let _ = session.click(cell);
    }
    for (kind, cell) in args.piece {
        session.select_piece(kind);
        for event in session.click(cell) {
            if let Event::PiecePlacementRejected { .. } = event {
                warn!("{kind} at {cell} is outside the board");
            }
        }
    }

    print_preview(&session);

    if let Some(out) = args.out {
        let path = session
            .download(&out)
            .with_context(|| format!("failed to export into {}", out.display()))?;
        println!("{}", path.display());
    }
    if args.save {
        let level_id = session.save(store).context("failed to save level")?;
        println!("{level_id}");
    }
    Ok(())
}

fn print_preview(session: &EditorSession) {
    print!("{}", render::render(session.board()));
    println!("{}", render::legend());
}

fn parse_paint(value: &str) -> Result<(TerrainKind, CellCoord), String> {
    let (terrain, cell) = split_placement(value)?;
    let terrain = terrain
        .parse::<TerrainKind>()
        .map_err(|error| error.to_string())?;
    Ok((terrain, cell))
}

fn parse_piece(value: &str) -> Result<(PieceKind, CellCoord), String> {
    let (kind, cell) = split_placement(value)?;
    let kind = kind
        .parse::<PieceKind>()
        .map_err(|error| error.to_string())?;
    Ok((kind, cell))
}

fn split_placement(value: &str) -> Result<(&str, CellCoord), String> {
    let (kind, coords) = value
        .split_once(':')
        .ok_or_else(|| format!("expected `kind:x,y`, got `{value}`"))?;
    let (x, y) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y` coordinates, got `{coords}`"))?;
    let column = x
        .trim()
        .parse()
        .map_err(|_| format!("column `{x}` is not a number"))?;
    let row = y
        .trim()
        .parse()
        .map_err(|_| format!("row `{y}` is not a number"))?;
    Ok((kind.trim(), CellCoord::new(column, row)))
}
