mod render;

use clap::{Parser, Subcommand};
use recipe_core::suggest::{self, Key, PanelAction};
use recipe_core::views;
use recipe_core::{
    resolve_core_config, CategoryName, MealDbClient, MealId, NonEmptyText, SharedSource,
    SuggestConfig,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "recipe")]
#[command(about = "Recipe discovery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by name
    Search {
        /// Free-text query
        query: String,
    },
    /// List all categories
    Categories,
    /// List recipes in a category
    Category {
        /// Category name, e.g. Seafood
        name: String,
    },
    /// Show full details of a recipe
    Show {
        /// Recipe identifier
        id: String,
    },
    /// Show the featured selection and categories
    Featured,
    /// Interactive type-ahead suggestions read from stdin
    Suggest,
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Text(String),
    Key(Key),
    Focus,
}

fn parse_line(line: &str) -> Line {
    match line.trim() {
        ":down" => Line::Key(Key::ArrowDown),
        ":up" => Line::Key(Key::ArrowUp),
        ":enter" => Line::Key(Key::Enter),
        ":esc" => Line::Key(Key::Escape),
        ":focus" => Line::Focus,
        _ => Line::Text(line.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recipe_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'recipe --help' for commands");
        return Ok(());
    };

    let cfg = resolve_core_config(|key| std::env::var(key).ok())?;
    let source: SharedSource = Arc::new(MealDbClient::new(&cfg)?);

    match command {
        Commands::Search { query } => match NonEmptyText::new(&query) {
            Ok(query) => {
                let results = views::search_results(source.as_ref(), &query).await;
                println!("{}", render::view(&results, |m| render::meal_list(m)));
            }
            Err(e) => eprintln!("Error searching recipes: {}", e),
        },
        Commands::Categories => {
            let index = views::category_index(source.as_ref()).await;
            println!("{}", render::view(&index, |c| render::categories(c)));
        }
        Commands::Category { name } => match CategoryName::new(&name) {
            Ok(name) => {
                let listing = views::category_listing(source.as_ref(), &name).await;
                println!("{}", render::view(&listing, |m| render::summaries(m)));
            }
            Err(e) => eprintln!("Error listing category: {}", e),
        },
        Commands::Show { id } => match MealId::new(&id) {
            Ok(id) => show(&source, &id).await,
            Err(e) => eprintln!("Error showing recipe: {}", e),
        },
        Commands::Featured => {
            let home = views::home(&source).await;
            println!("{}", render::home(&home));
        }
        Commands::Suggest => run_suggest(source, cfg.suggest()).await?,
    }

    Ok(())
}

async fn show(source: &SharedSource, id: &MealId) {
    let detail = views::recipe_detail(source.as_ref(), id).await;
    println!("{}", render::view(&detail, render::meal));
}

/// Drive the suggestion fetcher from stdin until EOF.
///
/// Plain lines replace the input text. Lines starting with `:` are key presses. The panel is
/// reprinted whenever the fetcher publishes a change.
async fn run_suggest(source: SharedSource, cfg: SuggestConfig) -> anyhow::Result<()> {
    let handle = suggest::spawn(source.clone(), cfg);
    let mut watcher = handle.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type to search. Keys: :down :up :enter :esc :focus. Ctrl-D to quit.");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Line::Text(text) => handle.type_text(text)?,
                    Line::Focus => handle.focus()?,
                    Line::Key(key) => match handle.press(key).await? {
                        PanelAction::Stay => {}
                        PanelAction::Commit(chosen) => match MealId::new(&chosen.id) {
                            Ok(id) => show(&source, &id).await,
                            Err(e) => eprintln!("Error showing recipe: {}", e),
                        },
                        PanelAction::Search(query) => {
                            if let Ok(query) = NonEmptyText::new(&query) {
                                let results = views::search_results(source.as_ref(), &query).await;
                                println!("{}", render::view(&results, |m| render::meal_list(m)));
                            }
                        }
                        PanelAction::ReleaseFocus => println!("(input blurred)"),
                    },
                }
            }
            panel = watcher.changed() => {
                println!("{}", render::panel(&panel?));
            }
        }
    }

    Ok(())
}
