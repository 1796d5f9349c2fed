use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use blogroll::blog::CREATE_CATEGORIES;
use blogroll::config::Config;
use blogroll::render::{self, DEFAULT_WIDTH};
use blogroll::storage::StorageError;
use blogroll::{Action, Database, NewBlog, NewComment, Session, SessionOptions, SortBy};

/// Get the config directory path (~/.config/blogroll/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("blogroll"))
}

#[derive(Parser, Debug)]
#[command(name = "blogroll", about = "A single-user blog with local storage")]
struct Args {
    /// Config file (default: ~/.config/blogroll/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Storage database (overrides database_path from config)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Terminal width used for list output
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List posts using the saved filter and sort, optionally overridden
    List {
        /// Case-insensitive search over title, content and author
        #[arg(long, short)]
        search: Option<String>,
        /// Exact category, or "all"
        #[arg(long, short)]
        category: Option<String>,
        /// newest, likes or trending
        #[arg(long)]
        sort: Option<SortBy>,
    },
    /// Show a post with its comments
    Show { id: String },
    /// Publish a new post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: String,
        /// Image URL; a placeholder is generated when omitted
        #[arg(long)]
        thumbnail: Option<String>,
    },
    /// Like a post, or remove your like
    Like { id: String },
    /// Comment on a post
    Comment { id: String, text: String },
    /// List the categories available for filtering
    Categories,
    /// Save the category filter ("all" clears it)
    Filter { category: String },
    /// Save the sort mode
    Sort { mode: SortBy },
    /// Dispatch a raw JSON action, e.g. '{"type":"LIKE_BLOG","payload":{...}}'
    Dispatch { json: String },
    /// Delete all stored data (sample posts return on next run)
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let db_path = match (&args.db, &config.database_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => PathBuf::from(p),
        (None, None) => {
            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)
                    .context("Failed to create config directory")?;
            }
            config_dir.join("blogroll.db")
        }
    };

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db.with_quota(config.quota()),
        Err(StorageError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of blogroll appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to open storage: {}", e)),
    };

    // Before the session opens, which would seed the sample posts again
    if let Command::Reset = args.command {
        let removed = db.clear().await.context("Failed to clear storage")?;
        println!("Storage reset ({removed} keys removed).");
        return Ok(());
    }

    let mut session = Session::open(db, SessionOptions::from(&config)).await;
    run(&mut session, args.command, args.width).await
}

async fn run(session: &mut Session<Database>, command: Command, width: usize) -> Result<()> {
    let user = session.state().current_user.clone();

    match command {
        Command::List {
            search,
            category,
            sort,
        } => {
            // One-off overrides: applied in memory only, the saved view is untouched
            let mut state = session.state().clone();
            if let Some(term) = search {
                state = blogroll::reduce(state, Action::SetSearchTerm(term));
            }
            if let Some(category) = category {
                state = blogroll::reduce(state, Action::SetCategory(category));
            }
            if let Some(mode) = sort {
                state = blogroll::reduce(state, Action::SetSortBy(mode));
            }
            let query = blogroll::query::ViewQuery::from_state(&state);
            print!("{}", render::render_list(&state.visible(), &query, &user, width));
        }
        Command::Show { id } => match session.find(&id) {
            Some(blog) => print!("{}", render::render_post(blog, &user)),
            None => anyhow::bail!("Blog not found: {id}"),
        },
        Command::Create {
            title,
            content,
            category,
            thumbnail,
        } => {
            if !CREATE_CATEGORIES.contains(&category.as_str()) {
                tracing::warn!(category = %category, "Category is not one of the standard choices");
            }
            let id = session
                .create_blog(NewBlog {
                    title,
                    content,
                    category,
                    thumbnail,
                })
                .await
                .context("Failed to publish blog")?;
            println!("Published #{id}");
        }
        Command::Like { id } => {
            if session.find(&id).is_none() {
                anyhow::bail!("Blog not found: {id}");
            }
            session
                .toggle_like(&id)
                .await
                .context("Failed to save like")?;
            if let Some(blog) = session.find(&id) {
                let verb = if blog.has_liked(&user) { "Liked" } else { "Unliked" };
                println!("{verb} #{id} ({} likes)", blog.likes);
            }
        }
        Command::Comment { id, text } => {
            if session.find(&id).is_none() {
                anyhow::bail!("Blog not found: {id}");
            }
            let comment_id = session
                .add_comment(&id, NewComment::new(text))
                .await
                .context("Failed to add comment")?;
            println!("Commented on #{id} (comment {comment_id})");
        }
        Command::Categories => {
            let state = session.state();
            print!(
                "{}",
                render::render_categories(&state.categories(), &state.selected_category)
            );
        }
        Command::Filter { category } => {
            session
                .dispatch(Action::SetCategory(category))
                .await
                .context("Failed to save filter")?;
            println!(
                "Filter: {}",
                render::category_label(&session.state().selected_category)
            );
        }
        Command::Sort { mode } => {
            session
                .dispatch(Action::SetSortBy(mode))
                .await
                .context("Failed to save sort mode")?;
            println!("Sort: {mode}");
        }
        Command::Dispatch { json } => {
            let action = Action::from_json(&json).context("Invalid action")?;
            let kind = action.kind().to_owned();
            session
                .dispatch(action)
                .await
                .with_context(|| format!("Failed to save after {kind}"))?;
            println!("Dispatched {kind}");
        }
        // Handled in main before the session opens
        Command::Reset => {}
    }
    Ok(())
}
