//! Command-line shim over the blogline library.
//!
//! Each subcommand builds the store from configuration, runs one or two hook
//! operations, and prints the resulting view model. The session token is kept
//! in the data directory between runs, so `login` once and the other commands
//! act as that user.
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami`, `password`
//! - `feed [recommended|most-liked|mine]`, `search`, `show`
//! - `like`, `comment`, `delete-comment`
//! - `post create|edit|delete`
//! - `profile [username]`
//! - `health`
//!
//! Errors are printed as the message a user would see and the process exits
//! with status 1.

#![allow(clippy::multiple_crate_versions)]

use blogline::api::HttpBlogApi;
use blogline::app::RegisterField;
use blogline::domain::{ImageUpload, Post};
use blogline::ui::format;
use blogline::ui::viewmodel::{
    feed_view, my_profile_header, post_card, post_detail_view, public_profile_header, FeedView,
    PageLink, PostCard, PostDetailView, ProfileHeader,
};
use blogline::worker::Feed;
use blogline::{initialize, observability, Config, Event, Result, Store};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "blogline")]
#[command(about = "Read and write on the blog platform from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: ~/.config/blogline/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Public handle (3-30 letters, digits, underscores)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List posts
    Feed {
        #[arg(value_enum, default_value = "recommended")]
        kind: FeedKind,

        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Narrow the page locally by fuzzy-matching titles and tags
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Search posts
    Search {
        query: String,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show a post with its comments
    Show {
        id: u64,

        /// Also list who liked it
        #[arg(long)]
        likes: bool,
    },

    /// Like or unlike a post
    Like { id: u64 },

    /// Comment on a post
    Comment { post_id: u64, text: String },

    /// Delete one of your comments
    DeleteComment { comment_id: u64, post_id: u64 },

    /// Write, edit or delete posts
    Post {
        #[command(subcommand)]
        command: PostCommand,
    },

    /// Show your profile, or another user's
    Profile {
        username: Option<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Change your password
    Password {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,

        #[arg(long)]
        confirm: String,
    },

    /// Check that the API answers
    Health,
}

#[derive(Subcommand)]
enum PostCommand {
    /// Publish a new post
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        /// Comma-separated, 1 to 5 tags
        #[arg(long)]
        tags: String,

        /// JPEG or PNG up to 5 MB
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Edit one of your posts
    Edit {
        id: u64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long)]
        tags: Option<String>,

        #[arg(short, long)]
        image: Option<PathBuf>,

        #[arg(long, conflicts_with = "image")]
        remove_image: bool,
    },

    /// Delete one of your posts
    Delete { id: u64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedKind {
    Recommended,
    MostLiked,
    Mine,
}

impl From<FeedKind> for Feed {
    fn from(kind: FeedKind) -> Self {
        match kind {
            FeedKind::Recommended => Self::Recommended,
            FeedKind::MostLiked => Self::MostLiked,
            FeedKind::Mine => Self::Mine,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    observability::init_tracing(&config);

    let result = match initialize(&config) {
        Ok(mut store) => run(&mut store, &config, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(store: &mut Store<HttpBlogApi>, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            store.auth().login_with(&email, &password).await?;
            match store.auth().user() {
                Some(user) => println!("Signed in as {}", user.name),
                None => println!("Signed in"),
            }
        }
        Commands::Register {
            name,
            email,
            password,
            username,
        } => {
            let mut auth = store.auth();
            auth.set_register_field(RegisterField::Name, name)?;
            auth.set_register_field(RegisterField::Username, username.unwrap_or_default())?;
            auth.set_register_field(RegisterField::Email, email)?;
            auth.set_register_field(RegisterField::Password, password.as_str())?;
            auth.set_register_field(RegisterField::ConfirmPassword, password)?;
            auth.register().await?;
            println!("Account created. Run `blogline login` to sign in.");
        }
        Commands::Logout => {
            store.auth().logout()?;
            println!("Signed out");
        }
        Commands::Whoami => match store.auth().load_user().await? {
            Some(user) => print_header(&my_profile_header(&user)),
            None => println!("Not signed in"),
        },
        Commands::Feed { kind, page, filter } => {
            store.posts().fetch(kind.into(), config.page(page)).await?;
            if let Some(filter) = filter {
                store.posts().set_quick_filter(filter)?;
            }
            print_feed(&feed_view(store.state()));
        }
        Commands::Search { query, page } => {
            store.posts().search(&query, config.page(page)).await?;
            print_feed(&feed_view(store.state()));
        }
        Commands::Show { id, likes } => {
            store.post().fetch(id).await?;
            store.comments().fetch(id).await?;
            if likes {
                store.post().fetch_likes(id).await?;
            }
            if let Some(view) = post_detail_view(store.state()) {
                print_detail(&view);
            }
        }
        Commands::Like { id } => {
            let likes = store.post().toggle_like(id).await?;
            println!("{}", format::count_label(likes, "like"));
        }
        Commands::Comment { post_id, text } => {
            let comment = store.comments().create(post_id, &text).await?;
            println!("Comment {} added", comment.id);
        }
        Commands::DeleteComment {
            comment_id,
            post_id,
        } => {
            store.comments().delete(comment_id, post_id).await?;
            println!("Comment deleted");
        }
        Commands::Post { command } => run_post(store, command).await?,
        Commands::Profile { username, page } => match username {
            Some(username) => {
                let profile = store
                    .profile()
                    .fetch_public_profile(&username, config.page(page))
                    .await?;
                let viewer = store.state().current_user_id();
                print_header(&public_profile_header(&profile, viewer));
                if let Some(posts) = &profile.posts {
                    println!();
                    for post in &posts.data {
                        print_card(&post_card(post, viewer));
                    }
                }
            }
            None => {
                let user = store.profile().fetch_my_profile().await?;
                print_header(&my_profile_header(&user));
            }
        },
        Commands::Password {
            current,
            new,
            confirm,
        } => {
            let mut profile = store.profile();
            let form = profile.password_form_mut();
            form.current.set(current);
            form.new.set(new);
            form.confirm.set(confirm);
            println!("{}", profile.change_password().await?);
        }
        Commands::Health => {
            for id in store.run(Event::CheckHealth).await? {
                store.take_outcome(id)?;
            }
            println!("API reachable at {}", config.api_base_url);
        }
    }
    Ok(())
}

async fn run_post(store: &mut Store<HttpBlogApi>, command: PostCommand) -> Result<()> {
    match command {
        PostCommand::Create {
            title,
            content,
            tags,
            image,
        } => {
            let mut hook = store.post();
            let composer = hook.composer_mut();
            composer.title.set(title);
            composer.content.set(content);
            composer.tags.set(tags);
            if let Some(path) = image {
                composer.set_image(ImageUpload::from_path(&path)?)?;
            }
            let post = hook.create().await?;
            println!("Published post {}: {}", post.id, post.title);
        }
        PostCommand::Edit {
            id,
            title,
            content,
            tags,
            image,
            remove_image,
        } => {
            let mut hook = store.post();
            let existing = hook.fetch(id).await?;
            hook.edit(&existing);
            let composer = hook.composer_mut();
            if let Some(title) = title {
                composer.title.set(title);
            }
            if let Some(content) = content {
                composer.content.set(content);
            }
            if let Some(tags) = tags {
                composer.tags.set(tags);
            }
            if let Some(path) = image {
                composer.set_image(ImageUpload::from_path(&path)?)?;
            }
            if remove_image {
                composer.clear_image();
            }
            let post: Post = hook.update().await?;
            println!("Updated post {}: {}", post.id, post.title);
        }
        PostCommand::Delete { id } => {
            store.post().delete(id).await?;
            println!("Post {id} deleted");
        }
    }
    Ok(())
}

fn print_card(card: &PostCard) {
    let mine = if card.is_own { " (yours)" } else { "" };
    println!("#{} {}{mine}", card.id, card.title);
    println!("   by {} · {}", card.author_name, card.posted);
    if !card.tags.is_empty() {
        let more = if card.more_tags > 0 {
            format!(" +{}", card.more_tags)
        } else {
            String::new()
        };
        println!("   [{}]{more}", card.tags.join(", "));
    }
    println!("   {}", card.excerpt);
    println!("   ♥ {}  💬 {}", card.likes, card.comments);
}

fn print_feed(feed: &FeedView) {
    println!("{}", feed.title);
    println!();
    if let Some(error) = &feed.error {
        println!("{error}");
        return;
    }
    if let Some(empty) = &feed.empty_state {
        println!("{}", empty.message);
        println!("{}", empty.subtitle);
        return;
    }
    for card in &feed.cards {
        print_card(card);
        println!();
    }
    if let Some(bar) = &feed.pagination {
        let links: Vec<String> = bar
            .links
            .iter()
            .map(|link| match link {
                PageLink::Page(n) if *n == bar.current => format!("[{n}]"),
                PageLink::Page(n) => n.to_string(),
                PageLink::Gap => "...".to_string(),
            })
            .collect();
        println!("Page {}", links.join(" "));
    }
}

fn print_detail(view: &PostDetailView) {
    println!("{}", view.title);
    let edited = if view.edited { " (edited)" } else { "" };
    println!("by {} (@{}) · {}{edited}", view.author_name, view.author_handle, view.posted);
    if !view.tags.is_empty() {
        println!("[{}]", view.tags.join(", "));
    }
    if let Some(image) = &view.image_url {
        println!("Image: {image}");
    }
    println!();
    println!("{}", view.content);
    println!();
    println!("{} · {}", view.likes, view.comment_count);
    if !view.liked_by.is_empty() {
        println!("Liked by {}", view.liked_by.join(", "));
    }
    println!();
    if let Some(empty) = &view.comments_empty {
        println!("{empty}");
    }
    for comment in &view.comments {
        let deletable = if comment.can_delete {
            format!("  (delete: blogline delete-comment {} {})", comment.id, view.id)
        } else {
            String::new()
        };
        println!("{} · {}{deletable}", comment.author_name, comment.posted);
        println!("  {}", comment.body);
    }
}

fn print_header(header: &ProfileHeader) {
    println!("{} {}", header.name, header.handle);
    if let Some(headline) = &header.headline {
        println!("{headline}");
    }
    if let Some(bio) = &header.bio {
        println!();
        println!("{bio}");
    }
    if let Some(count) = &header.post_count {
        println!("{count}");
    }
}
