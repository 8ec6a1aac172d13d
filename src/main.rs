mod commands;

use clap::{Parser, Subcommand};
use incognitus_core::config;

#[derive(Parser)]
#[command(
    name = "incognitus",
    version,
    about = "Incognitus: anonymous messaging mini-app client"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Launch payload to authenticate with (overrides `host.init_data`).
    #[arg(long, env = "INCOGNITUS_INIT_DATA", hide_env_values = true)]
    init_data: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect (or set) the UI language and print translated keys.
    Lang {
        /// Switch to this language instead of detecting one.
        #[arg(long)]
        set: Option<String>,
        /// Translation keys to resolve.
        keys: Vec<String>,
    },
    /// Check that the backend is reachable.
    Health,
    /// Show who a share link reaches.
    Link { token: String },
    /// Send an anonymous message through a share link.
    Send {
        token: String,
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Show your dashboard statistics.
    Dashboard,
    /// Show a public profile.
    Profile { token: String },
    /// Change your profile visibility.
    Visibility {
        #[arg(long)]
        public: Option<bool>,
        #[arg(long)]
        last_seen: Option<bool>,
        #[arg(long)]
        level: Option<bool>,
        #[arg(long)]
        active_days: Option<bool>,
        #[arg(long)]
        registered: Option<bool>,
    },
    /// List inbox messages.
    Inbox {
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        /// Walk every page instead of one.
        #[arg(long)]
        all: bool,
    },
    /// Mark an inbox message as read.
    Read { id: i64 },
    /// Manage your avatar.
    Avatar {
        #[command(subcommand)]
        action: AvatarAction,
    },
    /// Print the story-card image URL for a link token.
    StoryCard { token: String },
}

#[derive(Subcommand)]
enum AvatarAction {
    /// Upload a PNG or JPEG image.
    Upload { path: String },
    /// Remove the current avatar.
    Delete,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    // Logs go to stderr so command output on stdout stays pipeable.
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.incognitus.log_level)),
        )
        .with_writer(writer)
        .init();

    let app = commands::App::new(cfg, cli.init_data)?;

    match cli.command {
        Commands::Lang { set, keys } => app.lang(set.as_deref(), &keys).await?,
        Commands::Health => app.health().await?,
        Commands::Link { token } => app.link(&token).await?,
        Commands::Send { token, text } => {
            if text.is_empty() {
                anyhow::bail!("no message provided. Usage: incognitus send <token> <text>");
            }
            app.send(&token, &text.join(" ")).await?
        }
        Commands::Dashboard => app.dashboard().await?,
        Commands::Profile { token } => app.profile(&token).await?,
        Commands::Visibility {
            public,
            last_seen,
            level,
            active_days,
            registered,
        } => {
            let settings = incognitus_api::types::ProfileSettings {
                profile_public: public,
                profile_show_last_seen: last_seen,
                profile_show_level: level,
                profile_show_active_days: active_days,
                profile_show_registered: registered,
            };
            app.visibility(&settings).await?
        }
        Commands::Inbox { offset, limit, all } => app.inbox(offset, limit, all).await?,
        Commands::Read { id } => app.read(id).await?,
        Commands::Avatar { action } => match action {
            AvatarAction::Upload { path } => app.avatar_upload(&path).await?,
            AvatarAction::Delete => app.avatar_delete().await?,
        },
        Commands::StoryCard { token } => app.story_card(&token)?,
    }

    Ok(())
}
