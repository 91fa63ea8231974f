use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use albumdav::{
    cli::{self, Context, SyncOptions},
    config, error,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Token file holding the OAuth code and refresh token
    #[clap(long, global = true)]
    token: Option<PathBuf>,

    /// JSON file with the Google OAuth client_id and client_secret
    #[clap(long, global = true)]
    oauth_config: Option<PathBuf>,

    /// JSON file with the WebDAV hostname, login, password and path
    #[clap(long, global = true)]
    webdav_config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Google Photos
    Auth,

    /// List shared albums
    Albums(AlbumsOptions),

    /// Copy media of a shared album that the WebDAV folder is missing
    Sync(SyncArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    /// List albums owned by the account instead
    #[clap(long)]
    owned: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    /// Only report what would be transferred
    #[clap(long)]
    dry_run: bool,

    /// 1-based album index to sync without prompting
    #[clap(long)]
    album: Option<usize>,

    /// Scratch directory for downloads
    #[clap(long, default_value = config::DEFAULT_DOWNLOAD_DIR)]
    download_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env() {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let ctx = Context {
        token: cli.token.unwrap_or_else(config::token_path),
        oauth_config: cli.oauth_config.unwrap_or_else(config::oauth_config_path),
        webdav_config: cli.webdav_config.unwrap_or_else(config::webdav_config_path),
    };

    let result = match cli.command {
        Command::Auth => cli::auth(&ctx).await,
        Command::Albums(opt) => cli::albums(&ctx, opt.owned).await,
        Command::Sync(opt) => {
            cli::sync(
                &ctx,
                SyncOptions {
                    dry_run: opt.dry_run,
                    album: opt.album,
                    download_dir: opt.download_dir,
                },
            )
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}
