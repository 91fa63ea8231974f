use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use crate::{
    Res,
    config::{GoogleEndpoints, WebDavConfig},
    google::photos::{PhotosClient, collect_pages},
    info, success,
    types::MediaItem,
    utils,
    webdav::WebDavClient,
};

use super::{Context, auth::access_token};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub dry_run: bool,
    /// Preselected 1-based album index; prompts when `None`.
    pub album: Option<usize>,
    pub download_dir: PathBuf,
}

/// Outcome of one run, mostly for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub album: Option<String>,
    pub media_count: usize,
    pub missing: Vec<String>,
    pub uploaded: usize,
}

pub async fn sync(ctx: &Context, opts: SyncOptions) -> Res<()> {
    let webdav = WebDavClient::new(WebDavConfig::load(&ctx.webdav_config).await?);
    let token = access_token(ctx).await?;
    let photos = PhotosClient::new(token.access_token, &GoogleEndpoints::from_env());

    let stdin = io::stdin();
    let report = run(&photos, &webdav, &opts, &mut stdin.lock(), &mut io::stdout()).await?;

    if let Some(album) = report.album {
        let skipped = report.media_count - report.missing.len();
        if opts.dry_run {
            success!(
                "Dry run for {}: {} to sync, {} already present",
                album,
                report.missing.len(),
                skipped
            );
        } else {
            success!(
                "Synced {}: {} uploaded, {} already present",
                album,
                report.uploaded,
                skipped
            );
        }
    }
    Ok(())
}

/// Runs the sync stages after authorization.
///
/// Returns early with an empty report when no shared album exists, without
/// reading `input`. Any failure aborts the remaining transfers.
pub async fn run<R: BufRead, W: Write>(
    photos: &PhotosClient,
    webdav: &WebDavClient,
    opts: &SyncOptions,
    input: &mut R,
    output: &mut W,
) -> Res<SyncReport> {
    info!("Listing shared albums");
    let pb = utils::spinner("Fetching shared albums...");
    let albums = collect_pages(|t| photos.list_shared_albums(t)).await;
    pb.finish_and_clear();
    let albums = albums?;

    if albums.is_empty() {
        info!("No shared albums found.");
        return Ok(SyncReport::default());
    }

    writeln!(output, "{}", utils::album_table(&albums))?;
    let album = match opts.album {
        Some(index) => utils::album_by_index(&albums, index)?,
        None => utils::prompt_album(&albums, input, output)?,
    };

    info!("Listing media in {}", album.title);
    let pb = utils::spinner("Fetching media items...");
    let media = collect_pages(|t| photos.list_album_media(&album.id, t)).await;
    pb.finish_and_clear();
    let media = media?;

    info!("Listing files in WebDAV folder {}", webdav.root());
    let remote = webdav.list(webdav.root()).await?;

    let missing = utils::missing_items(&media, &remote);
    info!(
        "{} of {} media items are missing remotely",
        missing.len(),
        media.len()
    );

    let uploaded = if opts.dry_run {
        for item in &missing {
            info!("Would sync the media file: {}", item.filename);
        }
        0
    } else {
        transfer(photos, webdav, &missing, opts).await?
    };

    Ok(SyncReport {
        album: Some(album.title.clone()),
        media_count: media.len(),
        missing: missing.iter().map(|m| m.filename.clone()).collect(),
        uploaded,
    })
}

async fn transfer(
    photos: &PhotosClient,
    webdav: &WebDavClient,
    missing: &[&MediaItem],
    opts: &SyncOptions,
) -> Res<usize> {
    if missing.is_empty() {
        return Ok(0);
    }

    async_fs::create_dir_all(&opts.download_dir).await?;

    let pb = utils::sync_bar(missing.len() as u64);
    for item in missing {
        pb.set_message(item.filename.clone());

        let local = match photos.download_media(item, &opts.download_dir).await {
            Ok(path) => path,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };
        let uploaded = webdav
            .upload(&webdav.remote_path_for(&item.filename), &local)
            .await;
        // the scratch copy goes away whether or not the upload worked
        let removed = async_fs::remove_file(&local).await;
        if let Err(e) = uploaded {
            pb.abandon();
            return Err(e);
        }
        removed?;

        pb.inc(1);
    }
    pb.finish_with_message("done");

    Ok(missing.len())
}
