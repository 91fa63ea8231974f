use crate::{
    Res,
    config::GoogleEndpoints,
    google::photos::{PhotosClient, collect_pages},
    info, utils,
};

use super::{Context, auth::access_token};

/// Prints shared albums, or the account's own albums with `owned`.
pub async fn albums(ctx: &Context, owned: bool) -> Res<()> {
    let token = access_token(ctx).await?;
    let photos = PhotosClient::new(token.access_token, &GoogleEndpoints::from_env());

    let pb = utils::spinner("Listing albums...");
    let result = if owned {
        collect_pages(|t| photos.list_albums(t)).await
    } else {
        collect_pages(|t| photos.list_shared_albums(t)).await
    };
    pb.finish_and_clear();
    let albums = result?;

    if albums.is_empty() {
        info!("No albums found.");
        return Ok(());
    }

    println!("{}", utils::album_table(&albums));
    Ok(())
}
