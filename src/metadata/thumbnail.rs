//! YouTube thumbnail selection.
//!
//! oEmbed responses for YouTube point at `.../hqdefault.jpg`. The file name is
//! `<quality><image>.jpg`, so swapping that segment picks another resolution
//! or another still of the same video.

use lazyframe_common::{ThumbnailImage, ThumbnailQuality, Vendor};

const DEFAULT_SEGMENT: &str = "hqdefault";

/// Adjust a fetched thumbnail URL for `vendor` using the node's hints.
///
/// Only YouTube URLs are rewritten, and only their first `hqdefault`
/// occurrence. Other vendors' URLs are returned untouched.
pub fn select_thumbnail(
    vendor: Vendor,
    url: &str,
    quality: ThumbnailQuality,
    image: ThumbnailImage,
) -> String {
    if !vendor.is_youtube() {
        return url.to_string();
    }
    url.replacen(DEFAULT_SEGMENT, &format!("{quality}{image}"), 1)
}
