//! Share-URL and download-filename derivation.
//!
//! Pure functions from an asset to the outward-facing strings: the
//! platform share URLs and the deterministic download filename. Actually
//! opening a browser tab or writing the file is the caller's business —
//! and note that sharing does NOT list an asset; the caller invokes
//! [`Session::mark_listed`](crate::session::Session::mark_listed)
//! separately.

use crate::asset::Asset;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Hashtags appended to the X share caption.
const X_HASHTAGS: &str = "#NFT #AIArt #NFTForge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    X,
    LinkedIn,
    GitHub,
}

impl SharePlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::LinkedIn => "linkedin",
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown share platform '{0}' (expected x, linkedin, or github)")]
pub struct ParseSharePlatformError(String);

impl FromStr for SharePlatform {
    type Err = ParseSharePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "linkedin" => Ok(Self::LinkedIn),
            "github" => Ok(Self::GitHub),
            _ => Err(ParseSharePlatformError(s.to_string())),
        }
    }
}

/// Build the platform-specific share URL for an asset.
///
/// `page_url` is the address the share should link back to (the "current
/// page" in a browser; configurable at the CLI).
pub fn share_url(platform: SharePlatform, asset: &Asset, page_url: &str) -> Url {
    match platform {
        SharePlatform::X => {
            let text = format!(
                "Check out my AI-generated NFT: \"{}\" {}",
                asset.prompt, X_HASHTAGS
            );
            build_url(
                "https://twitter.com/intent/tweet",
                &[("text", text.as_str()), ("url", page_url)],
            )
        }
        SharePlatform::LinkedIn => build_url(
            "https://www.linkedin.com/sharing/share-offsite/",
            &[("url", page_url)],
        ),
        SharePlatform::GitHub => {
            let name = format!("NFT-Asset-{}", asset.id.short());
            build_url(
                "https://github.com/new",
                &[("name", name.as_str()), ("description", &asset.prompt)],
            )
        }
    }
}

fn build_url(base: &str, params: &[(&str, &str)]) -> Url {
    // Bases are compile-time literals; parsing them cannot fail.
    let mut url = Url::parse(base).expect("static base URL");
    url.query_pairs_mut().extend_pairs(params);
    url
}

/// Deterministic download filename for an asset's raster.
///
/// Lowercased prompt, whitespace runs collapsed to single underscores
/// (leading/trailing whitespace dropped), prefixed `nft_`, suffixed
/// `.png`.
pub fn download_filename(prompt: &str) -> String {
    let slug = prompt
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("nft_{slug}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_asset;

    fn asset_with_id(prompt: &str, id: &str) -> Asset {
        let mut asset = sample_asset(prompt);
        asset.id = crate::asset::AssetId::from(id);
        asset
    }

    #[test]
    fn platform_parse_roundtrip() {
        for p in [SharePlatform::X, SharePlatform::LinkedIn, SharePlatform::GitHub] {
            assert_eq!(p.as_str().parse::<SharePlatform>(), Ok(p));
        }
        assert!("facebook".parse::<SharePlatform>().is_err());
    }

    #[test]
    fn x_url_carries_caption_and_page() {
        let asset = sample_asset("golden dragon");
        let url = share_url(SharePlatform::X, &asset, "https://forge.example/app");

        assert_eq!(url.host_str(), Some("twitter.com"));
        assert_eq!(url.path(), "/intent/tweet");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs[0].1,
            format!("Check out my AI-generated NFT: \"golden dragon\" {X_HASHTAGS}")
        );
        assert_eq!(pairs[1], ("url".to_string(), "https://forge.example/app".to_string()));
        // The caption must be percent-encoded in the raw URL.
        assert!(url.as_str().contains("text=Check+out") || url.as_str().contains("text=Check%20out"));
    }

    #[test]
    fn linkedin_url_is_offsite_share() {
        let asset = sample_asset("anything");
        let url = share_url(SharePlatform::LinkedIn, &asset, "https://forge.example/app");
        assert_eq!(
            url.as_str(),
            "https://www.linkedin.com/sharing/share-offsite/?url=https%3A%2F%2Fforge.example%2Fapp"
        );
    }

    #[test]
    fn github_url_uses_short_id_and_prompt() {
        let asset = asset_with_id("a neon city", "abcdef12-3456");
        let url = share_url(SharePlatform::GitHub, &asset, "https://forge.example/app");
        assert_eq!(url.host_str(), Some("github.com"));
        assert_eq!(url.path(), "/new");
        let name = url
            .query_pairs()
            .find(|(k, _)| k == "name")
            .map(|(_, v)| v.into_owned());
        assert_eq!(name.as_deref(), Some("NFT-Asset-abcdef12"));
        let description = url
            .query_pairs()
            .find(|(k, _)| k == "description")
            .map(|(_, v)| v.into_owned());
        assert_eq!(description.as_deref(), Some("a neon city"));
    }

    #[test]
    fn download_filename_slugs_the_prompt() {
        assert_eq!(download_filename("Golden Dragon"), "nft_golden_dragon.png");
        assert_eq!(
            download_filename("  Neon   City\tat Night "),
            "nft_neon_city_at_night.png"
        );
        assert_eq!(download_filename("single"), "nft_single.png");
    }

    #[test]
    fn download_filename_of_empty_prompt() {
        assert_eq!(download_filename(""), "nft_.png");
    }

    #[test]
    fn download_filename_is_deterministic() {
        assert_eq!(
            download_filename("Same Prompt"),
            download_filename("Same Prompt")
        );
    }
}
