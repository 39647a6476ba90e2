use image::{Rgba, RgbaImage};
use tracing::warn;

use crate::{error::IconError, model::IconId, provider::ForecastProvider};

/// Size of the small (`-s`) icon variant served by the icon endpoint.
pub const ICON_WIDTH: u32 = 75;
pub const ICON_HEIGHT: u32 = 45;

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xbd, 0xc3, 0xc7, 0xff]);

/// A decoded icon bitmap, owned by the card that shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    pub id: IconId,
    pub pixels: RgbaImage,
    /// Set when the real icon could not be fetched or decoded.
    pub placeholder: bool,
}

impl IconImage {
    pub fn placeholder(id: IconId) -> Self {
        Self {
            id,
            pixels: RgbaImage::from_pixel(ICON_WIDTH, ICON_HEIGHT, PLACEHOLDER_FILL),
            placeholder: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

pub fn decode_icon(id: IconId, bytes: &[u8]) -> Result<IconImage, IconError> {
    let pixels = image::load_from_memory(bytes)?.to_rgba8();
    Ok(IconImage { id, pixels, placeholder: false })
}

pub async fn try_load_icon(
    provider: &dyn ForecastProvider,
    id: IconId,
) -> Result<IconImage, IconError> {
    let bytes = provider.fetch_icon(id).await?;
    decode_icon(id, &bytes)
}

/// Fetch and decode an icon, substituting a placeholder on any failure.
pub async fn load_icon(provider: &dyn ForecastProvider, id: IconId) -> IconImage {
    match try_load_icon(provider, id).await {
        Ok(icon) => icon,
        Err(e) => {
            warn!(icon = %id, error = %e, "using placeholder icon");
            IconImage::placeholder(id)
        }
    }
}
