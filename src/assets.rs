//! File assets.
//!
//! Image, font and audio assets arrive as in-file stubs, optionally
//! followed by an in-band contents object. Each stub is offered to the
//! host's [`FileAssetLoader`] during import together with the bytes (when
//! in-band) and the [`Factory`]; a declined stub stays undecoded, which is
//! not an error.

use std::sync::Arc;

use crate::audio::AudioSource;
use crate::core::registry::{PropertyValue, properties, types};
use crate::render::{Factory, RenderImage};

/// A decoded asset payload.
#[derive(Clone)]
pub enum DecodedAsset {
    Audio(Arc<AudioSource>),
    Image(Arc<dyn RenderImage>),
    /// Raw font bytes; shaping happens outside the core.
    Font(Arc<[u8]>),
}

/// An asset stub decoded from the file.
#[derive(Clone)]
pub struct FileAsset {
    pub type_key: u16,
    pub name: String,
    /// File-wide id referenced by users such as audio events.
    pub asset_id: u32,
    pub(crate) decoded: Option<DecodedAsset>,
}

impl FileAsset {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        Self {
            type_key,
            name: String::new(),
            asset_id: 0,
            decoded: None,
        }
    }

    #[must_use]
    pub fn decoded(&self) -> Option<&DecodedAsset> {
        self.decoded.as_ref()
    }

    /// Installs a decoded payload; hosts call this from custom loaders.
    pub fn set_decoded(&mut self, decoded: DecodedAsset) {
        self.decoded = Some(decoded);
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::ASSET_NAME, PropertyValue::Str(v)) => self.name = v.clone(),
            (properties::FILE_ASSET_ID, PropertyValue::Uint(v)) => self.asset_id = *v as u32,
            _ => return false,
        }
        true
    }

    /// Default in-band decode for hosts without a custom loader.
    pub(crate) fn decode_default(&mut self, bytes: &[u8], factory: &dyn Factory) {
        match self.type_key {
            types::AUDIO_ASSET => {
                self.decoded = Some(DecodedAsset::Audio(Arc::new(AudioSource {
                    name: self.name.clone(),
                    bytes: Arc::from(bytes),
                })));
            }
            types::IMAGE_ASSET => {
                self.decoded = factory.decode_image(bytes).map(DecodedAsset::Image);
            }
            types::FONT_ASSET => {
                self.decoded = Some(DecodedAsset::Font(Arc::from(bytes)));
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for FileAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAsset")
            .field("type_key", &self.type_key)
            .field("name", &self.name)
            .field("asset_id", &self.asset_id)
            .field("decoded", &self.decoded.is_some())
            .finish()
    }
}

/// In-band payload bytes trailing an asset stub.
#[derive(Debug, Clone, Default)]
pub struct FileAssetContents {
    pub bytes: Vec<u8>,
}

impl FileAssetContents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::FILE_ASSET_BYTES, PropertyValue::Bytes(v)) => {
                self.bytes = v.clone();
                true
            }
            _ => false,
        }
    }
}

/// Host hook resolving asset stubs to decoded payloads.
pub trait FileAssetLoader {
    /// Returns true when the asset was handled; otherwise the core falls
    /// back to its in-band default decode.
    fn load_contents(
        &self,
        asset: &mut FileAsset,
        bytes: Option<&[u8]>,
        factory: &dyn Factory,
    ) -> bool;
}
