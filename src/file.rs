//! File import.
//!
//! A file begins with a fixed magic and a four-part header: major version
//! (which must match this runtime), minor version, a file id and the
//! property type table of contents used to skip properties unknown to the
//! compiled schema. The body is a stream of objects routed through the
//! import stack until end of input.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::artboard::Artboard;
use crate::assets::{DecodedAsset, FileAsset, FileAssetLoader};
use crate::core::object::CoreObject;
use crate::core::reader::BinaryReader;
use crate::core::registry::{self, FieldType, PropertyValue};
use crate::errors::{Result, VexelError};
use crate::importer::ImportStack;
use crate::render::Factory;

/// Magic bytes opening every file.
pub const MAGIC: [u8; 4] = *b"VEXL";
/// Major file version this runtime understands.
pub const MAJOR_VERSION: u64 = 7;
/// Minor file version this runtime writes.
pub const MINOR_VERSION: u64 = 0;

/// Nested artboards may not recurse deeper than this.
const MAX_NESTING_DEPTH: usize = 16;

/// Decoded header fields.
struct RuntimeHeader {
    #[allow(dead_code)]
    file_id: u64,
    /// Property key to field type, for keys the compiled schema lacks.
    property_toc: FxHashMap<u16, FieldType>,
}

impl RuntimeHeader {
    fn read(reader: &mut BinaryReader<'_>) -> Result<RuntimeHeader> {
        let mut magic = [0u8; 4];
        for byte in &mut magic {
            *byte = reader.read_u8();
        }
        if reader.has_error() || magic != MAGIC {
            return Err(VexelError::malformed("bad magic"));
        }
        let major = reader.read_var_u64();
        let minor = reader.read_var_u64();
        if reader.has_error() {
            return Err(VexelError::malformed("truncated header"));
        }
        if major != MAJOR_VERSION {
            return Err(VexelError::UnsupportedVersion { major, minor });
        }
        let file_id = reader.read_var_u64();
        let count = reader.read_var_u64();
        let mut property_toc = FxHashMap::default();
        for _ in 0..count {
            let key = reader.read_var_u32() as u16;
            let type_id = reader.read_var_u64();
            if reader.has_error() {
                return Err(VexelError::malformed("truncated property table"));
            }
            let Some(field_type) = FieldType::from_id(type_id) else {
                return Err(VexelError::malformed("bad field type in property table"));
            };
            property_toc.insert(key, field_type);
        }
        if reader.has_error() {
            return Err(VexelError::malformed("truncated header"));
        }
        Ok(RuntimeHeader {
            file_id,
            property_toc,
        })
    }
}

/// An imported file: immutable artboard definitions, shared animation and
/// state-machine definitions, and decoded assets.
pub struct File {
    artboards: Vec<Artboard>,
    assets: Vec<FileAsset>,
}

impl File {
    /// Imports a file, decoding in-band assets with the default rules.
    pub fn import(bytes: &[u8], factory: Arc<dyn Factory>) -> Result<File> {
        Self::read(bytes, factory, None)
    }

    /// Imports a file, offering every asset stub to `loader` first.
    pub fn import_with_loader(
        bytes: &[u8],
        factory: Arc<dyn Factory>,
        loader: &dyn FileAssetLoader,
    ) -> Result<File> {
        Self::read(bytes, factory, Some(loader))
    }

    fn read(
        bytes: &[u8],
        factory: Arc<dyn Factory>,
        loader: Option<&dyn FileAssetLoader>,
    ) -> Result<File> {
        let mut reader = BinaryReader::new(bytes);
        let header = RuntimeHeader::read(&mut reader)?;
        let mut stack = ImportStack::new(factory, loader);

        while !reader.reached_end() {
            match read_runtime_object(&mut reader, &header)? {
                Some(object) => stack.import_object(object)?,
                None => stack.read_null_object(),
            }
        }
        if reader.has_error() {
            return Err(VexelError::malformed("truncated object stream"));
        }
        stack.resolve()?;

        let mut artboards = stack.context.artboards;
        let assets = stack.context.assets;

        for artboard in &mut artboards {
            validate_keyed_data(artboard)?;
            if !artboard.initialize().can_continue() {
                return Err(VexelError::malformed("artboard failed to resolve"));
            }
            resolve_audio_events(artboard, &assets);
        }

        Ok(File { artboards, assets })
    }

    // ------------------------------------------------------------------
    // Artboard access
    // ------------------------------------------------------------------

    #[must_use]
    pub fn artboard_count(&self) -> usize {
        self.artboards.len()
    }

    /// The source artboard at `index`.
    #[must_use]
    pub fn artboard(&self, index: usize) -> Option<&Artboard> {
        self.artboards.get(index)
    }

    #[must_use]
    pub fn artboard_named(&self, name: &str) -> Option<&Artboard> {
        self.artboards.iter().find(|artboard| artboard.name() == name)
    }

    #[must_use]
    pub fn artboard_name_at(&self, index: usize) -> Option<String> {
        self.artboard(index).map(Artboard::name)
    }

    /// A fresh instance of the artboard at `index`, with nested artboards
    /// instanced recursively.
    #[must_use]
    pub fn instance_at(&self, index: usize) -> Option<Artboard> {
        self.instantiate(self.artboard(index)?, 0)
    }

    #[must_use]
    pub fn instance_named(&self, name: &str) -> Option<Artboard> {
        self.instantiate(self.artboard_named(name)?, 0)
    }

    /// An instance of the file's first artboard.
    #[must_use]
    pub fn instance_default(&self) -> Option<Artboard> {
        self.instance_at(0)
    }

    /// An instance of a specific source artboard of this file.
    #[must_use]
    pub fn instance_of(&self, source: &Artboard) -> Option<Artboard> {
        self.instantiate(source, 0)
    }

    fn instantiate(&self, source: &Artboard, depth: usize) -> Option<Artboard> {
        if depth > MAX_NESTING_DEPTH {
            log::warn!("nested artboards exceed depth {MAX_NESTING_DEPTH}; truncating");
            return None;
        }
        let mut instance = source.clone_for_instance();

        for id in instance.nested_artboards.clone() {
            let Some(CoreObject::NestedArtboard(nested)) = instance.object(id) else {
                continue;
            };
            let Some(artboard_id) = nested.artboard_id else {
                continue;
            };
            let inner = self
                .artboard(artboard_id as usize)
                .and_then(|inner_source| self.instantiate(inner_source, depth + 1));
            if let Some(CoreObject::NestedArtboard(nested)) = instance.object_mut(id) {
                nested.inner = inner.map(Box::new);
            }
        }

        if !instance.initialize().can_continue() {
            return None;
        }
        Some(instance)
    }

    // ------------------------------------------------------------------
    // Assets
    // ------------------------------------------------------------------

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn asset(&self, index: usize) -> Option<&FileAsset> {
        self.assets.get(index)
    }
}

/// Decodes one object from the stream: a type key, then properties until a
/// zero key. Unknown object types yield `None`; unknown properties with a
/// table entry are skipped; unknown properties without one are fatal.
fn read_runtime_object(
    reader: &mut BinaryReader<'_>,
    header: &RuntimeHeader,
) -> Result<Option<CoreObject>> {
    let type_key = reader.read_var_u32() as u16;
    if reader.has_error() {
        return Err(VexelError::malformed("truncated object header"));
    }
    let mut object = CoreObject::make(type_key);
    if object.is_none() {
        log::warn!("unknown object type {type_key}; keeping a null slot");
    }

    loop {
        let property_key = reader.read_var_u32() as u16;
        if reader.has_error() {
            return Err(VexelError::malformed("truncated property key"));
        }
        if property_key == 0 {
            break;
        }

        let field_type = registry::field_type(property_key)
            .or_else(|| header.property_toc.get(&property_key).copied())
            .ok_or_else(|| {
                VexelError::malformed(format!(
                    "unknown property key {property_key}, missing from property table"
                ))
            })?;

        let value = match field_type {
            FieldType::Uint => PropertyValue::Uint(reader.read_var_u64()),
            FieldType::Int => PropertyValue::Int(reader.read_var_i64()),
            FieldType::Float => PropertyValue::Float(reader.read_f32()),
            FieldType::Bool => PropertyValue::Bool(reader.read_bool()),
            FieldType::Color => PropertyValue::Color(reader.read_color()),
            FieldType::String => PropertyValue::Str(reader.read_str().to_string()),
            FieldType::Bytes => PropertyValue::Bytes(reader.read_bytes().to_vec()),
            // Callbacks carry no wire data.
            FieldType::Callback => continue,
        };
        if reader.has_error() {
            return Err(VexelError::malformed("truncated property value"));
        }

        if let Some(object) = &mut object {
            // A miss here is fine: the schema knows the field type but this
            // object simply does not carry the property.
            let _ = object.set(property_key, &value);
        }
    }
    Ok(object)
}

/// Keyed data must reference objects that exist and support the keyed
/// property. Missing objects are tolerated for forward compatibility;
/// unsupported properties reject the file.
fn validate_keyed_data(artboard: &Artboard) -> Result<()> {
    for animation in &artboard.animations {
        for keyed_object in &animation.keyed_objects {
            let Some(target) = artboard.object(keyed_object.object_id) else {
                log::warn!(
                    "animation '{}' keys missing object {}",
                    animation.name,
                    keyed_object.object_id
                );
                continue;
            };
            for property in &keyed_object.keyed_properties {
                if !registry::supports_property(target.type_key(), property.property_key) {
                    return Err(VexelError::malformed(format!(
                        "object type {} does not support keyed property {}",
                        target.type_key(),
                        property.property_key
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Wires each audio event to the decoded source of the asset it names.
fn resolve_audio_events(artboard: &mut Artboard, assets: &[FileAsset]) {
    for slot in &mut artboard.objects {
        if let Some(CoreObject::AudioEvent(event)) = slot {
            let source = assets
                .iter()
                .find(|asset| asset.asset_id == event.asset_id)
                .and_then(|asset| match &asset.decoded {
                    Some(DecodedAsset::Audio(source)) => Some(Arc::clone(source)),
                    _ => None,
                });
            event.source = source;
        }
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("artboards", &self.artboards.len())
            .field("assets", &self.assets.len())
            .finish()
    }
}