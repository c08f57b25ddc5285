//! Schema tables.
//!
//! The object model is a single inheritance hierarchy flattened into static
//! tables: each concrete type key maps to its ordered chain of ancestor
//! keys, each property key maps to a field type and an owning type. The
//! tables drive decoding (what to read), forward compatibility (what to
//! skip) and validation (does an object support a keyed property).

/// Type keys of every schema type, concrete and abstract.
pub mod types {
    // Core hierarchy
    pub const COMPONENT: u16 = 10;
    pub const CONTAINER_COMPONENT: u16 = 11;
    pub const TRANSFORM_COMPONENT: u16 = 38;
    pub const WORLD_TRANSFORM_COMPONENT: u16 = 91;
    pub const NODE: u16 = 2;
    pub const DRAWABLE: u16 = 13;
    pub const SHAPE: u16 = 3;
    pub const ARTBOARD: u16 = 1;
    pub const NESTED_ARTBOARD: u16 = 92;
    pub const BACKBOARD: u16 = 23;
    pub const EVENT: u16 = 128;
    pub const AUDIO_EVENT: u16 = 407;

    // Animation
    pub const ANIMATION: u16 = 27;
    pub const LINEAR_ANIMATION: u16 = 31;
    pub const KEYED_OBJECT: u16 = 25;
    pub const KEYED_PROPERTY: u16 = 26;
    pub const KEYFRAME: u16 = 29;
    pub const KEYFRAME_DOUBLE: u16 = 30;
    pub const KEYFRAME_COLOR: u16 = 37;
    pub const KEYFRAME_ID: u16 = 50;
    pub const KEYFRAME_BOOL: u16 = 84;
    pub const KEYFRAME_CALLBACK: u16 = 171;
    pub const CUBIC_INTERPOLATOR: u16 = 139;
    pub const CUBIC_EASE_INTERPOLATOR: u16 = 28;
    pub const CUBIC_VALUE_INTERPOLATOR: u16 = 138;

    // State machines
    pub const STATE_MACHINE: u16 = 53;
    pub const STATE_MACHINE_COMPONENT: u16 = 54;
    pub const STATE_MACHINE_INPUT: u16 = 55;
    pub const STATE_MACHINE_NUMBER: u16 = 56;
    pub const STATE_MACHINE_LAYER: u16 = 57;
    pub const STATE_MACHINE_TRIGGER: u16 = 58;
    pub const STATE_MACHINE_BOOL: u16 = 59;
    pub const LAYER_STATE: u16 = 60;
    pub const ANIMATION_STATE: u16 = 61;
    pub const ANY_STATE: u16 = 62;
    pub const ENTRY_STATE: u16 = 63;
    pub const EXIT_STATE: u16 = 64;
    pub const STATE_TRANSITION: u16 = 65;
    pub const STATE_MACHINE_LAYER_COMPONENT: u16 = 66;
    pub const TRANSITION_CONDITION: u16 = 67;
    pub const TRANSITION_TRIGGER_CONDITION: u16 = 68;
    pub const TRANSITION_VALUE_CONDITION: u16 = 69;
    pub const TRANSITION_NUMBER_CONDITION: u16 = 70;
    pub const TRANSITION_BOOL_CONDITION: u16 = 71;
    pub const BLEND_STATE: u16 = 72;
    pub const BLEND_STATE_DIRECT: u16 = 73;
    pub const BLEND_ANIMATION: u16 = 74;
    pub const BLEND_ANIMATION_1D: u16 = 75;
    pub const BLEND_STATE_1D: u16 = 76;
    pub const BLEND_ANIMATION_DIRECT: u16 = 77;
    pub const BLEND_STATE_TRANSITION: u16 = 78;
    pub const STATE_MACHINE_LISTENER: u16 = 114;
    pub const LISTENER_TRIGGER_CHANGE: u16 = 115;
    pub const LISTENER_INPUT_CHANGE: u16 = 116;
    pub const LISTENER_BOOL_CHANGE: u16 = 117;
    pub const LISTENER_NUMBER_CHANGE: u16 = 118;
    pub const LISTENER_ACTION: u16 = 125;
    pub const LISTENER_ALIGN_TARGET: u16 = 126;
    pub const LISTENER_FIRE_EVENT: u16 = 168;
    pub const STATE_MACHINE_FIRE_EVENT: u16 = 169;

    // Nested artboards
    pub const NESTED_ANIMATION: u16 = 93;
    pub const NESTED_STATE_MACHINE: u16 = 95;
    pub const NESTED_SIMPLE_ANIMATION: u16 = 96;
    pub const NESTED_LINEAR_ANIMATION: u16 = 97;
    pub const NESTED_REMAP_ANIMATION: u16 = 98;
    pub const NESTED_INPUT: u16 = 121;
    pub const NESTED_TRIGGER: u16 = 122;
    pub const NESTED_BOOL: u16 = 123;
    pub const NESTED_NUMBER: u16 = 124;

    // Assets
    pub const ASSET: u16 = 100;
    pub const FILE_ASSET: u16 = 103;
    pub const IMAGE_ASSET: u16 = 105;
    pub const FILE_ASSET_CONTENTS: u16 = 106;
    pub const FONT_ASSET: u16 = 141;
    pub const AUDIO_ASSET: u16 = 406;
}

/// Property keys. Globally unique across the schema.
pub mod properties {
    // Component
    pub const NAME: u16 = 4;
    pub const PARENT_ID: u16 = 5;

    // Artboard
    pub const ARTBOARD_WIDTH: u16 = 7;
    pub const ARTBOARD_HEIGHT: u16 = 8;
    pub const ARTBOARD_X: u16 = 9;
    pub const ARTBOARD_Y: u16 = 10;
    pub const ARTBOARD_ORIGIN_X: u16 = 11;
    pub const ARTBOARD_ORIGIN_Y: u16 = 12;
    pub const ARTBOARD_CLIP: u16 = 19;
    pub const ARTBOARD_DEFAULT_STATE_MACHINE_ID: u16 = 236;

    // Node
    pub const NODE_X: u16 = 13;
    pub const NODE_Y: u16 = 14;
    pub const NODE_ROTATION: u16 = 15;
    pub const NODE_SCALE_X: u16 = 16;
    pub const NODE_SCALE_Y: u16 = 17;
    pub const NODE_OPACITY: u16 = 18;

    // Drawable / Shape
    pub const SHAPE_WIDTH: u16 = 20;
    pub const SHAPE_HEIGHT: u16 = 21;
    pub const SHAPE_FILL_COLOR: u16 = 24;
    pub const DRAWABLE_BLEND_MODE: u16 = 23;
    pub const DRAWABLE_FLAGS: u16 = 129;

    // Keyed animation data
    pub const KEYED_OBJECT_ID: u16 = 51;
    pub const KEYED_PROPERTY_KEY: u16 = 53;
    pub const ANIMATION_NAME: u16 = 55;
    pub const ANIMATION_FPS: u16 = 56;
    pub const ANIMATION_DURATION: u16 = 57;
    pub const ANIMATION_SPEED: u16 = 58;
    pub const ANIMATION_LOOP: u16 = 59;
    pub const ANIMATION_WORK_START: u16 = 60;
    pub const ANIMATION_WORK_END: u16 = 61;
    pub const ANIMATION_ENABLE_WORK_AREA: u16 = 62;
    pub const INTERPOLATOR_X1: u16 = 63;
    pub const INTERPOLATOR_Y1: u16 = 64;
    pub const INTERPOLATOR_X2: u16 = 65;
    pub const INTERPOLATOR_Y2: u16 = 66;
    pub const KEYFRAME_FRAME: u16 = 67;
    pub const KEYFRAME_INTERPOLATION: u16 = 68;
    pub const KEYFRAME_INTERPOLATOR_ID: u16 = 69;
    pub const KEYFRAME_VALUE_DOUBLE: u16 = 70;
    pub const KEYFRAME_VALUE_COLOR: u16 = 88;
    pub const KEYFRAME_VALUE_ID: u16 = 122;
    pub const KEYFRAME_VALUE_BOOL: u16 = 181;

    // State machines
    pub const STATE_MACHINE_COMPONENT_NAME: u16 = 138;
    pub const INPUT_VALUE_BOOL: u16 = 140;
    pub const INPUT_VALUE_NUMBER: u16 = 141;
    pub const ANIMATION_STATE_ID: u16 = 149;
    pub const TRANSITION_STATE_TO: u16 = 151;
    pub const TRANSITION_FLAGS: u16 = 152;
    pub const CONDITION_INPUT_ID: u16 = 155;
    pub const CONDITION_OP: u16 = 156;
    pub const CONDITION_VALUE: u16 = 157;
    pub const TRANSITION_DURATION: u16 = 158;
    pub const TRANSITION_EXIT_TIME: u16 = 160;
    pub const TRANSITION_INTERPOLATOR_ID: u16 = 161;
    pub const BLEND_ANIMATION_ID: u16 = 165;
    pub const BLEND_ANIMATION_VALUE: u16 = 166;
    pub const BLEND_STATE_INPUT_ID: u16 = 167;
    pub const TRANSITION_EXIT_BLEND_ANIMATION_ID: u16 = 171;
    pub const BLEND_ANIMATION_DIRECT_INPUT_ID: u16 = 295;
    pub const BLEND_ANIMATION_DIRECT_MIX: u16 = 297;
    pub const LISTENER_TARGET_ID: u16 = 224;
    pub const LISTENER_TYPE: u16 = 225;
    pub const LISTENER_INPUT_ID: u16 = 227;
    pub const LISTENER_BOOL_VALUE: u16 = 228;
    pub const LISTENER_NUMBER_VALUE: u16 = 229;
    pub const LISTENER_ALIGN_TARGET_ID: u16 = 240;
    pub const LISTENER_EVENT_ID: u16 = 389;
    pub const FIRE_EVENT_ID: u16 = 392;
    pub const FIRE_EVENT_OCCURS: u16 = 393;
    pub const EVENT_TRIGGER: u16 = 395;

    // Nested artboards
    pub const NESTED_ARTBOARD_ID: u16 = 197;
    pub const NESTED_ANIMATION_ID: u16 = 198;
    pub const NESTED_ANIMATION_SPEED: u16 = 199;
    pub const NESTED_ANIMATION_MIX: u16 = 200;
    pub const NESTED_ANIMATION_IS_PLAYING: u16 = 201;
    pub const NESTED_ANIMATION_TIME: u16 = 202;
    pub const NESTED_INPUT_ID: u16 = 237;
    pub const NESTED_VALUE_BOOL: u16 = 238;
    pub const NESTED_VALUE_NUMBER: u16 = 239;
    pub const NESTED_TRIGGER_FIRE: u16 = 401;

    // Assets
    pub const ASSET_NAME: u16 = 203;
    pub const FILE_ASSET_ID: u16 = 204;
    pub const FILE_ASSET_BYTES: u16 = 212;
    pub const AUDIO_EVENT_ASSET_ID: u16 = 408;
}

/// Field types a property can carry on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Uint,
    String,
    Float,
    Color,
    Bool,
    Bytes,
    Int,
    Callback,
}

impl FieldType {
    /// Wire id of the field type, as stored in the property type table of
    /// contents.
    #[must_use]
    pub fn id(self) -> u64 {
        match self {
            FieldType::Uint => 0,
            FieldType::String => 1,
            FieldType::Float => 2,
            FieldType::Color => 3,
            FieldType::Bool => 4,
            FieldType::Bytes => 5,
            FieldType::Int => 6,
            FieldType::Callback => 7,
        }
    }

    #[must_use]
    pub fn from_id(id: u64) -> Option<FieldType> {
        Some(match id {
            0 => FieldType::Uint,
            1 => FieldType::String,
            2 => FieldType::Float,
            3 => FieldType::Color,
            4 => FieldType::Bool,
            5 => FieldType::Bytes,
            6 => FieldType::Int,
            7 => FieldType::Callback,
            _ => return None,
        })
    }
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Uint(u64),
    Int(i64),
    Float(f32),
    Bool(bool),
    Color(u32),
    Str(String),
    Bytes(Vec<u8>),
}

/// Field type of a property key in the compiled schema, or `None` when the
/// key is unknown to this runtime (the file's type table may still know it).
#[must_use]
pub fn field_type(property_key: u16) -> Option<FieldType> {
    use properties as p;
    Some(match property_key {
        p::NAME | p::ANIMATION_NAME | p::STATE_MACHINE_COMPONENT_NAME | p::ASSET_NAME => {
            FieldType::String
        }

        p::PARENT_ID
        | p::ARTBOARD_DEFAULT_STATE_MACHINE_ID
        | p::DRAWABLE_BLEND_MODE
        | p::DRAWABLE_FLAGS
        | p::KEYED_OBJECT_ID
        | p::KEYED_PROPERTY_KEY
        | p::ANIMATION_FPS
        | p::ANIMATION_DURATION
        | p::ANIMATION_LOOP
        | p::ANIMATION_WORK_START
        | p::ANIMATION_WORK_END
        | p::KEYFRAME_FRAME
        | p::KEYFRAME_INTERPOLATION
        | p::KEYFRAME_INTERPOLATOR_ID
        | p::KEYFRAME_VALUE_ID
        | p::ANIMATION_STATE_ID
        | p::TRANSITION_STATE_TO
        | p::TRANSITION_FLAGS
        | p::TRANSITION_DURATION
        | p::TRANSITION_EXIT_TIME
        | p::TRANSITION_INTERPOLATOR_ID
        | p::TRANSITION_EXIT_BLEND_ANIMATION_ID
        | p::CONDITION_INPUT_ID
        | p::CONDITION_OP
        | p::BLEND_ANIMATION_ID
        | p::BLEND_STATE_INPUT_ID
        | p::BLEND_ANIMATION_DIRECT_INPUT_ID
        | p::LISTENER_TARGET_ID
        | p::LISTENER_TYPE
        | p::LISTENER_INPUT_ID
        | p::LISTENER_BOOL_VALUE
        | p::LISTENER_ALIGN_TARGET_ID
        | p::LISTENER_EVENT_ID
        | p::FIRE_EVENT_ID
        | p::FIRE_EVENT_OCCURS
        | p::NESTED_ARTBOARD_ID
        | p::NESTED_ANIMATION_ID
        | p::NESTED_INPUT_ID
        | p::FILE_ASSET_ID
        | p::AUDIO_EVENT_ASSET_ID => FieldType::Uint,

        p::ARTBOARD_WIDTH
        | p::ARTBOARD_HEIGHT
        | p::ARTBOARD_X
        | p::ARTBOARD_Y
        | p::ARTBOARD_ORIGIN_X
        | p::ARTBOARD_ORIGIN_Y
        | p::NODE_X
        | p::NODE_Y
        | p::NODE_ROTATION
        | p::NODE_SCALE_X
        | p::NODE_SCALE_Y
        | p::NODE_OPACITY
        | p::SHAPE_WIDTH
        | p::SHAPE_HEIGHT
        | p::ANIMATION_SPEED
        | p::INTERPOLATOR_X1
        | p::INTERPOLATOR_Y1
        | p::INTERPOLATOR_X2
        | p::INTERPOLATOR_Y2
        | p::KEYFRAME_VALUE_DOUBLE
        | p::INPUT_VALUE_NUMBER
        | p::CONDITION_VALUE
        | p::BLEND_ANIMATION_VALUE
        | p::BLEND_ANIMATION_DIRECT_MIX
        | p::LISTENER_NUMBER_VALUE
        | p::NESTED_ANIMATION_SPEED
        | p::NESTED_ANIMATION_MIX
        | p::NESTED_ANIMATION_TIME
        | p::NESTED_VALUE_NUMBER => FieldType::Float,

        p::ARTBOARD_CLIP
        | p::ANIMATION_ENABLE_WORK_AREA
        | p::KEYFRAME_VALUE_BOOL
        | p::INPUT_VALUE_BOOL
        | p::NESTED_ANIMATION_IS_PLAYING
        | p::NESTED_VALUE_BOOL => FieldType::Bool,

        p::SHAPE_FILL_COLOR | p::KEYFRAME_VALUE_COLOR => FieldType::Color,

        p::FILE_ASSET_BYTES => FieldType::Bytes,

        p::EVENT_TRIGGER | p::NESTED_TRIGGER_FIRE => FieldType::Callback,

        _ => return None,
    })
}

/// Callback properties never apply ordinary keyframes; they fire.
#[must_use]
pub fn is_callback(property_key: u16) -> bool {
    field_type(property_key) == Some(FieldType::Callback)
}

/// The type that declares a property key.
#[must_use]
pub fn property_owner(property_key: u16) -> Option<u16> {
    use properties as p;
    use types as t;
    Some(match property_key {
        p::NAME | p::PARENT_ID => t::COMPONENT,
        p::ARTBOARD_WIDTH
        | p::ARTBOARD_HEIGHT
        | p::ARTBOARD_X
        | p::ARTBOARD_Y
        | p::ARTBOARD_ORIGIN_X
        | p::ARTBOARD_ORIGIN_Y
        | p::ARTBOARD_CLIP
        | p::ARTBOARD_DEFAULT_STATE_MACHINE_ID => t::ARTBOARD,
        p::NODE_X | p::NODE_Y | p::NODE_ROTATION | p::NODE_SCALE_X | p::NODE_SCALE_Y => t::NODE,
        p::NODE_OPACITY => t::WORLD_TRANSFORM_COMPONENT,
        p::DRAWABLE_BLEND_MODE | p::DRAWABLE_FLAGS => t::DRAWABLE,
        p::SHAPE_WIDTH | p::SHAPE_HEIGHT | p::SHAPE_FILL_COLOR => t::SHAPE,
        p::KEYED_OBJECT_ID => t::KEYED_OBJECT,
        p::KEYED_PROPERTY_KEY => t::KEYED_PROPERTY,
        p::ANIMATION_NAME => t::ANIMATION,
        p::ANIMATION_FPS
        | p::ANIMATION_DURATION
        | p::ANIMATION_SPEED
        | p::ANIMATION_LOOP
        | p::ANIMATION_WORK_START
        | p::ANIMATION_WORK_END
        | p::ANIMATION_ENABLE_WORK_AREA => t::LINEAR_ANIMATION,
        p::INTERPOLATOR_X1 | p::INTERPOLATOR_Y1 | p::INTERPOLATOR_X2 | p::INTERPOLATOR_Y2 => {
            t::CUBIC_INTERPOLATOR
        }
        p::KEYFRAME_FRAME | p::KEYFRAME_INTERPOLATION | p::KEYFRAME_INTERPOLATOR_ID => t::KEYFRAME,
        p::KEYFRAME_VALUE_DOUBLE => t::KEYFRAME_DOUBLE,
        p::KEYFRAME_VALUE_COLOR => t::KEYFRAME_COLOR,
        p::KEYFRAME_VALUE_ID => t::KEYFRAME_ID,
        p::KEYFRAME_VALUE_BOOL => t::KEYFRAME_BOOL,
        p::STATE_MACHINE_COMPONENT_NAME => t::STATE_MACHINE_COMPONENT,
        p::INPUT_VALUE_BOOL => t::STATE_MACHINE_BOOL,
        p::INPUT_VALUE_NUMBER => t::STATE_MACHINE_NUMBER,
        p::ANIMATION_STATE_ID => t::ANIMATION_STATE,
        p::TRANSITION_STATE_TO
        | p::TRANSITION_FLAGS
        | p::TRANSITION_DURATION
        | p::TRANSITION_EXIT_TIME
        | p::TRANSITION_INTERPOLATOR_ID => t::STATE_TRANSITION,
        p::TRANSITION_EXIT_BLEND_ANIMATION_ID => t::BLEND_STATE_TRANSITION,
        p::CONDITION_INPUT_ID => t::TRANSITION_CONDITION,
        p::CONDITION_OP => t::TRANSITION_VALUE_CONDITION,
        p::CONDITION_VALUE => t::TRANSITION_NUMBER_CONDITION,
        p::BLEND_ANIMATION_ID => t::BLEND_ANIMATION,
        p::BLEND_ANIMATION_VALUE => t::BLEND_ANIMATION_1D,
        p::BLEND_STATE_INPUT_ID => t::BLEND_STATE_1D,
        p::BLEND_ANIMATION_DIRECT_INPUT_ID | p::BLEND_ANIMATION_DIRECT_MIX => {
            t::BLEND_ANIMATION_DIRECT
        }
        p::LISTENER_TARGET_ID | p::LISTENER_TYPE => t::STATE_MACHINE_LISTENER,
        p::LISTENER_INPUT_ID => t::LISTENER_INPUT_CHANGE,
        p::LISTENER_BOOL_VALUE => t::LISTENER_BOOL_CHANGE,
        p::LISTENER_NUMBER_VALUE => t::LISTENER_NUMBER_CHANGE,
        p::LISTENER_ALIGN_TARGET_ID => t::LISTENER_ALIGN_TARGET,
        p::LISTENER_EVENT_ID => t::LISTENER_FIRE_EVENT,
        p::FIRE_EVENT_ID | p::FIRE_EVENT_OCCURS => t::STATE_MACHINE_FIRE_EVENT,
        p::EVENT_TRIGGER => t::EVENT,
        p::NESTED_ARTBOARD_ID => t::NESTED_ARTBOARD,
        p::NESTED_ANIMATION_ID => t::NESTED_ANIMATION,
        p::NESTED_ANIMATION_SPEED | p::NESTED_ANIMATION_IS_PLAYING => t::NESTED_SIMPLE_ANIMATION,
        p::NESTED_ANIMATION_MIX => t::NESTED_LINEAR_ANIMATION,
        p::NESTED_ANIMATION_TIME => t::NESTED_REMAP_ANIMATION,
        p::NESTED_INPUT_ID => t::NESTED_INPUT,
        p::NESTED_VALUE_BOOL => t::NESTED_BOOL,
        p::NESTED_VALUE_NUMBER => t::NESTED_NUMBER,
        p::NESTED_TRIGGER_FIRE => t::NESTED_TRIGGER,
        p::ASSET_NAME => t::ASSET,
        p::FILE_ASSET_ID => t::FILE_ASSET,
        p::FILE_ASSET_BYTES => t::FILE_ASSET_CONTENTS,
        p::AUDIO_EVENT_ASSET_ID => t::AUDIO_EVENT,
        _ => return None,
    })
}

/// Ordered inheritance chain of a concrete type key, starting with the key
/// itself and ending at the hierarchy root.
#[must_use]
pub fn ancestors(type_key: u16) -> &'static [u16] {
    use types as t;
    match type_key {
        t::ARTBOARD => &[
            t::ARTBOARD,
            t::WORLD_TRANSFORM_COMPONENT,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::NODE => &[
            t::NODE,
            t::TRANSFORM_COMPONENT,
            t::WORLD_TRANSFORM_COMPONENT,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::SHAPE => &[
            t::SHAPE,
            t::DRAWABLE,
            t::NODE,
            t::TRANSFORM_COMPONENT,
            t::WORLD_TRANSFORM_COMPONENT,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::NESTED_ARTBOARD => &[
            t::NESTED_ARTBOARD,
            t::DRAWABLE,
            t::NODE,
            t::TRANSFORM_COMPONENT,
            t::WORLD_TRANSFORM_COMPONENT,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::BACKBOARD => &[t::BACKBOARD],
        t::EVENT => &[t::EVENT, t::CONTAINER_COMPONENT, t::COMPONENT],
        t::AUDIO_EVENT => &[t::AUDIO_EVENT, t::EVENT, t::CONTAINER_COMPONENT, t::COMPONENT],

        t::CUBIC_EASE_INTERPOLATOR => &[
            t::CUBIC_EASE_INTERPOLATOR,
            t::CUBIC_INTERPOLATOR,
            t::COMPONENT,
        ],
        t::CUBIC_VALUE_INTERPOLATOR => &[
            t::CUBIC_VALUE_INTERPOLATOR,
            t::CUBIC_INTERPOLATOR,
            t::COMPONENT,
        ],

        t::LINEAR_ANIMATION => &[t::LINEAR_ANIMATION, t::ANIMATION],
        t::STATE_MACHINE => &[t::STATE_MACHINE, t::ANIMATION],
        t::KEYED_OBJECT => &[t::KEYED_OBJECT],
        t::KEYED_PROPERTY => &[t::KEYED_PROPERTY],
        t::KEYFRAME_DOUBLE => &[t::KEYFRAME_DOUBLE, t::KEYFRAME],
        t::KEYFRAME_COLOR => &[t::KEYFRAME_COLOR, t::KEYFRAME],
        t::KEYFRAME_ID => &[t::KEYFRAME_ID, t::KEYFRAME],
        t::KEYFRAME_BOOL => &[t::KEYFRAME_BOOL, t::KEYFRAME],
        t::KEYFRAME_CALLBACK => &[t::KEYFRAME_CALLBACK, t::KEYFRAME],

        t::STATE_MACHINE_LAYER => &[t::STATE_MACHINE_LAYER, t::STATE_MACHINE_COMPONENT],
        t::STATE_MACHINE_BOOL => &[
            t::STATE_MACHINE_BOOL,
            t::STATE_MACHINE_INPUT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::STATE_MACHINE_NUMBER => &[
            t::STATE_MACHINE_NUMBER,
            t::STATE_MACHINE_INPUT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::STATE_MACHINE_TRIGGER => &[
            t::STATE_MACHINE_TRIGGER,
            t::STATE_MACHINE_INPUT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::ANIMATION_STATE => &[
            t::ANIMATION_STATE,
            t::LAYER_STATE,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::ANY_STATE => &[
            t::ANY_STATE,
            t::LAYER_STATE,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::ENTRY_STATE => &[
            t::ENTRY_STATE,
            t::LAYER_STATE,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::EXIT_STATE => &[
            t::EXIT_STATE,
            t::LAYER_STATE,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::BLEND_STATE_1D => &[
            t::BLEND_STATE_1D,
            t::BLEND_STATE,
            t::LAYER_STATE,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::BLEND_STATE_DIRECT => &[
            t::BLEND_STATE_DIRECT,
            t::BLEND_STATE,
            t::LAYER_STATE,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::STATE_TRANSITION => &[
            t::STATE_TRANSITION,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::BLEND_STATE_TRANSITION => &[
            t::BLEND_STATE_TRANSITION,
            t::STATE_TRANSITION,
            t::STATE_MACHINE_LAYER_COMPONENT,
            t::STATE_MACHINE_COMPONENT,
        ],
        t::TRANSITION_TRIGGER_CONDITION => {
            &[t::TRANSITION_TRIGGER_CONDITION, t::TRANSITION_CONDITION]
        }
        t::TRANSITION_NUMBER_CONDITION => &[
            t::TRANSITION_NUMBER_CONDITION,
            t::TRANSITION_VALUE_CONDITION,
            t::TRANSITION_CONDITION,
        ],
        t::TRANSITION_BOOL_CONDITION => &[
            t::TRANSITION_BOOL_CONDITION,
            t::TRANSITION_VALUE_CONDITION,
            t::TRANSITION_CONDITION,
        ],
        t::BLEND_ANIMATION_1D => &[t::BLEND_ANIMATION_1D, t::BLEND_ANIMATION],
        t::BLEND_ANIMATION_DIRECT => &[t::BLEND_ANIMATION_DIRECT, t::BLEND_ANIMATION],
        t::STATE_MACHINE_LISTENER => &[t::STATE_MACHINE_LISTENER, t::STATE_MACHINE_COMPONENT],
        t::LISTENER_BOOL_CHANGE => &[
            t::LISTENER_BOOL_CHANGE,
            t::LISTENER_INPUT_CHANGE,
            t::LISTENER_ACTION,
        ],
        t::LISTENER_NUMBER_CHANGE => &[
            t::LISTENER_NUMBER_CHANGE,
            t::LISTENER_INPUT_CHANGE,
            t::LISTENER_ACTION,
        ],
        t::LISTENER_TRIGGER_CHANGE => &[
            t::LISTENER_TRIGGER_CHANGE,
            t::LISTENER_INPUT_CHANGE,
            t::LISTENER_ACTION,
        ],
        t::LISTENER_ALIGN_TARGET => &[t::LISTENER_ALIGN_TARGET, t::LISTENER_ACTION],
        t::LISTENER_FIRE_EVENT => &[t::LISTENER_FIRE_EVENT, t::LISTENER_ACTION],
        t::STATE_MACHINE_FIRE_EVENT => &[t::STATE_MACHINE_FIRE_EVENT],

        t::NESTED_SIMPLE_ANIMATION => &[
            t::NESTED_SIMPLE_ANIMATION,
            t::NESTED_LINEAR_ANIMATION,
            t::NESTED_ANIMATION,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::NESTED_REMAP_ANIMATION => &[
            t::NESTED_REMAP_ANIMATION,
            t::NESTED_LINEAR_ANIMATION,
            t::NESTED_ANIMATION,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::NESTED_STATE_MACHINE => &[
            t::NESTED_STATE_MACHINE,
            t::NESTED_ANIMATION,
            t::CONTAINER_COMPONENT,
            t::COMPONENT,
        ],
        t::NESTED_BOOL => &[t::NESTED_BOOL, t::NESTED_INPUT, t::COMPONENT],
        t::NESTED_NUMBER => &[t::NESTED_NUMBER, t::NESTED_INPUT, t::COMPONENT],
        t::NESTED_TRIGGER => &[t::NESTED_TRIGGER, t::NESTED_INPUT, t::COMPONENT],

        t::IMAGE_ASSET => &[t::IMAGE_ASSET, t::FILE_ASSET, t::ASSET],
        t::FONT_ASSET => &[t::FONT_ASSET, t::FILE_ASSET, t::ASSET],
        t::AUDIO_ASSET => &[t::AUDIO_ASSET, t::FILE_ASSET, t::ASSET],
        t::FILE_ASSET_CONTENTS => &[t::FILE_ASSET_CONTENTS],

        _ => &[],
    }
}

/// Inheritance test: a type key is "of" itself and each of its ancestors.
#[must_use]
pub fn is_type_of(type_key: u16, ancestor: u16) -> bool {
    ancestors(type_key).contains(&ancestor)
}

/// Whether objects of `type_key` can carry `property_key`, walking the
/// inheritance chain. Used to validate keyed animation data.
#[must_use]
pub fn supports_property(type_key: u16, property_key: u16) -> bool {
    match property_owner(property_key) {
        Some(owner) => is_type_of(type_key, owner),
        None => false,
    }
}
