mod rendering;
mod scene;

pub use rendering::{
    approach, approach_scalar, DrawSink, DrawToken, MapPlacement, RecordingSink, APPROACH_FACTOR,
    OPAQUE_ALPHA,
};
pub use scene::{DrawHandle, DrawHandleAllocator, DrawList, Vec2};
