//! static protocol tables. these are data the parser consumes, not logic: one
//! frozen [`GameProtocol`] per supported variant, built once on first use.

use lazy_static::lazy_static;

use crate::schema::GameProtocol;

pub(crate) mod aftershock;
pub(crate) mod quake3;
pub(crate) mod quakelive;

lazy_static! {
    pub static ref QUAKE3: GameProtocol = quake3::protocol();
    pub static ref AFTERSHOCK: GameProtocol = aftershock::protocol();
    pub static ref QUAKELIVE: GameProtocol = quakelive::protocol();
}

// entity types at or above ET_EVENTS encode event ids; a table without
// ET_EVENTS degenerates to "no event range" rather than panicking
pub(crate) fn events_base(entity_types: &[&str]) -> usize {
    entity_types
        .iter()
        .position(|ty| *ty == "ET_EVENTS")
        .unwrap_or(entity_types.len())
}
