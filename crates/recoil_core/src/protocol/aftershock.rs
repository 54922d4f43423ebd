//! OpenArena protocol 71, Aftershock-XE revision 330v2. record schemas are
//! identical to the protocol 68 base; the event and entity-type tables gain a
//! few entries, which is exactly what makes the numeric identifiers drift and
//! conversion necessary.

use crate::schema::{GameProtocol, Schema};

use super::quake3;

pub(crate) fn protocol() -> GameProtocol {
    let mut entity_types: Vec<&'static str> = quake3::ENTITY_TYPES.to_vec();
    entity_types.insert(13, "ET_PING");
    entity_types.insert(14, "ET_PING_DANGER");
    let events_base = super::events_base(&entity_types);

    let mut events: Vec<Option<&'static str>> =
        quake3::EVENTS.iter().map(|event| Some(*event)).collect();
    events.insert(42, Some("EV_PROJECTILE_TELEPORT_IN"));
    events.insert(43, Some("EV_PROJECTILE_TELEPORT_OUT"));
    events.push(Some("EV_WEAPONDROP"));
    events.push(Some("EV_DAMAGEPLUM"));

    GameProtocol {
        name: "aftershock",
        player_states: Schema::from_base(&quake3::PLAYER_STATE_FIELDS),
        entity_states: Schema::from_base(&quake3::ENTITY_STATE_FIELDS),
        events,
        entity_types,
        events_base,
        score_count: 42,
        score_duel_count: 47,
        score_prefix_skip: 4,
        cs_first_client_id: 544,
    }
}
