//! protocol 68 base tables. the derived variants (aftershock, quakelive)
//! compose on top of these; nothing in here is ever mutated after the
//! containing [`GameProtocol`] is built.

use crate::schema::{FieldSpec, GameProtocol, Schema};

// qcommon/msg.c playerStateFields
#[rustfmt::skip]
pub(crate) const PLAYER_STATE_FIELDS: [FieldSpec; 48] = [
    FieldSpec::new("commandTime", 32),
    FieldSpec::new("origin[0]", 0),
    FieldSpec::new("origin[1]", 0),
    FieldSpec::new("bobCycle", 8),
    FieldSpec::new("velocity[0]", 0),
    FieldSpec::new("velocity[1]", 0),
    FieldSpec::new("viewangles[1]", 0),
    FieldSpec::new("viewangles[0]", 0),
    FieldSpec::new("weaponTime", -16),
    FieldSpec::new("origin[2]", 0),
    FieldSpec::new("velocity[2]", 0),
    FieldSpec::new("legsTimer", 8),
    FieldSpec::new("pm_time", -16),
    FieldSpec::new("eventSequence", 16),
    FieldSpec::new("torsoAnim", 8),
    FieldSpec::new("movementDir", 4),
    FieldSpec::new("events[0]", 8),
    FieldSpec::new("legsAnim", 8),
    FieldSpec::new("events[1]", 8),
    FieldSpec::new("pm_flags", 16),
    FieldSpec::new("groundEntityNum", 10),
    FieldSpec::new("weaponstate", 4),
    FieldSpec::new("eFlags", 16),
    FieldSpec::new("externalEvent", 10),
    FieldSpec::new("gravity", 16),
    FieldSpec::new("speed", 16),
    FieldSpec::new("delta_angles[1]", 16),
    FieldSpec::new("externalEventParm", 8),
    FieldSpec::new("viewheight", -8),
    FieldSpec::new("damageEvent", 8),
    FieldSpec::new("damageYaw", 8),
    FieldSpec::new("damagePitch", 8),
    FieldSpec::new("damageCount", 8),
    FieldSpec::new("generic1", 8),
    FieldSpec::new("pm_type", 8),
    FieldSpec::new("delta_angles[0]", 16),
    FieldSpec::new("delta_angles[2]", 16),
    FieldSpec::new("torsoTimer", 12),
    FieldSpec::new("eventParms[0]", 8),
    FieldSpec::new("eventParms[1]", 8),
    FieldSpec::new("clientNum", 8),
    FieldSpec::new("weapon", 5),
    FieldSpec::new("viewangles[2]", 0),
    FieldSpec::new("grapplePoint[0]", 0),
    FieldSpec::new("grapplePoint[1]", 0),
    FieldSpec::new("grapplePoint[2]", 0),
    FieldSpec::new("jumppad_ent", 10),
    FieldSpec::new("loopSound", 16),
];

// qcommon/msg.c entityStateFields
#[rustfmt::skip]
pub(crate) const ENTITY_STATE_FIELDS: [FieldSpec; 51] = [
    FieldSpec::new("pos.trTime", 32),
    FieldSpec::new("pos.trBase[0]", 0),
    FieldSpec::new("pos.trBase[1]", 0),
    FieldSpec::new("pos.trDelta[0]", 0),
    FieldSpec::new("pos.trDelta[1]", 0),
    FieldSpec::new("pos.trBase[2]", 0),
    FieldSpec::new("apos.trBase[1]", 0),
    FieldSpec::new("pos.trDelta[2]", 0),
    FieldSpec::new("apos.trBase[0]", 0),
    FieldSpec::new("event", 10),
    FieldSpec::new("angles2[1]", 0),
    FieldSpec::new("eType", 8),
    FieldSpec::new("torsoAnim", 8),
    FieldSpec::new("eventParm", 8),
    FieldSpec::new("legsAnim", 8),
    FieldSpec::new("groundEntityNum", 10),
    FieldSpec::new("pos.trType", 8),
    FieldSpec::new("eFlags", 19),
    FieldSpec::new("otherEntityNum", 10),
    FieldSpec::new("weapon", 8),
    FieldSpec::new("clientNum", 8),
    FieldSpec::new("angles[1]", 0),
    FieldSpec::new("pos.trDuration", 32),
    FieldSpec::new("apos.trType", 8),
    FieldSpec::new("origin[0]", 0),
    FieldSpec::new("origin[1]", 0),
    FieldSpec::new("origin[2]", 0),
    FieldSpec::new("solid", 24),
    FieldSpec::new("powerups", 16),
    FieldSpec::new("modelindex", 8),
    FieldSpec::new("otherEntityNum2", 10),
    FieldSpec::new("loopSound", 8),
    FieldSpec::new("generic1", 8),
    FieldSpec::new("origin2[2]", 0),
    FieldSpec::new("origin2[0]", 0),
    FieldSpec::new("origin2[1]", 0),
    FieldSpec::new("modelindex2", 8),
    FieldSpec::new("angles[0]", 0),
    FieldSpec::new("time", 32),
    FieldSpec::new("apos.trTime", 32),
    FieldSpec::new("apos.trDuration", 32),
    FieldSpec::new("apos.trBase[2]", 0),
    FieldSpec::new("apos.trDelta[0]", 0),
    FieldSpec::new("apos.trDelta[1]", 0),
    FieldSpec::new("apos.trDelta[2]", 0),
    FieldSpec::new("time2", 32),
    FieldSpec::new("angles[2]", 0),
    FieldSpec::new("angles2[0]", 0),
    FieldSpec::new("angles2[2]", 0),
    FieldSpec::new("constantLight", 32),
    FieldSpec::new("frame", 16),
];

// bg_public.h entity_event_t
pub(crate) const EVENTS: [&str; 83] = [
    "EV_NONE",
    "EV_FOOTSTEP",
    "EV_FOOTSTEP_METAL",
    "EV_FOOTSPLASH",
    "EV_FOOTWADE",
    "EV_SWIM",
    "EV_STEP_4",
    "EV_STEP_8",
    "EV_STEP_12",
    "EV_STEP_16",
    "EV_FALL_SHORT",
    "EV_FALL_MEDIUM",
    "EV_FALL_FAR",
    "EV_JUMP_PAD",
    "EV_JUMP",
    "EV_WATER_TOUCH",
    "EV_WATER_LEAVE",
    "EV_WATER_UNDER",
    "EV_WATER_CLEAR",
    "EV_ITEM_PICKUP",
    "EV_GLOBAL_ITEM_PICKUP",
    "EV_NOAMMO",
    "EV_CHANGE_WEAPON",
    "EV_FIRE_WEAPON",
    "EV_USE_ITEM0",
    "EV_USE_ITEM1",
    "EV_USE_ITEM2",
    "EV_USE_ITEM3",
    "EV_USE_ITEM4",
    "EV_USE_ITEM5",
    "EV_USE_ITEM6",
    "EV_USE_ITEM7",
    "EV_USE_ITEM8",
    "EV_USE_ITEM9",
    "EV_USE_ITEM10",
    "EV_USE_ITEM11",
    "EV_USE_ITEM12",
    "EV_USE_ITEM13",
    "EV_USE_ITEM14",
    "EV_USE_ITEM15",
    "EV_ITEM_RESPAWN",
    "EV_ITEM_POP",
    "EV_PLAYER_TELEPORT_IN",
    "EV_PLAYER_TELEPORT_OUT",
    "EV_GRENADE_BOUNCE",
    "EV_GENERAL_SOUND",
    "EV_GLOBAL_SOUND",
    "EV_GLOBAL_TEAM_SOUND",
    "EV_BULLET_HIT_FLESH",
    "EV_BULLET_HIT_WALL",
    "EV_MISSILE_HIT",
    "EV_MISSILE_MISS",
    "EV_MISSILE_MISS_METAL",
    "EV_RAILTRAIL",
    "EV_SHOTGUN",
    "EV_BULLET",
    "EV_PAIN",
    "EV_DEATH1",
    "EV_DEATH2",
    "EV_DEATH3",
    "EV_OBITUARY",
    "EV_POWERUP_QUAD",
    "EV_POWERUP_BATTLESUIT",
    "EV_POWERUP_REGEN",
    "EV_GIB_PLAYER",
    "EV_SCOREPLUM",
    "EV_PROXIMITY_MINE_STICK",
    "EV_PROXIMITY_MINE_TRIGGER",
    "EV_KAMIKAZE",
    "EV_OBELISKEXPLODE",
    "EV_OBELISKPAIN",
    "EV_INVUL_IMPACT",
    "EV_JUICED",
    "EV_LIGHTNINGBOLT",
    "EV_DEBUG_LINE",
    "EV_STOPLOOPINGSOUND",
    "EV_TAUNT",
    "EV_TAUNT_YES",
    "EV_TAUNT_NO",
    "EV_TAUNT_FOLLOWME",
    "EV_TAUNT_GETFLAG",
    "EV_TAUNT_GUARDBASE",
    "EV_TAUNT_PATROL",
];

// bg_public.h entityType_t
pub(crate) const ENTITY_TYPES: [&str; 14] = [
    "ET_GENERAL",
    "ET_PLAYER",
    "ET_ITEM",
    "ET_MISSILE",
    "ET_MOVER",
    "ET_BEAM",
    "ET_PORTAL",
    "ET_SPEAKER",
    "ET_PUSH_TRIGGER",
    "ET_TELEPORT_TRIGGER",
    "ET_INVISIBLE",
    "ET_GRAPPLE",
    "ET_TEAM",
    "ET_EVENTS",
];

pub(crate) fn protocol() -> GameProtocol {
    let events: Vec<Option<&'static str>> = EVENTS.iter().map(|event| Some(*event)).collect();
    let entity_types: Vec<&'static str> = ENTITY_TYPES.to_vec();
    let events_base = super::events_base(&entity_types);

    GameProtocol {
        name: "quake3",
        player_states: Schema::from_base(&PLAYER_STATE_FIELDS),
        entity_states: Schema::from_base(&ENTITY_STATE_FIELDS),
        events,
        entity_types,
        events_base,
        score_count: 14,
        score_duel_count: 14,
        score_prefix_skip: 0,
        cs_first_client_id: 544,
    }
}
