//! Quake Live protocol 91. carries its own event table (with gaps where
//! identifiers were retired) and extends both record schemas.

use crate::schema::{FieldSpec, GameProtocol, Schema, SchemaOp};

use super::quake3;

#[rustfmt::skip]
const EVENTS: [Option<&str>; 105] = [
    Some("EV_NONE"),
    Some("EV_FOOTSTEP"),
    Some("EV_FOOTSTEP_METAL"),
    Some("EV_FOOTSPLASH"),
    Some("EV_FOOTWADE"),
    Some("EV_SWIM"),
    Some("EV_FALL_SHORT"),
    Some("EV_FALL_MEDIUM"),
    Some("EV_FALL_FAR"),
    Some("EV_JUMP_PAD"),
    Some("EV_JUMP"),
    Some("EV_WATER_TOUCH"),
    Some("EV_WATER_LEAVE"),
    Some("EV_WATER_UNDER"),
    Some("EV_WATER_CLEAR"),
    Some("EV_ITEM_PICKUP"),
    Some("EV_GLOBAL_ITEM_PICKUP"),
    Some("EV_NOAMMO"),
    Some("EV_CHANGE_WEAPON"),
    Some("EV_DROP_WEAPON"),
    Some("EV_FIRE_WEAPON"),
    Some("EV_USE_ITEM0"),
    Some("EV_USE_ITEM1"),
    Some("EV_USE_ITEM2"),
    Some("EV_USE_ITEM3"),
    Some("EV_USE_ITEM4"),
    Some("EV_USE_ITEM5"),
    Some("EV_USE_ITEM6"),
    Some("EV_USE_ITEM7"),
    Some("EV_USE_ITEM8"),
    Some("EV_USE_ITEM9"),
    Some("EV_USE_ITEM10"),
    Some("EV_USE_ITEM11"),
    Some("EV_USE_ITEM12"),
    Some("EV_USE_ITEM13"),
    Some("EV_USE_ITEM14"),
    Some("EV_USE_ITEM15"),
    Some("EV_ITEM_RESPAWN"),
    Some("EV_ITEM_POP"),
    Some("EV_PLAYER_TELEPORT_IN"),
    Some("EV_PLAYER_TELEPORT_OUT"),
    Some("EV_GRENADE_BOUNCE"),
    Some("EV_GENERAL_SOUND"),
    Some("EV_GLOBAL_SOUND"),
    Some("EV_GLOBAL_TEAM_SOUND"),
    Some("EV_BULLET_HIT_FLESH"),
    Some("EV_BULLET_HIT_WALL"),
    Some("EV_MISSILE_HIT"),
    Some("EV_MISSILE_MISS"),
    Some("EV_MISSILE_MISS_METAL"),
    Some("EV_RAILTRAIL"),
    Some("EV_SHOTGUN"),
    None,
    Some("EV_PAIN"),
    Some("EV_DEATH1"),
    Some("EV_DEATH2"),
    Some("EV_DEATH3"),
    Some("EV_DROWN"),
    Some("EV_OBITUARY"),
    Some("EV_POWERUP_QUAD"),
    Some("EV_POWERUP_BATTLESUIT"),
    Some("EV_POWERUP_REGEN"),
    Some("EV_POWERUP_ARMOR_REGEN"),
    Some("EV_GIB_PLAYER"),
    Some("EV_SCOREPLUM"),
    Some("EV_PROXIMITY_MINE_STICK"),
    Some("EV_PROXIMITY_MINE_TRIGGER"),
    Some("EV_KAMIKAZE"),
    Some("EV_OBELISKEXPLODE"),
    Some("EV_OBELISKPAIN"),
    Some("EV_INVUL_IMPACT"),
    None,
    Some("EV_DEBUG_LINE"),
    Some("EV_STOPLOOPINGSOUND"),
    Some("EV_TAUNT"),
    Some("EV_TAUNT_YES"),
    Some("EV_TAUNT_NO"),
    Some("EV_TAUNT_FOLLOWME"),
    Some("EV_TAUNT_GETFLAG"),
    Some("EV_TAUNT_GUARDBASE"),
    Some("EV_TAUNT_PATROL"),
    Some("EV_FOOTSTEP_SNOW"),
    Some("EV_FOOTSTEP_WOOD"),
    Some("EV_ITEM_PICKUP_SPEC"),
    Some("EV_OVERTIME"),
    Some("EV_GAMEOVER"),
    Some("EV_THAW_PLAYER"),
    Some("EV_THAW_TICK"),
    Some("EV_HEADSHOT"),
    Some("EV_POI"),
    None,
    None,
    Some("EV_RACE_START"),
    Some("EV_RACE_CHECKPOINT"),
    Some("EV_RACE_END"),
    Some("EV_DAMAGEPLUM"),
    Some("EV_AWARD"),
    Some("EV_INFECTED"),
    Some("EV_NEW_HIGH_SCORE"),
    Some("EV_STEP_4"),
    Some("EV_STEP_8"),
    Some("EV_STEP_12"),
    Some("EV_STEP_16"),
    Some("EV_JUICED"),
    Some("EV_LIGHTNINGBOLT"),
];

const ENTITY_STATE_OPS: [SchemaOp; 7] = [
    SchemaOp::Insert(9, FieldSpec::new("pos.gravity", 32)),
    SchemaOp::Insert(46, FieldSpec::new("apos.gravity", 32)),
    SchemaOp::Append(FieldSpec::new("jumpTime", 32)),
    SchemaOp::Append(FieldSpec::new("doubleJumped", 1)),
    SchemaOp::Append(FieldSpec::new("health", 16)),
    SchemaOp::Append(FieldSpec::new("armor", 16)),
    SchemaOp::Append(FieldSpec::new("location", 8)),
];

const PLAYER_STATE_OPS: [SchemaOp; 11] = [
    SchemaOp::Override(19, FieldSpec::new("pm_flags", 24)),
    SchemaOp::Insert(42, FieldSpec::new("weaponPrimary", 8)),
    SchemaOp::Append(FieldSpec::new("jumpTime", 32)),
    SchemaOp::Append(FieldSpec::new("doubleJumped", 1)),
    SchemaOp::Append(FieldSpec::new("crouchTime", 32)),
    SchemaOp::Append(FieldSpec::new("crouchSlideTime", 32)),
    SchemaOp::Append(FieldSpec::new("location", 8)),
    SchemaOp::Append(FieldSpec::new("fov", 8)),
    SchemaOp::Append(FieldSpec::new("forwardmove", 8)),
    SchemaOp::Append(FieldSpec::new("rightmove", 8)),
    SchemaOp::Append(FieldSpec::new("upmove", 8)),
];

pub(crate) fn protocol() -> GameProtocol {
    let mut entity_types: Vec<&'static str> = quake3::ENTITY_TYPES.to_vec();
    entity_types.insert(13, "ET_PING");
    entity_types.insert(14, "ET_PING_DANGER");
    let events_base = super::events_base(&entity_types);

    GameProtocol {
        name: "quakelive",
        player_states: Schema::compose(&quake3::PLAYER_STATE_FIELDS, &PLAYER_STATE_OPS),
        entity_states: Schema::compose(&quake3::ENTITY_STATE_FIELDS, &ENTITY_STATE_OPS),
        events: EVENTS.to_vec(),
        entity_types,
        events_base,
        score_count: 14,
        // 20 + 5 * weapon count (14)
        score_duel_count: 91,
        score_prefix_skip: 1,
        cs_first_client_id: 529,
    }
}
