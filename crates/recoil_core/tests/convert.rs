//! drives a full synthetic demo through parse and conversion: one game-state
//! message (server info + client info + baseline), one snapshot (player
//! state, stats block, one entity), one trailing scores command.

use recoil_core::bitbuf::BitBuf;
use recoil_core::demo::{Demo, GameType, ScoreField};
use recoil_core::demofile::{write_frame, FrameReader};
use recoil_core::fielddecoder::FieldValue;
use recoil_core::parser::Parser;

const GAME_STATE: u32 = 2;
const CONFIG_STRING: u32 = 3;
const BASELINE: u32 = 4;
const CMD_STRING: u32 = 5;
const SNAPSHOT: u32 = 7;
const EOF: u32 = 8;

const SERVER_INFO: &str = "\\protocol\\71\\fs_game\\aftershock\\g_gametype\\0\
                           \\mapname\\aggressor\\sv_hostname\\^1Big ^7Server\
                           \\g_timestamp\\2024-04-21";

fn put(msg: &mut BitBuf, value: u32, count: usize) {
    let offset = msg.cursor();
    msg.write_bits(value, count, offset).unwrap();
}

fn put_string(msg: &mut BitBuf, s: &str) {
    for b in s.bytes() {
        put(msg, b as u32, 8);
    }
    put(msg, 0, 8);
}

/// baseline/snapshot entities carry a single changed field: eType (schema
/// index 11) with the given value.
fn put_entity(msg: &mut BitBuf, number: u32, etype: u32) {
    put(msg, number, 10);
    put(msg, 0, 1); // not removed
    put(msg, 1, 1); // has delta
    put(msg, 12, 8); // field count covers indices 0..=11
    for index in 0..12 {
        if index == 11 {
            put(msg, 1, 1); // changed
            put(msg, 1, 1); // non-null
            put(msg, etype, 8);
        } else {
            put(msg, 0, 1);
        }
    }
}

fn game_state_message() -> BitBuf {
    let mut msg = BitBuf::new();
    put(&mut msg, 0, 32); // reliable ack
    put(&mut msg, GAME_STATE, 8);
    put(&mut msg, 0, 32); // server command sequence

    put(&mut msg, CONFIG_STRING, 8);
    put(&mut msg, 0, 16);
    put_string(&mut msg, SERVER_INFO);

    put(&mut msg, CONFIG_STRING, 8);
    put(&mut msg, 544, 16);
    put_string(&mut msg, "n\\^2Sarge\\t\\0");

    put(&mut msg, BASELINE, 8);
    put_entity(&mut msg, 30, 1); // a plain ET_PLAYER, nothing to translate

    put(&mut msg, EOF, 8);
    put(&mut msg, 0, 32); // client num
    put(&mut msg, 0, 32); // checksum feed
    put(&mut msg, EOF, 8);
    msg.fill();
    msg
}

fn snapshot_message() -> BitBuf {
    let mut msg = BitBuf::new();
    put(&mut msg, 0, 32); // reliable ack
    put(&mut msg, SNAPSHOT, 8);
    put(&mut msg, 0, 32); // command time
    put(&mut msg, 0, 8); // delta number
    put(&mut msg, 0, 8); // snap flags
    put(&mut msg, 1, 8); // area bytes
    put(&mut msg, 0, 8); // area mask

    put(&mut msg, 0, 8); // player state field count

    // stats block: primary group present with bits 0 and 2 set
    put(&mut msg, 1, 1);
    put(&mut msg, 1, 1);
    put(&mut msg, 0b101, 16);
    put(&mut msg, 100, 16);
    put(&mut msg, 3, 16);
    put(&mut msg, 0, 1); // persistent
    put(&mut msg, 0, 1); // ammo
    put(&mut msg, 0, 1); // powerups

    put_entity(&mut msg, 20, 16); // eType 16 must convert to 14
    put(&mut msg, 0x3ff, 10); // entity loop terminator

    put(&mut msg, EOF, 8);
    msg.fill();
    msg
}

fn scores_message() -> BitBuf {
    let mut msg = BitBuf::new();
    put(&mut msg, 0, 32); // reliable ack
    put(&mut msg, CMD_STRING, 8);
    put(&mut msg, 0, 32); // command sequence
    put_string(&mut msg, "scores 1 2 3 4 0 10 20");
    put(&mut msg, EOF, 8);
    msg.fill();
    msg
}

fn synthetic_demo() -> Vec<u8> {
    let mut file = Vec::new();
    for (seq, msg) in [game_state_message(), snapshot_message(), scores_message()]
        .iter()
        .enumerate()
    {
        write_frame(&mut file, seq as i32, &msg.to_bytes()).unwrap();
    }
    file.extend((-1i32).to_le_bytes());
    file.extend((-1i32).to_le_bytes());
    file
}

#[test]
fn test_parse_accumulates_demo_facts() {
    let demo = Demo::parse(synthetic_demo().as_slice()).unwrap();

    assert_eq!(demo.protocol, Some(71));
    assert_eq!(demo.mod_name.as_deref(), Some("aftershock"));
    assert_eq!(demo.map.as_deref(), Some("aggressor"));
    assert_eq!(demo.host_name.as_deref(), Some("Big Server"));
    assert_eq!(demo.date.as_deref(), Some("2024-04-21"));
    assert_eq!(demo.game_type, Some(GameType::FreeForAll));
    assert_eq!(demo.game_protocol.map(|p| p.name), Some("aftershock"));

    // roster: name from the client-info config string, stats from the
    // retained scores command (aftershock prefix of four tokens dropped)
    assert_eq!(
        demo.clients[&0],
        vec![
            ScoreField::Text("Sarge".to_string()),
            ScoreField::Num(10),
            ScoreField::Num(20),
        ]
    );
}

#[test]
fn test_convert_rewrites_entity_events() {
    let input = synthetic_demo();
    let mut output = Vec::new();
    Demo::convert(input.as_slice(), &mut output).unwrap();

    // re-parse the converted rendition and pull out every entity eType
    let mut demo = Demo::new();
    let mut parser = Parser::new(&mut demo, false);
    let mut frames = FrameReader::new(output.as_slice());

    let mut etypes = Vec::new();
    while let Some(frame) = frames.read_frame().unwrap() {
        let mut msg = BitBuf::from_bytes(&frame.data);
        let parsed = parser.parse_message(&mut msg).unwrap();
        for record in &parsed.entities {
            if let Some(FieldValue::Int(etype)) = record.get("eType") {
                etypes.push(*etype);
            }
        }
    }

    // the baseline's ET_PLAYER is untouched; the snapshot's 16 is a known
    // incompatible identifier and becomes 14
    assert_eq!(etypes, vec![1, 14]);
}

#[test]
fn test_convert_without_rewrites_roundtrips_bytes() {
    // a game-state-only demo has nothing to translate; conversion must
    // reproduce the input byte for byte
    let mut input = Vec::new();
    write_frame(&mut input, 0, &game_state_message().to_bytes()).unwrap();
    input.extend((-1i32).to_le_bytes());
    input.extend((-1i32).to_le_bytes());

    let mut output = Vec::new();
    Demo::convert(input.as_slice(), &mut output).unwrap();

    // the converted demo carries no terminator record; everything up to it
    // must match
    assert_eq!(&input[..input.len() - 8], output.as_slice());
}
