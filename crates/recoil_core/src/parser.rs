use hashbrown::HashMap;

use crate::bitbuf::{self, BitBuf};
use crate::convert::Converter;
use crate::demo::{Demo, GameType, ScoreField};
use crate::fielddecoder::{self, DeltaRecord, RecordKind};
use crate::protocol;
use crate::schema::GameProtocol;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // crate
    #[error(transparent)]
    Bit(#[from] bitbuf::Error),
    #[error(transparent)]
    Field(#[from] fielddecoder::Error),
    // mod
    #[error("unknown demo protocol {protocol} (mod {mod_name:?})")]
    UnknownProtocol {
        protocol: i32,
        mod_name: Option<String>,
    },
    #[error("no game protocol resolved before a schema-bound message")]
    UnresolvedSchema,
}

pub type Result<T> = std::result::Result<T, Error>;

const BIG_INFO_STRING: usize = 8192;
const CONFIG_STRING_SEQUENCE_MAX: u32 = 1024;
const ENTITY_NUM_BITS: usize = 10;
// config-string client updates sit in a 64-slot window above this base
const CS_CLIENT_SLOTS: i64 = 64;

// client/cl_parse.c
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerCommand {
    GameState,
    ConfigString,
    Baseline,
    CommandString,
    Snapshot,
    Eof,
}

impl ServerCommand {
    fn from_u32(value: u32) -> Option<Self> {
        match value {
            2 => Some(Self::GameState),
            3 => Some(Self::ConfigString),
            4 => Some(Self::Baseline),
            5 => Some(Self::CommandString),
            7 => Some(Self::Snapshot),
            8 => Some(Self::Eof),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatGroup {
    Stat,
    Persistent,
    Ammo,
    Powerups,
}

/// everything one message yielded: the retained score command plus the
/// decoded delta records (baselines land with the snapshot entities).
#[derive(Debug, Default)]
pub struct ParsedMessage {
    pub score_command: Option<String>,
    pub player_state: Option<DeltaRecord>,
    pub entities: Vec<DeltaRecord>,
}

/// the per-demo protocol state machine. messages are strictly sequential:
/// variable-length codes make random access impossible, so one message's bits
/// are fully consumed (and, in conversion mode, rewritten) before the next.
pub struct Parser<'d> {
    demo: &'d mut Demo,
    convert: bool,
    converter: Option<Converter>,
}

impl<'d> Parser<'d> {
    pub fn new(demo: &'d mut Demo, convert: bool) -> Self {
        Self {
            demo,
            convert,
            converter: None,
        }
    }

    /// client/cl_parse.c CL_ParseServerMessage
    pub fn parse_message(&mut self, msg: &mut BitBuf) -> Result<ParsedMessage> {
        msg.read_long()?; // reliable ack

        let mut parsed = ParsedMessage::default();
        while msg.num_bits_left() > 0 {
            let code = msg.read_byte()?;
            match ServerCommand::from_u32(code) {
                Some(ServerCommand::Eof) => break,
                Some(ServerCommand::GameState) => self.parse_game_state(msg, &mut parsed)?,
                Some(ServerCommand::Snapshot) => self.parse_snapshot(msg, &mut parsed)?,
                Some(ServerCommand::CommandString) => {
                    self.parse_command_string(msg, &mut parsed)?
                }
                _ => {
                    // ends parsing of this message only; the frame loop
                    // proceeds with the next frame
                    log::warn!("got unexpected server command: {code}");
                    break;
                }
            }
        }

        if self.convert {
            msg.fill();
        }

        Ok(parsed)
    }

    /// client/cl_parse.c CL_ParseGamestate
    fn parse_game_state(&mut self, msg: &mut BitBuf, parsed: &mut ParsedMessage) -> Result<()> {
        msg.read_long()?; // server command sequence

        loop {
            let code = msg.read_byte()?;
            match ServerCommand::from_u32(code) {
                Some(ServerCommand::Eof) => break,
                Some(ServerCommand::ConfigString) => self.parse_config_string(msg)?,
                Some(ServerCommand::Baseline) => {
                    self.read_delta_entity(msg, &mut parsed.entities)?;
                }
                _ => log::debug!("ignoring game state sub-command: {code}"),
            }
        }

        msg.read_long()?; // client num
        msg.read_long()?; // checksum feed
        Ok(())
    }

    fn parse_config_string(&mut self, msg: &mut BitBuf) -> Result<()> {
        let sequence = msg.read_short()?;
        if sequence >= CONFIG_STRING_SEQUENCE_MAX {
            log::warn!("config string sequence out of range: {sequence}");
        }

        let config = msg.read_string(BIG_INFO_STRING - 1)?;
        if let Some(info) = config.strip_prefix('\\') {
            self.parse_server_info(info)?;
        } else if config.starts_with("n\\") {
            // client info; the next free slot is the client's number
            let pairs = parse_info_pairs(&config);
            if let Some(name) = pairs.get("n") {
                let slot = self.demo.clients.len() as i64;
                self.demo
                    .clients
                    .insert(slot, vec![ScoreField::Text(sanitize(name))]);
            }
        }

        Ok(())
    }

    fn parse_server_info(&mut self, info: &str) -> Result<()> {
        let pairs = parse_info_pairs(info);

        if let Some(game_type) = pairs.get("g_gametype") {
            match game_type.parse::<i64>().ok().and_then(GameType::from_id) {
                Some(game_type) => self.demo.game_type = Some(game_type),
                None => log::warn!("unknown game type: {game_type}"),
            }
        }
        if let Some(map) = pairs.get("mapname") {
            self.demo.map = Some((*map).to_string());
        }
        if let Some(host) = pairs.get("sv_hostname") {
            self.demo.host_name = Some(sanitize(host));
        }
        if let Some(date) = pairs.get("g_timestamp") {
            self.demo.date = Some((*date).to_string());
        }
        if let Some(Ok(value)) = pairs.get("protocol").map(|v| v.parse()) {
            self.demo.protocol = Some(value);
        }
        if let Some(Ok(value)) = pairs.get("com_protocol").map(|v| v.parse()) {
            self.demo.protocol = Some(value);
        }
        if let Some(mod_name) = pairs.get("fs_game") {
            self.demo.mod_name = Some((*mod_name).to_string());
        }
        if let Some(start_time) = pairs.get("g_levelStartTime") {
            // protocol 91 carries the date as unix seconds
            self.demo.date = Some((*start_time).to_string());
        }

        self.resolve_game_protocol()
    }

    /// after reading server info we should know what protocol + mod the demo
    /// is. resolution happens once; later server-info strings can't rebind.
    fn resolve_game_protocol(&mut self) -> Result<()> {
        if self.demo.game_protocol.is_some() {
            return Ok(());
        }
        let Some(protocol_number) = self.demo.protocol else {
            return Ok(());
        };

        let resolved: &'static GameProtocol = if protocol_number == 91 {
            &protocol::QUAKELIVE
        } else {
            let Some(mod_name) = self.demo.mod_name.as_deref() else {
                return Ok(());
            };
            if protocol_number == 71 && mod_name == "aftershock" {
                &protocol::AFTERSHOCK
            } else {
                return Err(Error::UnknownProtocol {
                    protocol: protocol_number,
                    mod_name: Some(mod_name.to_string()),
                });
            }
        };

        self.demo.game_protocol = Some(resolved);

        if self.convert {
            if resolved.name == "aftershock" {
                self.converter = Some(Converter::new(&protocol::AFTERSHOCK, &protocol::QUAKE3));
            } else {
                log::warn!(
                    "conversion is only implemented for aftershock demos; \
                     passing {} through untouched",
                    resolved.name
                );
            }
        }

        Ok(())
    }

    /// client/cl_parse.c CL_ParseSnapshot
    fn parse_snapshot(&mut self, msg: &mut BitBuf, parsed: &mut ParsedMessage) -> Result<()> {
        msg.read_long()?; // command time
        msg.read_byte()?; // delta number
        msg.read_byte()?; // snap flags

        let area_bytes = msg.read_byte()?;
        msg.read_byte()?; // area mask
        for _ in 1..area_bytes {
            msg.read_byte()?;
        }

        self.parse_player_state(msg, parsed)?;
        self.parse_stats(msg)?;

        // client/cl_parse.c CL_ParsePacketEntities
        loop {
            if self.read_delta_entity(msg, &mut parsed.entities)? {
                break;
            }
        }

        Ok(())
    }

    /// qcommon/msg.c MSG_ReadDeltaPlayerstate
    fn parse_player_state(&mut self, msg: &mut BitBuf, parsed: &mut ParsedMessage) -> Result<()> {
        let field_count = msg.read_byte()? as usize;
        let proto = self.game_protocol()?;
        let record = fielddecoder::read_delta(
            msg,
            &proto.player_states,
            field_count,
            RecordKind::PlayerState,
            self.converter.as_ref(),
        )?;
        parsed.player_state = Some(record);
        Ok(())
    }

    fn parse_stats(&mut self, msg: &mut BitBuf) -> Result<()> {
        if !msg.read_boolean()? {
            return Ok(());
        }

        for group in [
            StatGroup::Stat,
            StatGroup::Persistent,
            StatGroup::Ammo,
            StatGroup::Powerups,
        ] {
            if !msg.read_boolean()? {
                continue;
            }

            let offset = msg.cursor();
            let mask = msg.read_short()? as u16;

            // the output mask must be corrected before any group values are
            // read: bit positions determine which values are present, and the
            // replacement code may not have the same length as the one it
            // overwrites
            if group == StatGroup::Stat {
                if let Some(converter) = self.converter.as_ref() {
                    msg.write_bits(converter.convert_stat_mask(mask) as u32, 16, offset)?;
                }
            }

            // values follow the input mask
            for index in 0..16 {
                if mask >> index & 1 == 1 {
                    if group == StatGroup::Powerups {
                        msg.read_bits_signed(32)?;
                    } else {
                        msg.read_bits_signed(16)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// qcommon/msg.c MSG_ReadDeltaEntity. returns true when the entity loop
    /// terminator (slot number at the top of the range) was seen.
    fn read_delta_entity(&mut self, msg: &mut BitBuf, out: &mut Vec<DeltaRecord>) -> Result<bool> {
        let number = msg.read_bits(ENTITY_NUM_BITS)?;
        if number >= (1 << ENTITY_NUM_BITS) - 1 {
            return Ok(true);
        }
        if msg.read_boolean()? {
            // removed
            return Ok(false);
        }
        if !msg.read_boolean()? {
            // no delta
            return Ok(false);
        }

        let field_count = msg.read_byte()? as usize;
        let proto = self.game_protocol()?;
        let record = fielddecoder::read_delta(
            msg,
            &proto.entity_states,
            field_count,
            RecordKind::EntityState,
            self.converter.as_ref(),
        )?;
        out.push(record);
        Ok(false)
    }

    fn parse_command_string(
        &mut self,
        msg: &mut BitBuf,
        parsed: &mut ParsedMessage,
    ) -> Result<()> {
        msg.read_long()?; // command sequence
        let command = msg.read_string(bitbuf::DEFAULT_STRING_CHARS)?;
        if command.starts_with("cs") {
            self.set_clients(&command);
        } else if command.starts_with("scores") {
            // each scores command supersedes the previous one; only the last
            // across the whole demo is kept
            parsed.score_command = Some(command);
        }
        Ok(())
    }

    /// `cs <index> "<info>"` roster updates. the index is accepted only
    /// within the 64-slot client window above the protocol's base offset.
    fn set_clients(&mut self, command: &str) {
        let base = self
            .demo
            .game_protocol
            .map(|proto| proto.cs_first_client_id)
            .unwrap_or(protocol::QUAKE3.cs_first_client_id);

        let tokens: Vec<&str> = command.split_whitespace().collect();
        if tokens.len() != 3 {
            return;
        }
        let Ok(index) = tokens[1].parse::<i64>() else {
            return;
        };
        if !(base..base + CS_CLIENT_SLOTS).contains(&index) {
            return;
        }

        let info = tokens[2].trim_matches('"');
        if info.is_empty() {
            return;
        }
        let pairs = parse_info_pairs(info);
        if let Some(name) = pairs.get("n") {
            self.demo
                .clients
                .insert(index - base, vec![ScoreField::Text(sanitize(name))]);
        }
    }

    /// cgame/cg_servercmds.c CG_ParseScores. called once, after the last
    /// message, with the single retained scores command.
    pub fn parse_scores(&mut self, scores: &str) {
        let Some(proto) = self.demo.game_protocol else {
            return;
        };

        let mut values: Vec<i64> = Vec::new();
        for token in scores.split_whitespace().skip(1) {
            match token.parse() {
                Ok(value) => values.push(value),
                Err(_) => {
                    log::warn!("dropping scores command with non-numeric token {token:?}");
                    return;
                }
            }
        }
        let values = values.get(proto.score_prefix_skip..).unwrap_or(&[]);

        let stride = if self.demo.game_type == Some(GameType::Duel) {
            proto.score_duel_count
        } else {
            proto.score_count
        };
        if stride == 0 {
            return;
        }

        let mut index = 0;
        while index < values.len() {
            let client_id = values[index];
            let start = index + 1;
            let end = values.len().min(start + stride);
            if let Some(entry) = self.demo.clients.get_mut(&client_id) {
                entry.extend(values[start..end].iter().map(|v| ScoreField::Num(*v)));
            }
            index += stride;
        }
    }

    fn game_protocol(&self) -> Result<&'static GameProtocol> {
        self.demo.game_protocol.ok_or(Error::UnresolvedSchema)
    }
}

/// `key\value\key\value...` info strings; the last duplicate of a key wins.
fn parse_info_pairs(info: &str) -> HashMap<&str, &str> {
    let mut pairs = HashMap::new();
    let mut parts = info.split('\\');
    while let (Some(key), Some(value)) = (parts.next(), parts.next()) {
        pairs.insert(key, value);
    }
    pairs
}

/// strips color-code escapes (a caret and whatever follows it) and
/// surrounding whitespace.
fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '^' && chars.peek().is_some() {
            chars.next();
        } else {
            out.push(ch);
        }
    }
    out.trim().to_string()
}
