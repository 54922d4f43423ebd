use hashbrown::HashMap;

use crate::schema::GameProtocol;

// known incompatible identifiers between the aftershock and quake3 tables.
// these are not derivable from name alignment and are kept literal so every
// entry stays auditable: (field name, exact pre-translation value, replacement)
const VALUE_FIXUPS: [(&str, u32, u32); 6] = [
    // item index 61 does not exist on the destination
    ("modelindex", 61, 0),
    // retired event 88 EV_THAW_THICK
    ("eType", 101, 0),
    ("eType", 16, 14),
    ("eType", 29, 27),
    ("eType", 37, 35),
    ("eType", 38, 36),
];

// low byte is the event id, the remaining bits are auxiliary flags
const BIT_FLAG_EVENT_BASE: u32 = 256;

/// translates numeric event/stat identifiers from one protocol variant's
/// numbering to another's. each instance owns its remap table, built once for
/// its specific (source, destination) pair.
pub struct Converter {
    from: &'static GameProtocol,
    to: &'static GameProtocol,
    // source event index -> destination event index, only where the name
    // exists in both tables at different positions
    event_map: HashMap<u32, u32>,
}

impl Converter {
    pub fn new(from: &'static GameProtocol, to: &'static GameProtocol) -> Self {
        let mut event_map = HashMap::new();
        for (from_index, event) in from.events.iter().enumerate() {
            let Some(name) = event else {
                continue;
            };
            let Some(to_index) = to.event_index(name) else {
                continue;
            };
            if from_index != to_index {
                event_map.insert(from_index as u32, to_index as u32);
            }
        }

        Self {
            from,
            to,
            event_map,
        }
    }

    /// entity-type encoded event: values at or above the source ET_EVENTS
    /// index carry `base + event id`. returns the re-based translation, or
    /// nothing when the id needs no rewrite.
    pub fn convert_entity_type_event(&self, value: u32) -> Option<u32> {
        let event = value.checked_sub(self.from.events_base as u32)?;
        self.event_map
            .get(&event)
            .map(|mapped| mapped + self.to.events_base as u32)
    }

    /// bit-flag packed event: event id in the low byte, auxiliary flags above
    /// it. only the low byte is translated; the flags are re-appended as-is.
    pub fn convert_bit_flag_event(&self, value: u32) -> Option<u32> {
        let flags = value / BIT_FLAG_EVENT_BASE;
        let event = value % BIT_FLAG_EVENT_BASE;
        self.event_map
            .get(&event)
            .map(|mapped| mapped + flags * BIT_FLAG_EVENT_BASE)
    }

    /// stat bitmask for the primary-stats group. the destination enumerates
    /// the mask in the opposite bit-significance order, and stats 2..=7 sit at
    /// permuted positions: triplets {2,3,4} and {5,6,7} each rotate by one.
    pub fn convert_stat_mask(&self, mask: u16) -> u16 {
        let bit = |index: usize| mask >> index & 1;

        let mut out = mask;
        let mut put = |index: usize, value: u16| {
            out = out & !(1 << index) | value << index;
        };
        put(2, bit(3));
        put(3, bit(4));
        put(4, bit(2));
        put(5, bit(6));
        put(6, bit(7));
        put(7, bit(5));
        out
    }

    /// offered every decoded integer field. fixups run first; the general
    /// event translation (keyed on the original value) may override them.
    pub fn convert_field(&self, name: &str, value: i64) -> Option<u32> {
        let Ok(value) = u32::try_from(value) else {
            return None;
        };

        let mut out = VALUE_FIXUPS
            .iter()
            .find(|(field, from, _)| *field == name && *from == value)
            .map(|(_, _, to)| *to);

        match name {
            "eType" | "events[0]" | "events[1]" => {
                if let Some(converted) = self.convert_entity_type_event(value) {
                    out = Some(converted);
                }
            }
            "event" | "externalEvent" => {
                if let Some(converted) = self.convert_bit_flag_event(value) {
                    out = Some(converted);
                }
            }
            _ => {}
        }

        out
    }
}
