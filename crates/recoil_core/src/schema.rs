use hashbrown::HashMap;

/// one field of a delta-compressed record. a negative width is a signed
/// integer of `|bits|` bits, a positive width an unsigned integer, and a zero
/// width a (possibly quantized) float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub bits: i8,
}

impl FieldSpec {
    pub const fn new(name: &'static str, bits: i8) -> Self {
        Self { name, bits }
    }
}

/// a schema-construction step. derived protocol tables are built from a base
/// list plus a fixed op list, applied in order against the evolving table --
/// never by mutating another protocol's table.
#[derive(Debug, Clone, Copy)]
pub enum SchemaOp {
    Insert(usize, FieldSpec),
    Override(usize, FieldSpec),
    Append(FieldSpec),
}

/// an ordered field table with by-name lookup. positions are significant:
/// delta changed-flags are positional. frozen once built.
#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    by_name: HashMap<&'static str, usize>,
}

impl Schema {
    pub fn from_base(base: &[FieldSpec]) -> Self {
        Self::compose(base, &[])
    }

    pub fn compose(base: &[FieldSpec], ops: &[SchemaOp]) -> Self {
        let mut fields = base.to_vec();
        for op in ops {
            match *op {
                SchemaOp::Insert(index, spec) => fields.insert(index, spec),
                SchemaOp::Override(index, spec) => fields[index] = spec,
                SchemaOp::Append(spec) => fields.push(spec),
            }
        }

        let by_name = fields
            .iter()
            .enumerate()
            .map(|(index, spec)| (spec.name, index))
            .collect();

        Self { fields, by_name }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&FieldSpec> {
        self.fields.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// everything one protocol variant defines: the record schemas, the event and
/// entity-type name tables, and the scoreboard/command constants that differ
/// between variants. instances are static and read-only; the parser only ever
/// consumes them.
#[derive(Debug)]
pub struct GameProtocol {
    pub name: &'static str,
    pub player_states: Schema,
    pub entity_states: Schema,
    // event tables may carry gaps where a variant retired an identifier
    pub events: Vec<Option<&'static str>>,
    pub entity_types: Vec<&'static str>,
    // index of ET_EVENTS; entity types at or above it encode events
    pub events_base: usize,
    pub score_count: usize,
    pub score_duel_count: usize,
    pub score_prefix_skip: usize,
    pub cs_first_client_id: i64,
}

impl GameProtocol {
    pub fn event_index(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|event| *event == Some(name))
    }
}
