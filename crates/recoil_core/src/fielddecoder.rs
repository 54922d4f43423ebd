use crate::bitbuf::{self, BitBuf};
use crate::convert::Converter;
use crate::schema::Schema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // crate
    #[error(transparent)]
    Bit(#[from] bitbuf::Error),
    // mod
    #[error("invalid {kind} field count {got} > {max}")]
    InvalidFieldCount {
        kind: &'static str,
        got: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    PlayerState,
    /// entity records carry an extra non-null flag per changed field; a clear
    /// flag means an implicit zero with no value bits at all.
    EntityState,
}

impl RecordKind {
    fn name(self) -> &'static str {
        match self {
            Self::PlayerState => "player state",
            Self::EntityState => "entity state",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f32),
}

/// the sparse outcome of one delta decode: only fields whose changed-flag was
/// set are present, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl DeltaRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// decodes one sparse delta record against `schema`. `field_count` comes off
/// the wire and caps the changed-flag loop; it exceeding the schema is fatal
/// for the whole demo. when a converter is given, every integer field is
/// offered for translation right after its read, and an accepted translation
/// is rewritten over the exact bits the value came from.
pub fn read_delta(
    msg: &mut BitBuf,
    schema: &Schema,
    field_count: usize,
    kind: RecordKind,
    converter: Option<&Converter>,
) -> Result<DeltaRecord> {
    if field_count > schema.len() {
        return Err(Error::InvalidFieldCount {
            kind: kind.name(),
            got: field_count,
            max: schema.len(),
        });
    }

    let mut record = DeltaRecord::default();
    for index in 0..field_count {
        if !msg.read_boolean()? {
            // unchanged; the previous value is implicitly retained by the
            // consumer, not tracked here
            continue;
        }

        // bounds were checked against the schema above
        let Some(spec) = schema.get(index) else {
            break;
        };

        if kind == RecordKind::EntityState && !msg.read_boolean()? {
            record.fields.push((spec.name, FieldValue::Int(0)));
            continue;
        }

        if spec.bits != 0 {
            let width = spec.bits.unsigned_abs() as usize;
            let offset = msg.cursor();
            let value = if spec.bits < 0 {
                msg.read_bits_signed(width)? as i64
            } else {
                msg.read_bits(width)? as i64
            };

            if let Some(converter) = converter {
                if let Some(converted) = converter.convert_field(spec.name, value) {
                    msg.write_bits(converted, width, offset)?;
                }
            }

            record.fields.push((spec.name, FieldValue::Int(value)));
        } else {
            let value = msg.read_float()?;
            record.fields.push((spec.name, FieldValue::Float(value)));
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use crate::schema::FieldSpec;

    use super::*;

    fn schema() -> Schema {
        Schema::from_base(&[
            FieldSpec::new("alpha", 8),
            FieldSpec::new("beta", -16),
            FieldSpec::new("gamma", 0),
            FieldSpec::new("delta", 10),
        ])
    }

    #[test]
    fn test_all_flags_clear_yields_empty_record() -> Result<()> {
        let schema = schema();
        let mut msg = BitBuf::new();
        for _ in 0..schema.len() {
            msg.write_bits(0, 1, msg.cursor())?;
        }
        msg.seek(0)?;

        let record = read_delta(&mut msg, &schema, schema.len(), RecordKind::PlayerState, None)?;
        assert!(record.is_empty());

        Ok(())
    }

    #[test]
    fn test_all_flags_set_yields_full_record_in_schema_order() -> Result<()> {
        let schema = schema();
        let mut msg = BitBuf::new();

        // alpha
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(200, 8, msg.cursor())?;
        // beta, negative
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(-3i32 as u32 & 0xffff, 16, msg.cursor())?;
        // gamma, quantized float
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(0, 1, msg.cursor())?;
        msg.write_bits(4096 + 12, 13, msg.cursor())?;
        // delta
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(1001, 10, msg.cursor())?;
        msg.seek(0)?;

        let record = read_delta(&mut msg, &schema, schema.len(), RecordKind::PlayerState, None)?;
        assert_eq!(record.len(), schema.len());
        assert_eq!(
            record.fields(),
            &[
                ("alpha", FieldValue::Int(200)),
                ("beta", FieldValue::Int(-3)),
                ("gamma", FieldValue::Float(12.0)),
                ("delta", FieldValue::Int(1001)),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_entity_null_flag_means_implicit_zero() -> Result<()> {
        let schema = schema();
        let mut msg = BitBuf::new();

        // alpha changed but null: no value bits at all
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(0, 1, msg.cursor())?;
        // beta changed, non-null
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(7, 16, msg.cursor())?;
        msg.seek(0)?;

        let record = read_delta(&mut msg, &schema, 2, RecordKind::EntityState, None)?;
        assert_eq!(
            record.fields(),
            &[
                ("alpha", FieldValue::Int(0)),
                ("beta", FieldValue::Int(7)),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_field_count_over_schema_is_fatal() {
        let schema = schema();
        let mut msg = BitBuf::new();
        let err = read_delta(&mut msg, &schema, schema.len() + 1, RecordKind::PlayerState, None);
        assert!(matches!(
            err,
            Err(Error::InvalidFieldCount { got: 5, max: 4, .. })
        ));
    }

    #[test]
    fn test_partial_field_count_reads_prefix_only() -> Result<()> {
        let schema = schema();
        let mut msg = BitBuf::new();
        msg.write_bits(0, 1, msg.cursor())?;
        msg.write_bits(1, 1, msg.cursor())?;
        msg.write_bits(42, 16, msg.cursor())?;
        msg.seek(0)?;

        let record = read_delta(&mut msg, &schema, 2, RecordKind::PlayerState, None)?;
        assert_eq!(record.fields(), &[("beta", FieldValue::Int(42))]);

        Ok(())
    }
}
