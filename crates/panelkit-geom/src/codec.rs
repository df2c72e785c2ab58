//! Textual encoding of a [`Geometry`]: `"aMinX,aMinY,aMaxX,aMaxY|posX,posY"`.
//!
//! Floats are written with Rust's shortest round-trip formatting, which is
//! locale independent and parses back bit-exact.

use std::fmt::Write as _;

use crate::{Geometry, GeometryError, ParseFailure, Vec2};

pub const GROUP_SEP: char = '|';
pub const FIELD_SEP: char = ',';

const ANCHOR_FIELDS: usize = 4;
const POSITION_FIELDS: usize = 2;

pub fn serialize(g: &Geometry) -> String {
    let mut out = String::with_capacity(48);
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "{}{FIELD_SEP}{}{FIELD_SEP}{}{FIELD_SEP}{}{GROUP_SEP}{}{FIELD_SEP}{}",
        g.anchor_min.x, g.anchor_min.y, g.anchor_max.x, g.anchor_max.y, g.position.x, g.position.y,
    );
    out
}

/// Checked encoder used by persistence: a geometry with non-finite fields
/// would not survive a restore, so it is refused here.
pub fn try_serialize(g: &Geometry) -> Result<String, GeometryError> {
    if !g.is_finite() {
        return Err(GeometryError::Serialize("non-finite field"));
    }
    Ok(serialize(g))
}

pub fn deserialize(input: &str) -> Result<Geometry, GeometryError> {
    let groups: Vec<&str> = input.split(GROUP_SEP).collect();
    if groups.len() != 2 {
        return Err(parse_error(input, ParseFailure::GroupCount(groups.len())));
    }
    let anchors = parse_group::<ANCHOR_FIELDS>(input, 0, groups[0])?;
    let position = parse_group::<POSITION_FIELDS>(input, 1, groups[1])?;
    Ok(Geometry {
        anchor_min: Vec2::new(anchors[0], anchors[1]),
        anchor_max: Vec2::new(anchors[2], anchors[3]),
        position: Vec2::new(position[0], position[1]),
    })
}

fn parse_group<const N: usize>(
    input: &str,
    group: usize,
    text: &str,
) -> Result<[f32; N], GeometryError> {
    let fields: Vec<&str> = text.split(FIELD_SEP).collect();
    if fields.len() != N {
        return Err(parse_error(
            input,
            ParseFailure::FieldCount {
                group,
                found: fields.len(),
                expected: N,
            },
        ));
    }
    let mut out = [0.0f32; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field
            .trim()
            .parse::<f32>()
            .map_err(|_| parse_error(input, ParseFailure::NotNumeric(field.to_string())))?;
    }
    Ok(out)
}

fn parse_error(input: &str, reason: ParseFailure) -> GeometryError {
    GeometryError::Parse {
        input: input.to_string(),
        reason,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreSource {
    /// The persisted record parsed and validated.
    Saved,
    /// Nothing was persisted; the fallback is used as-is.
    Missing,
    /// The persisted record was rejected; the fallback replaces it.
    Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Restored {
    pub geometry: Geometry,
    pub source: RestoreSource,
    pub error: Option<GeometryError>,
}

impl Restored {
    /// Whether the fallback must be written back over a corrupt record.
    #[inline]
    pub fn needs_heal(&self) -> bool {
        self.source == RestoreSource::Fallback
    }
}

/// Resolves a persisted record into a geometry.
///
/// Empty or missing input yields `fallback` without a write-back. A record
/// that fails to parse, or that `validate` rejects, yields `fallback` flagged
/// for self-healing.
pub fn apply_or_default<F>(input: Option<&str>, fallback: Geometry, validate: F) -> Restored
where
    F: FnOnce(&Geometry) -> Result<(), GeometryError>,
{
    let text = match input.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => {
            return Restored {
                geometry: fallback,
                source: RestoreSource::Missing,
                error: None,
            };
        }
    };
    match deserialize(text).and_then(|g| validate(&g).map(|()| g)) {
        Ok(geometry) => Restored {
            geometry,
            source: RestoreSource::Saved,
            error: None,
        },
        Err(err) => {
            log::warn!("invalid or corrupt panel geometry ({err}); restoring default");
            Restored {
                geometry: fallback,
                source: RestoreSource::Fallback,
                error: Some(err),
            }
        }
    }
}
