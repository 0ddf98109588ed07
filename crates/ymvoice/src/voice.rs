//! Shared voice capabilities and the dialect-agnostic [`Voice`] enum.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::convert::{self, ConvertOptions};
use crate::error::VoiceError;
use crate::opl::OplVoice;
use crate::opll::OpllVoice;
use crate::opm::OpmVoice;
use crate::opn::OpnVoice;
use crate::persist;

/// FM chip register dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dialect {
    /// Two-operator OPL family (YM3526/YM3812/YMF262 melody channel).
    Opl,
    /// Reduced two-operator OPLL (YM2413, VRC7) with a fixed preset bank.
    Opll,
    /// Four-operator OPM (YM2151).
    Opm,
    /// Four-operator OPN family (YM2203/YM2608/YM2612).
    Opn,
}

impl Dialect {
    /// All dialects in declaration order.
    pub const ALL: [Dialect; 4] = [Dialect::Opl, Dialect::Opll, Dialect::Opm, Dialect::Opn];

    /// Returns the persistence discriminant (e.g., "OPMVoice").
    pub fn type_name(&self) -> &'static str {
        match self {
            Dialect::Opl => "OPLVoice",
            Dialect::Opll => "OPLLVoice",
            Dialect::Opm => "OPMVoice",
            Dialect::Opn => "OPNVoice",
        }
    }

    /// Returns the short lowercase name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Opl => "opl",
            Dialect::Opll => "opll",
            Dialect::Opm => "opm",
            Dialect::Opn => "opn",
        }
    }

    /// Length of the encoded register image in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            Dialect::Opl => OplVoice::ENCODED_LEN,
            Dialect::Opll => OpllVoice::ENCODED_LEN,
            Dialect::Opm => OpmVoice::ENCODED_LEN,
            Dialect::Opn => OpnVoice::ENCODED_LEN,
        }
    }

    /// Number of operator slots per voice.
    pub fn slot_count(&self) -> usize {
        match self {
            Dialect::Opl | Dialect::Opll => 2,
            Dialect::Opm | Dialect::Opn => 4,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opl" => Ok(Dialect::Opl),
            "opll" => Ok(Dialect::Opll),
            "opm" => Ok(Dialect::Opm),
            "opn" => Ok(Dialect::Opn),
            other => Err(format!(
                "unknown dialect '{}' (expected opl, opll, opm or opn)",
                other
            )),
        }
    }
}

/// How [`YmVoice::encode_with`] treats fields wider than their register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodePolicy {
    /// Encode as-is; excess bits land in the neighbouring field.
    #[default]
    Bleed,
    /// Fail with [`VoiceError::FieldOutOfRange`].
    Reject,
    /// Saturate every field to its register maximum first.
    Clamp,
}

impl std::str::FromStr for EncodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bleed" => Ok(EncodePolicy::Bleed),
            "reject" => Ok(EncodePolicy::Reject),
            "clamp" => Ok(EncodePolicy::Clamp),
            other => Err(format!(
                "unknown encode policy '{}' (expected bleed, reject or clamp)",
                other
            )),
        }
    }
}

/// Capabilities shared by the four voice records.
pub trait YmVoice: Sized + Serialize + DeserializeOwned {
    /// Register dialect of this record.
    const DIALECT: Dialect;
    /// Length of the encoded register image.
    const ENCODED_LEN: usize;

    /// Encodes the voice into its register image without range checks.
    fn encode(&self) -> Vec<u8>;

    /// Decodes a register image. Never fails; missing bytes read as zero.
    fn decode(data: &[u8]) -> Self;

    /// Checks every field against its register width.
    fn check_ranges(&self) -> Result<(), VoiceError>;

    /// Returns a copy with every field saturated to its register width.
    fn clamped(&self) -> Self;

    /// Encodes the voice, treating out-of-range fields per `policy`.
    fn encode_with(&self, policy: EncodePolicy) -> Result<Vec<u8>, VoiceError> {
        match policy {
            EncodePolicy::Bleed => Ok(self.encode()),
            EncodePolicy::Reject => {
                self.check_ranges()?;
                Ok(self.encode())
            }
            EncodePolicy::Clamp => Ok(self.clamped().encode()),
        }
    }

    /// Lowercase hex string of the encoded register image.
    fn to_hash(&self) -> String {
        self.encode().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Serializes to JSON tagged with the dialect discriminant.
    fn to_json(&self) -> Result<String, VoiceError> {
        persist::to_tagged_json(self, Self::DIALECT.type_name())
    }

    /// Loads from tagged JSON; a foreign discriminant is an error.
    fn from_json(json: &str) -> Result<Self, VoiceError> {
        persist::from_tagged_json(json, Self::DIALECT.type_name())
    }
}

/// Logical slot (physical operator 1, 2, 3, 4) stored at each wire position of a
/// four-operator register plane. Wire order is operator 1, 3, 2, 4.
pub(crate) const FOUR_OP_WIRE_ORDER: [usize; 4] = [0, 2, 1, 3];

/// Copies `data` into a fixed-size register image, zero-filling short input.
pub(crate) fn registers<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut regs = [0u8; N];
    let len = data.len().min(N);
    regs[..len].copy_from_slice(&data[..len]);
    regs
}

pub(crate) fn field_max(bits: u32) -> u8 {
    ((1u16 << bits) - 1) as u8
}

pub(crate) fn check_field(
    field: &'static str,
    slot: Option<usize>,
    value: u8,
    bits: u32,
) -> Result<(), VoiceError> {
    let max = field_max(bits);
    if value > max {
        return Err(VoiceError::FieldOutOfRange {
            field,
            slot,
            value,
            max,
        });
    }
    Ok(())
}

pub(crate) fn clamp_field(value: u8, bits: u32) -> u8 {
    value.min(field_max(bits))
}

/// Implements `check_ranges` and `clamped` for a slot record from its field widths.
macro_rules! register_fields {
    ($ty:ident { $($field:ident: $bits:expr),* $(,)? }) => {
        impl $ty {
            /// Checks every field against its register width.
            pub fn check_ranges(
                &self,
                slot: Option<usize>,
            ) -> Result<(), $crate::error::VoiceError> {
                $( $crate::voice::check_field(stringify!($field), slot, self.$field, $bits)?; )*
                Ok(())
            }

            /// Returns a copy with every field saturated to its register width.
            pub fn clamped(&self) -> Self {
                Self {
                    $( $field: $crate::voice::clamp_field(self.$field, $bits), )*
                }
            }
        }
    };
}
pub(crate) use register_fields;

/// A voice of any supported dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Voice {
    Opl(OplVoice),
    Opll(OpllVoice),
    Opm(OpmVoice),
    Opn(OpnVoice),
}

impl Voice {
    /// Returns the dialect of the wrapped record.
    pub fn dialect(&self) -> Dialect {
        match self {
            Voice::Opl(_) => Dialect::Opl,
            Voice::Opll(_) => Dialect::Opll,
            Voice::Opm(_) => Dialect::Opm,
            Voice::Opn(_) => Dialect::Opn,
        }
    }

    /// Decodes a register image of the given dialect.
    pub fn decode(dialect: Dialect, data: &[u8]) -> Self {
        match dialect {
            Dialect::Opl => Voice::Opl(OplVoice::decode(data)),
            Dialect::Opll => Voice::Opll(OpllVoice::decode(data)),
            Dialect::Opm => Voice::Opm(OpmVoice::decode(data)),
            Dialect::Opn => Voice::Opn(OpnVoice::decode(data)),
        }
    }

    /// Encodes the wrapped record without range checks.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Voice::Opl(v) => v.encode(),
            Voice::Opll(v) => v.encode(),
            Voice::Opm(v) => v.encode(),
            Voice::Opn(v) => v.encode(),
        }
    }

    /// Encodes the wrapped record under the given policy.
    pub fn encode_with(&self, policy: EncodePolicy) -> Result<Vec<u8>, VoiceError> {
        match self {
            Voice::Opl(v) => v.encode_with(policy),
            Voice::Opll(v) => v.encode_with(policy),
            Voice::Opm(v) => v.encode_with(policy),
            Voice::Opn(v) => v.encode_with(policy),
        }
    }

    /// Lowercase hex string of the encoded register image.
    pub fn to_hash(&self) -> String {
        match self {
            Voice::Opl(v) => v.to_hash(),
            Voice::Opll(v) => v.to_hash(),
            Voice::Opm(v) => v.to_hash(),
            Voice::Opn(v) => v.to_hash(),
        }
    }

    /// Serializes to tagged JSON.
    pub fn to_json(&self) -> Result<String, VoiceError> {
        match self {
            Voice::Opl(v) => v.to_json(),
            Voice::Opll(v) => v.to_json(),
            Voice::Opm(v) => v.to_json(),
            Voice::Opn(v) => v.to_json(),
        }
    }

    /// Loads tagged JSON of the given dialect.
    pub fn from_json(dialect: Dialect, json: &str) -> Result<Self, VoiceError> {
        Ok(match dialect {
            Dialect::Opl => Voice::Opl(OplVoice::from_json(json)?),
            Dialect::Opll => Voice::Opll(OpllVoice::from_json(json)?),
            Dialect::Opm => Voice::Opm(OpmVoice::from_json(json)?),
            Dialect::Opn => Voice::Opn(OpnVoice::from_json(json)?),
        })
    }

    /// Converts to `target`, producing one voice, or two when a four-operator
    /// voice is emulated on a pair of OPL channels.
    pub fn convert(&self, target: Dialect, options: &ConvertOptions) -> Vec<Voice> {
        convert::convert(self, target, options)
    }
}

impl From<OplVoice> for Voice {
    fn from(v: OplVoice) -> Self {
        Voice::Opl(v)
    }
}

impl From<OpllVoice> for Voice {
    fn from(v: OpllVoice) -> Self {
        Voice::Opll(v)
    }
}

impl From<OpmVoice> for Voice {
    fn from(v: OpmVoice) -> Self {
        Voice::Opm(v)
    }
}

impl From<OpnVoice> for Voice {
    fn from(v: OpnVoice) -> Self {
        Voice::Opn(v)
    }
}
