// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Option sets, unsigned integers of a fixed width whose bits are named flags.

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    io::{Read, Write},
    marker::PhantomData,
};

use serde_json::Value;

use crate::{
    encoding::*,
    json::{self, JsonEncoder},
    status_code::StatusCode,
    variant::Variant,
    variant_type_id::VariantTypeId,
    xml::{self, XmlEncoder, XmlNode},
};

/// A named bit of an option set.
pub trait OptionSetFlag: Copy + Ord + Hash + fmt::Debug + 'static {
    /// The integer kind the set is held in, one of Byte, UInt16, UInt32 or UInt64.
    const KIND: VariantTypeId;
    /// Every flag of the set.
    const FLAGS: &'static [Self];

    /// The index of the flag's bit.
    fn bit(&self) -> u32;

    fn name(&self) -> &'static str;
}

/// An immutable set of flags held as the raw integer. Equality, ordering and hashing only look
/// at the raw value and the width, not at the valid bits.
pub struct OptionSet<F: OptionSetFlag> {
    value: u64,
    valid_bits: Option<u64>,
    _flag: PhantomData<F>,
}

impl<F: OptionSetFlag> Clone for OptionSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: OptionSetFlag> Copy for OptionSet<F> {}

impl<F: OptionSetFlag> Default for OptionSet<F> {
    fn default() -> Self {
        Self::raw(0, None)
    }
}

impl<F: OptionSetFlag> PartialEq for OptionSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F: OptionSetFlag> Eq for OptionSet<F> {}

impl<F: OptionSetFlag> PartialOrd for OptionSet<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: OptionSetFlag> Ord for OptionSet<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<F: OptionSetFlag> Hash for OptionSet<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::width().hash(state);
        self.value.hash(state);
    }
}

impl<F: OptionSetFlag> fmt::Debug for OptionSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSet")
            .field("value", &format_args!("{:#x}", self.value))
            .field("flags", &self.to_set())
            .field("valid_bits", &self.valid_bits)
            .finish()
    }
}

impl<F: OptionSetFlag> fmt::Display for OptionSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.to_set().iter().map(|flag| flag.name()).collect();
        write!(f, "{}", names.join(" | "))
    }
}

impl<F: OptionSetFlag> OptionSet<F> {
    fn raw(value: u64, valid_bits: Option<u64>) -> Self {
        OptionSet {
            value,
            valid_bits,
            _flag: PhantomData,
        }
    }

    /// The number of bits in the set.
    pub fn width() -> u32 {
        match F::KIND {
            VariantTypeId::Byte => 8,
            VariantTypeId::UInt16 => 16,
            VariantTypeId::UInt32 => 32,
            _ => 64,
        }
    }

    fn mask() -> u64 {
        match Self::width() {
            64 => u64::MAX,
            width => (1u64 << width) - 1,
        }
    }

    fn check_bits(bits: u64) -> EncodingResult<u64> {
        if bits & !Self::mask() != 0 {
            error!(
                "Bits {:#x} do not fit in an option set of {} bits",
                bits,
                Self::width()
            );
            Err(EncodingError::encoding_status(
                StatusCode::BadOutOfRange,
                format!("{:#x} does not fit in {} bits", bits, Self::width()),
            ))
        } else {
            Ok(bits)
        }
    }

    /// Creates a set of the flags. A flag whose bit is beyond the width of the set is an error.
    pub fn of(flags: &[F]) -> EncodingResult<Self> {
        flags
            .iter()
            .try_fold(Self::default(), |set, flag| set.with_bit(flag.bit()))
    }

    /// Creates a set from the raw value.
    pub fn from_bits(bits: u64) -> EncodingResult<Self> {
        Ok(Self::raw(Self::check_bits(bits)?, None))
    }

    /// Returns a copy of the set with the bit set.
    pub fn with_bit(&self, bit: u32) -> EncodingResult<Self> {
        if bit >= Self::width() {
            error!("Bit {} is beyond an option set of {} bits", bit, Self::width());
            return Err(EncodingError::encoding_status(
                StatusCode::BadOutOfRange,
                format!("bit {} is beyond {} bits", bit, Self::width()),
            ));
        }
        Ok(Self::raw(self.value | (1 << bit), self.valid_bits))
    }

    /// Returns a copy of the set that only asserts the bits of `valid_bits`.
    pub fn with_valid_bits(&self, valid_bits: u64) -> EncodingResult<Self> {
        Ok(Self::raw(self.value, Some(Self::check_bits(valid_bits)?)))
    }

    pub fn bits(&self) -> u64 {
        self.value
    }

    pub fn valid_bits(&self) -> Option<u64> {
        self.valid_bits
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    pub fn is_set(&self, flag: F) -> bool {
        flag.bit() < Self::width() && self.value & (1 << flag.bit()) != 0
    }

    /// Returns `None` when the flag's bit is not one of the valid bits, otherwise if it is set.
    pub fn is_asserted(&self, flag: F) -> Option<bool> {
        match self.valid_bits {
            Some(valid_bits) if flag.bit() >= Self::width() || valid_bits & (1 << flag.bit()) == 0 => {
                None
            }
            _ => Some(self.is_set(flag)),
        }
    }

    /// The flags that are set. Bits without a flag are left out.
    pub fn to_set(&self) -> BTreeSet<F> {
        F::FLAGS
            .iter()
            .copied()
            .filter(|flag| self.is_set(*flag))
            .collect()
    }

    /// The set as a variant of its integer kind.
    pub fn to_variant(&self) -> Variant {
        match F::KIND {
            VariantTypeId::Byte => Variant::Byte(self.value as u8),
            VariantTypeId::UInt16 => Variant::UInt16(self.value as u16),
            VariantTypeId::UInt32 => Variant::UInt32(self.value as u32),
            _ => Variant::UInt64(self.value),
        }
    }

    /// Reads the set from a variant, which must hold the integer kind of the set.
    pub fn from_variant(value: &Variant) -> EncodingResult<Self> {
        let bits = match (F::KIND, value) {
            (VariantTypeId::Byte, Variant::Byte(v)) => u64::from(*v),
            (VariantTypeId::UInt16, Variant::UInt16(v)) => u64::from(*v),
            (VariantTypeId::UInt32, Variant::UInt32(v)) => u64::from(*v),
            (VariantTypeId::UInt64, Variant::UInt64(v)) => *v,
            (kind, value) => {
                return Err(EncodingError::decoding_status(
                    StatusCode::BadTypeMismatch,
                    format!("expected an option set of {:?}, got {:?}", kind, value),
                ))
            }
        };
        Ok(Self::raw(bits, None))
    }

    fn decoded(bits: u64) -> EncodingResult<Self> {
        Self::check_bits(bits)
            .map(|bits| Self::raw(bits, None))
            .map_err(|_| {
                EncodingError::decoding_status(
                    StatusCode::BadOutOfRange,
                    format!("{} does not fit in {} bits", bits, Self::width()),
                )
            })
    }
}

impl<F: OptionSetFlag> From<OptionSet<F>> for Variant {
    fn from(v: OptionSet<F>) -> Self {
        v.to_variant()
    }
}

impl<F: OptionSetFlag> BinaryEncoder<OptionSet<F>> for OptionSet<F> {
    fn byte_len(&self, _: &Context<'_>) -> usize {
        (Self::width() / 8) as usize
    }

    fn encode<S: Write>(&self, stream: &mut S, _: &Context<'_>) -> EncodingResult<usize> {
        match F::KIND {
            VariantTypeId::Byte => write_u8(stream, self.value as u8),
            VariantTypeId::UInt16 => write_u16(stream, self.value as u16),
            VariantTypeId::UInt32 => write_u32(stream, self.value as u32),
            _ => write_u64(stream, self.value),
        }
    }

    fn decode<S: Read>(stream: &mut S, _: &Context<'_>) -> EncodingResult<Self> {
        let bits = match F::KIND {
            VariantTypeId::Byte => u64::from(read_u8(stream)?),
            VariantTypeId::UInt16 => u64::from(read_u16(stream)?),
            VariantTypeId::UInt32 => u64::from(read_u32(stream)?),
            _ => read_u64(stream)?,
        };
        Ok(Self::raw(bits, None))
    }
}

impl<F: OptionSetFlag> JsonEncoder for OptionSet<F> {
    fn encode_json(&self, _: &Context<'_>) -> EncodingResult<Value> {
        Ok(Value::from(self.value))
    }

    fn decode_json(json: &Value, _: &Context<'_>) -> EncodingResult<Self> {
        match json {
            Value::Null => Ok(Self::default()),
            Value::Number(n) => match n.as_u64() {
                Some(bits) => Self::decoded(bits),
                None => Err(json::unexpected("an option set", json)),
            },
            json => Err(json::unexpected("an option set", json)),
        }
    }
}

impl<F: OptionSetFlag> XmlEncoder for OptionSet<F> {
    fn encode_xml(&self, node: &mut XmlNode, _: &Context<'_>) -> EncodingResult<()> {
        node.text = Some(self.value.to_string());
        Ok(())
    }

    fn decode_xml(node: &XmlNode, _: &Context<'_>) -> EncodingResult<Self> {
        let text = node.text().trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        match text.parse::<u64>() {
            Ok(bits) => Self::decoded(bits),
            Err(_) => Err(xml::unexpected("an option set", node)),
        }
    }
}

/// Declares a flag enumeration, its option set type and a getter per flag.
macro_rules! option_set {
    (
        $(#[$doc: meta])*
        $set: ident, $flag: ident, $kind: ident,
        { $($name: ident = $bit: expr => $getter: ident),* $(,)? }
    ) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $flag {
            $($name),*
        }

        impl OptionSetFlag for $flag {
            const KIND: VariantTypeId = VariantTypeId::$kind;
            const FLAGS: &'static [Self] = &[$($flag::$name),*];

            fn bit(&self) -> u32 {
                match self {
                    $($flag::$name => $bit),*
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    $($flag::$name => stringify!($name)),*
                }
            }
        }

        $(#[$doc])*
        pub type $set = OptionSet<$flag>;

        impl OptionSet<$flag> {
            $(
                pub fn $getter(&self) -> bool {
                    self.is_set($flag::$name)
                }
            )*
        }
    };
}

option_set!(
    /// The AccessLevelType of a variable, held in a Byte.
    AccessLevelType, AccessLevel, Byte,
    {
        CurrentRead = 0 => current_read,
        CurrentWrite = 1 => current_write,
        HistoryRead = 2 => history_read,
        HistoryWrite = 3 => history_write,
        SemanticChange = 4 => semantic_change,
        StatusWrite = 5 => status_write,
        TimestampWrite = 6 => timestamp_write,
    }
);

option_set!(
    /// The AccessRestrictionType of a node, held in a UInt16.
    AccessRestrictionType, AccessRestriction, UInt16,
    {
        SigningRequired = 0 => signing_required,
        EncryptionRequired = 1 => encryption_required,
        SessionRequired = 2 => session_required,
        ApplyRestrictionsToBrowse = 3 => apply_restrictions_to_browse,
    }
);

option_set!(
    /// The AccessLevelExType of a variable, held in a UInt32.
    AccessLevelExType, AccessLevelEx, UInt32,
    {
        CurrentRead = 0 => current_read,
        CurrentWrite = 1 => current_write,
        HistoryRead = 2 => history_read,
        HistoryWrite = 3 => history_write,
        SemanticChange = 4 => semantic_change,
        StatusWrite = 5 => status_write,
        TimestampWrite = 6 => timestamp_write,
        NonatomicRead = 8 => nonatomic_read,
        NonatomicWrite = 9 => nonatomic_write,
        WriteFullArrayOnly = 10 => write_full_array_only,
        NoSubDataTypes = 11 => no_sub_data_types,
    }
);

option_set!(
    /// The EventNotifierType of an object or view, held in a Byte.
    EventNotifierType, EventNotifier, Byte,
    {
        SubscribeToEvents = 0 => subscribe_to_events,
        HistoryRead = 2 => history_read,
        HistoryWrite = 3 => history_write,
    }
);
