// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Binary framing of structures. Fields are written back to back with no framing of their own,
//! arrays carry an Int32 length and matrices an Int32 array of dimensions.

use std::io::{Read, Write};

use crate::{
    encoding::*,
    type_registry::EnumDescriptor,
    variant::Variant,
    variant_type_id::VariantTypeId,
};

pub struct BinaryStructEncoder<'s, S: Write> {
    stream: &'s mut S,
    size: usize,
}

impl<'s, S: Write> BinaryStructEncoder<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        BinaryStructEncoder { stream, size: 0 }
    }

    /// The number of bytes written so far
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<'s, S: Write> super::StructEncoder for BinaryStructEncoder<'s, S> {
    fn begin_struct(&mut self, _name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }

    fn end_struct(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }

    fn write_switch(&mut self, _name: &str, value: u32, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.size += write_u32(self.stream, value)?;
        Ok(())
    }

    fn write_scalar(
        &mut self,
        _name: &str,
        kind: VariantTypeId,
        value: &Variant,
        ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        self.size += if kind == VariantTypeId::Variant {
            value.encode(self.stream, ctx)?
        } else {
            Variant::encode_variant_value(self.stream, value, ctx)?
        };
        Ok(())
    }

    fn write_enum(
        &mut self,
        _name: &str,
        value: i32,
        _descriptor: &EnumDescriptor,
        _ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        self.size += write_i32(self.stream, value)?;
        Ok(())
    }

    fn write_null_array(&mut self, _name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.size += write_i32(self.stream, -1)?;
        Ok(())
    }

    fn begin_array(&mut self, _name: &str, len: usize, _ctx: &Context<'_>) -> EncodingResult<()> {
        self.size += write_i32(self.stream, array_length(len)?)?;
        Ok(())
    }

    fn end_array(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }

    fn begin_matrix(
        &mut self,
        _name: &str,
        dimensions: &[u32],
        _ctx: &Context<'_>,
    ) -> EncodingResult<()> {
        self.size += write_i32(self.stream, array_length(dimensions.len())?)?;
        for dimension in dimensions {
            let dimension = i32::try_from(*dimension).map_err(|_| {
                EncodingError::encoding(format!("matrix dimension {} is too large", dimension))
            })?;
            self.size += write_i32(self.stream, dimension)?;
        }
        Ok(())
    }

    fn end_matrix(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }
}

pub struct BinaryStructDecoder<'s, S: Read> {
    stream: &'s mut S,
}

impl<'s, S: Read> BinaryStructDecoder<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        BinaryStructDecoder { stream }
    }
}

impl<'s, S: Read> super::StructDecoder for BinaryStructDecoder<'s, S> {
    fn enter_struct(&mut self, _name: &str, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }

    fn leave_struct(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }

    fn read_switch(&mut self, _name: &str, _ctx: &Context<'_>) -> EncodingResult<u32> {
        read_u32(self.stream)
    }

    fn read_scalar(
        &mut self,
        _name: &str,
        kind: VariantTypeId,
        ctx: &Context<'_>,
    ) -> EncodingResult<Variant> {
        if kind == VariantTypeId::Variant {
            Variant::decode(self.stream, ctx)
        } else {
            Variant::decode_variant_value(self.stream, kind, ctx)
        }
    }

    fn read_enum(
        &mut self,
        _name: &str,
        _descriptor: &EnumDescriptor,
        _ctx: &Context<'_>,
    ) -> EncodingResult<i32> {
        read_i32(self.stream)
    }

    fn enter_array(&mut self, _name: &str, ctx: &Context<'_>) -> EncodingResult<Option<usize>> {
        read_array_length(self.stream, ctx)
    }

    fn leave_array(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }

    fn enter_matrix(&mut self, _name: &str, ctx: &Context<'_>) -> EncodingResult<Option<Vec<u32>>> {
        match read_array_length(self.stream, ctx)? {
            None => Ok(None),
            Some(len) => {
                let mut dimensions = Vec::with_capacity(len);
                for _ in 0..len {
                    let dimension = read_i32(self.stream)?;
                    if dimension <= 0 {
                        error!("Matrix dimension {} is invalid", dimension);
                        return Err(EncodingError::decoding(format!(
                            "invalid matrix dimension {}",
                            dimension
                        )));
                    }
                    dimensions.push(dimension as u32);
                }
                Ok(Some(dimensions))
            }
        }
    }

    fn leave_matrix(&mut self, _ctx: &Context<'_>) -> EncodingResult<()> {
        Ok(())
    }
}
