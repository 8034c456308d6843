//! `MsgPackDecoder` — recursive MessagePack decoder allocating the value
//! tree out of a caller-supplied [`Zone`].
//!
//! Each array or map becomes exactly one zone allocation, filled in wire
//! order; string and binary payloads are copied into the zone, so the
//! input buffer may be reused once decoding returns. A failed decode
//! returns only the error; abandoned allocations are reclaimed when the
//! zone drops.

use crate::{Value, Zone};

use super::error::DecodeError;

/// Containers nested deeper than this fail with
/// [`DecodeError::DepthLimit`], bounding stack use on adversarial input.
pub const MAX_DEPTH: usize = 128;

pub struct MsgPackDecoder<'a, 'z> {
    data: &'a [u8],
    x: usize,
    zone: &'z Zone,
}

impl<'a, 'z> MsgPackDecoder<'a, 'z> {
    pub fn new(data: &'a [u8], zone: &'z Zone) -> Self {
        Self { data, x: 0, zone }
    }

    /// Decodes one value. Trailing bytes after it are ignored.
    pub fn decode(mut self) -> Result<Value<'z>, DecodeError> {
        self.read_any(0)
    }

    /// Decodes one value and rejects trailing input.
    pub fn decode_exact(mut self) -> Result<Value<'z>, DecodeError> {
        let value = self.read_any(0)?;
        if self.x != self.data.len() {
            return Err(DecodeError::TrailingBytes(self.x));
        }
        Ok(value)
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), DecodeError> {
        if self.remaining() < n {
            Err(DecodeError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, DecodeError> {
        self.check(1)?;
        let v = self.data[self.x];
        self.x += 1;
        Ok(v)
    }

    #[inline]
    fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.take::<2>()?))
    }

    #[inline]
    fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.take::<4>()?))
    }

    #[inline]
    fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.take::<8>()?))
    }

    #[inline]
    fn i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.u8()? as i8)
    }

    #[inline]
    fn i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.take::<2>()?))
    }

    #[inline]
    fn i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.take::<4>()?))
    }

    #[inline]
    fn i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_be_bytes(self.take::<8>()?))
    }

    #[inline]
    fn f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.take::<4>()?))
    }

    #[inline]
    fn f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_be_bytes(self.take::<8>()?))
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    fn read_str(&mut self, size: usize) -> Result<Value<'z>, DecodeError> {
        self.check(size)?;
        let slice = &self.data[self.x..self.x + size];
        let s = std::str::from_utf8(slice).map_err(|_| DecodeError::InvalidUtf8)?;
        self.x += size;
        Ok(Value::Str(self.zone.alloc_str(s)))
    }

    fn read_bin(&mut self, size: usize) -> Result<Value<'z>, DecodeError> {
        self.check(size)?;
        let slice = &self.data[self.x..self.x + size];
        self.x += size;
        Ok(Value::Bin(self.zone.alloc_copy(slice)))
    }

    /// Every wire integer is normalized by sign: non-negative values
    /// become `UInt`, negative ones `Int`, whatever tag carried them.
    #[inline]
    fn int(int: i64) -> Value<'z> {
        if int >= 0 {
            Value::UInt(int as u64)
        } else {
            Value::Int(int)
        }
    }

    fn read_any(&mut self, depth: usize) -> Result<Value<'z>, DecodeError> {
        let byte = self.u8()?;

        // negative fixint: 0xe0..=0xff → -32..=-1
        if byte >= 0xe0 {
            return Ok(Value::Int(byte as i8 as i64));
        }
        // positive fixint: 0x00..=0x7f
        if byte <= 0x7f {
            return Ok(Value::UInt(byte as u64));
        }
        // fixmap: 0x80..=0x8f
        if (0x80..=0x8f).contains(&byte) {
            return self.read_map(byte as usize & 0xf, depth);
        }
        // fixarray: 0x90..=0x9f
        if (0x90..=0x9f).contains(&byte) {
            return self.read_arr(byte as usize & 0xf, depth);
        }
        // fixstr: 0xa0..=0xbf
        if (0xa0..=0xbf).contains(&byte) {
            return self.read_str(byte as usize & 0x1f);
        }

        match byte {
            0xc0 => Ok(Value::Null),
            0xc2 => Ok(Value::Bool(false)),
            0xc3 => Ok(Value::Bool(true)),
            // bin8, bin16, bin32
            0xc4 => {
                let n = self.u8()? as usize;
                self.read_bin(n)
            }
            0xc5 => {
                let n = self.u16()? as usize;
                self.read_bin(n)
            }
            0xc6 => {
                let n = self.u32()? as usize;
                self.read_bin(n)
            }
            // float32, float64
            0xca => Ok(Value::Float(self.f32()? as f64)),
            0xcb => Ok(Value::Float(self.f64()?)),
            // uint8, uint16, uint32, uint64
            0xcc => Ok(Value::UInt(self.u8()? as u64)),
            0xcd => Ok(Value::UInt(self.u16()? as u64)),
            0xce => Ok(Value::UInt(self.u32()? as u64)),
            0xcf => Ok(Value::UInt(self.u64()?)),
            // int8, int16, int32, int64
            0xd0 => Ok(Self::int(self.i8()? as i64)),
            0xd1 => Ok(Self::int(self.i16()? as i64)),
            0xd2 => Ok(Self::int(self.i32()? as i64)),
            0xd3 => Ok(Self::int(self.i64()?)),
            // str8, str16, str32
            0xd9 => {
                let n = self.u8()? as usize;
                self.read_str(n)
            }
            0xda => {
                let n = self.u16()? as usize;
                self.read_str(n)
            }
            0xdb => {
                let n = self.u32()? as usize;
                self.read_str(n)
            }
            // array16, array32
            0xdc => {
                let n = self.u16()? as usize;
                self.read_arr(n, depth)
            }
            0xdd => {
                let n = self.u32()? as usize;
                self.read_arr(n, depth)
            }
            // map16, map32
            0xde => {
                let n = self.u16()? as usize;
                self.read_map(n, depth)
            }
            0xdf => {
                let n = self.u32()? as usize;
                self.read_map(n, depth)
            }
            // 0xc1 is never used by the format; 0xc7..=0xc9 and
            // 0xd4..=0xd8 are extension tags this engine does not carry.
            _ => Err(DecodeError::InvalidByte(self.x - 1)),
        }
    }

    fn read_arr(&mut self, size: usize, depth: usize) -> Result<Value<'z>, DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::DepthLimit);
        }
        // Each element needs at least one byte, so a count past the
        // remaining input is truncated before anything is allocated.
        if size > self.remaining() {
            return Err(DecodeError::UnexpectedEof);
        }
        let zone = self.zone;
        let items = zone.alloc_slice_try(size, |_| self.read_any(depth + 1))?;
        Ok(Value::Arr(items))
    }

    fn read_map(&mut self, size: usize, depth: usize) -> Result<Value<'z>, DecodeError> {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::DepthLimit);
        }
        // Two bytes minimum per pair (key tag + value tag).
        if size > self.remaining() / 2 {
            return Err(DecodeError::UnexpectedEof);
        }
        let zone = self.zone;
        let pairs = zone.alloc_slice_try(size, |_| {
            let key = self.read_any(depth + 1)?;
            let val = self.read_any(depth + 1)?;
            Ok((key, val))
        })?;
        Ok(Value::Map(pairs))
    }
}
