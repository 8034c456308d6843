//! `MsgPackEncoder` — recursive MessagePack encoder with a narrowest-fit
//! tag policy.
//!
//! Both front ends go through the same header helpers: [`write_any`] walks
//! the canonical [`Value`] model, [`write_json`] walks a `serde_json`
//! document directly. Encoding the same logical value through either path
//! produces byte-identical output.
//!
//! [`write_any`]: MsgPackEncoder::write_any
//! [`write_json`]: MsgPackEncoder::write_json

use zonepack_buffers::Writer;

use crate::Value;

pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes one value tree to MessagePack bytes.
    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    /// Encodes a `serde_json` document to MessagePack bytes.
    pub fn encode_json(&mut self, value: &serde_json::Value) -> Vec<u8> {
        self.writer.reset();
        self.write_json(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::UInt(u) => self.write_uint(*u),
            Value::Int(i) => self.write_int(*i),
            Value::Float(f) => self.write_float(*f),
            Value::Str(s) => self.write_str(s),
            Value::Bin(b) => self.write_bin(b),
            Value::Arr(items) => self.write_arr(items),
            Value::Map(pairs) => self.write_map(pairs),
        }
    }

    pub fn write_json(&mut self, value: &serde_json::Value) {
        match value {
            serde_json::Value::Null => self.write_null(),
            serde_json::Value::Bool(b) => self.write_boolean(*b),
            serde_json::Value::Number(n) => {
                // Same classification as the canonical model: non-negative
                // integers go unsigned, negative signed, the rest float64.
                if let Some(u) = n.as_u64() {
                    self.write_uint(u);
                } else if let Some(i) = n.as_i64() {
                    self.write_int(i);
                } else {
                    self.write_float(n.as_f64().unwrap_or(f64::NAN));
                }
            }
            serde_json::Value::String(s) => self.write_str(s),
            serde_json::Value::Array(items) => {
                self.write_arr_hdr(items.len());
                for item in items {
                    self.write_json(item);
                }
            }
            serde_json::Value::Object(obj) => {
                self.write_map_hdr(obj.len());
                for (key, val) in obj {
                    self.write_str(key);
                    self.write_json(val);
                }
            }
        }
    }

    pub fn write_null(&mut self) {
        self.writer.u8(0xc0);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { 0xc3 } else { 0xc2 });
    }

    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(0xcb, float);
    }

    /// Narrowest unsigned encoding: positive fixint, then uint8/16/32/64.
    pub fn write_uint(&mut self, uint: u64) {
        if uint <= 0x7f {
            self.writer.u8(uint as u8);
        } else if uint <= 0xff {
            self.writer.u16(0xcc00 | uint as u16);
        } else if uint <= 0xffff {
            self.writer.u8u16(0xcd, uint as u16);
        } else if uint <= 0xffff_ffff {
            self.writer.u8u32(0xce, uint as u32);
        } else {
            self.writer.u8u64(0xcf, uint);
        }
    }

    /// Narrowest signed encoding for negatives: negative fixint, then
    /// int8/16/32/64. Non-negative input is routed to [`write_uint`] so an
    /// unsigned tag always carries it.
    ///
    /// [`write_uint`]: MsgPackEncoder::write_uint
    pub fn write_int(&mut self, int: i64) {
        if int >= 0 {
            self.write_uint(int as u64);
        } else if int >= -0x20 {
            self.writer.u8(int as u8);
        } else if int >= i8::MIN as i64 {
            self.writer.u16(0xd000 | (int as u8) as u16);
        } else if int >= i16::MIN as i64 {
            self.writer.u8u16(0xd1, int as u16);
        } else if int >= i32::MIN as i64 {
            self.writer.u8u32(0xd2, int as u32);
        } else {
            self.writer.u8u64(0xd3, int as u64);
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) {
        debug_assert!(length <= u32::MAX as usize, "str length unrepresentable");
        if length <= 0x1f {
            self.writer.u8(0xa0 | length as u8);
        } else if length <= 0xff {
            self.writer.u16(0xd900 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xda, length as u16);
        } else {
            self.writer.u8u32(0xdb, length as u32);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len());
        self.writer.utf8(s);
    }

    pub fn write_bin_hdr(&mut self, length: usize) {
        debug_assert!(length <= u32::MAX as usize, "bin length unrepresentable");
        if length <= 0xff {
            self.writer.u16(0xc400 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xc5, length as u16);
        } else {
            self.writer.u8u32(0xc6, length as u32);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_bin_hdr(buf.len());
        self.writer.buf(buf);
    }

    pub fn write_arr_hdr(&mut self, length: usize) {
        debug_assert!(length <= u32::MAX as usize, "element count unrepresentable");
        if length <= 0xf {
            self.writer.u8(0x90 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(0xdc, length as u16);
        } else {
            self.writer.u8u32(0xdd, length as u32);
        }
    }

    pub fn write_arr(&mut self, items: &[Value]) {
        self.write_arr_hdr(items.len());
        for item in items {
            self.write_any(item);
        }
    }

    pub fn write_map_hdr(&mut self, length: usize) {
        debug_assert!(length <= u32::MAX as usize, "pair count unrepresentable");
        if length <= 0xf {
            self.writer.u8(0x80 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(0xde, length as u16);
        } else {
            self.writer.u8u32(0xdf, length as u32);
        }
    }

    /// Map keys are encoded as fully generic nodes, not only strings.
    pub fn write_map(&mut self, pairs: &[(Value, Value)]) {
        self.write_map_hdr(pairs.len());
        for (key, val) in pairs {
            self.write_any(key);
            self.write_any(val);
        }
    }
}
