//! Binary cursor over an input span.
//!
//! Decodes the primitive vocabulary of the file format: LEB128 variable
//! length unsigned integers, zig-zag signed integers, 32-bit little-endian
//! floats, length-prefixed UTF-8 strings, raw byte spans and 32-bit ARGB
//! colors.
//!
//! The reader records a sticky error flag on short read, malformed VarUint
//! or invalid UTF-8; once set, every subsequent read is a no-op returning a
//! default value. Callers check [`BinaryReader::has_error`] at the points
//! where the format allows recovery decisions.

/// Byte cursor with a sticky error flag. Never allocates; strings and byte
/// spans borrow from the input.
pub struct BinaryReader<'a> {
    bytes: &'a [u8],
    position: usize,
    error: bool,
}

impl<'a> BinaryReader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            error: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }

    #[inline]
    #[must_use]
    pub fn reached_end(&self) -> bool {
        self.error || self.position >= self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn fail<T: Default>(&mut self) -> T {
        self.error = true;
        T::default()
    }

    /// Reads one raw byte.
    pub fn read_u8(&mut self) -> u8 {
        self.read_byte()
    }

    fn read_byte(&mut self) -> u8 {
        if self.error {
            return 0;
        }
        match self.bytes.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                byte
            }
            None => self.fail(),
        }
    }

    /// Reads an LEB128 unsigned integer of up to 64 bits.
    pub fn read_var_u64(&mut self) -> u64 {
        if self.error {
            return 0;
        }
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            if shift >= 64 {
                return self.fail();
            }
            let byte = self.read_byte();
            if self.error {
                return 0;
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return value;
            }
            shift += 7;
        }
    }

    /// Reads a VarUint and narrows it to 32 bits; overflow is an error.
    pub fn read_var_u32(&mut self) -> u32 {
        let value = self.read_var_u64();
        match u32::try_from(value) {
            Ok(v) => v,
            Err(_) => self.fail(),
        }
    }

    /// Reads a zig-zag encoded signed integer.
    pub fn read_var_i64(&mut self) -> i64 {
        let raw = self.read_var_u64();
        ((raw >> 1) as i64) ^ -((raw & 1) as i64)
    }

    /// Reads a 32-bit little-endian IEEE-754 float.
    pub fn read_f32(&mut self) -> f32 {
        if self.error {
            return 0.0;
        }
        let Some(slice) = self
            .bytes
            .get(self.position..self.position + 4)
        else {
            return self.fail();
        };
        self.position += 4;
        f32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]])
    }

    /// Reads a 32-bit little-endian ARGB color.
    pub fn read_color(&mut self) -> u32 {
        if self.error {
            return 0;
        }
        let Some(slice) = self
            .bytes
            .get(self.position..self.position + 4)
        else {
            return self.fail();
        };
        self.position += 4;
        u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]])
    }

    /// Reads a single byte as a boolean (non-zero is true).
    pub fn read_bool(&mut self) -> bool {
        self.read_byte() != 0
    }

    /// Reads a VarUint length followed by that many raw bytes.
    pub fn read_bytes(&mut self) -> &'a [u8] {
        let length = self.read_var_u64() as usize;
        if self.error {
            return &[];
        }
        let Some(slice) = self.bytes.get(self.position..self.position + length) else {
            return self.fail();
        };
        self.position += length;
        slice
    }

    /// Reads a VarUint length followed by UTF-8 text. Invalid UTF-8 sets the
    /// error flag.
    pub fn read_str(&mut self) -> &'a str {
        let bytes = self.read_bytes();
        if self.error {
            return "";
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => self.fail(),
        }
    }
}
