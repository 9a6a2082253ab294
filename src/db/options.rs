//! Decode configuration

/// Byte width of an integer or float payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarWidth {
    #[default]
    Four,
    Eight,
}

impl ScalarWidth {
    pub const fn bytes(self) -> usize {
        match self {
            ScalarWidth::Four => 4,
            ScalarWidth::Eight => 8,
        }
    }
}

/// Options controlling how field payloads are interpreted
///
/// The format does not record how wide integer and float payloads are; the
/// game was built with 32-bit `int` and `float`, which is the default here.
/// Payloads narrower than the configured width are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub integer_width: ScalarWidth,
    pub float_width: ScalarWidth,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_integer_width(mut self, width: ScalarWidth) -> Self {
        self.integer_width = width;
        self
    }

    pub fn with_float_width(mut self, width: ScalarWidth) -> Self {
        self.float_width = width;
        self
    }
}
