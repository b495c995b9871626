use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

const OFFSET_PREFIX: &str = "offset:";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("Invalid cursor")]
    Invalid,
}

/// Opaque cursor over a locally paginated sequence (base64-encoded offset).
///
/// The offset is the number of items already handed out, so the next page
/// starts exactly where the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor(u64);

impl OffsetCursor {
    pub fn new(offset: u64) -> Self {
        OffsetCursor(offset)
    }

    pub fn offset(&self) -> u64 {
        self.0
    }

    /// Encode the cursor as a base64 string.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}{}", OFFSET_PREFIX, self.0))
    }

    /// Decode a cursor string produced by [`OffsetCursor::encode`].
    pub fn decode(s: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD.decode(s).map_err(|_| CursorError::Invalid)?;
        let text = std::str::from_utf8(&bytes).map_err(|_| CursorError::Invalid)?;
        let offset = text
            .strip_prefix(OFFSET_PREFIX)
            .ok_or(CursorError::Invalid)?
            .parse()
            .map_err(|_| CursorError::Invalid)?;
        Ok(OffsetCursor(offset))
    }
}
