//! Canonical hashing of converted charts.
//!
//! Conversion must be reproducible bit-for-bit, so charts are compared by a
//! BLAKE3 hash over a fixed binary encoding rather than over JSON text:
//!
//! ```text
//! per note: lane (u32 LE) | time (i32 LE) | is_hold (u8) | end_time (i32 LE)
//! ```

use crate::object::ConvertedNote;

/// Size in bytes of one encoded note.
const NOTE_ENCODED_LEN: usize = 13;

/// Encodes notes into the canonical byte layout.
pub fn encode_notes(notes: &[ConvertedNote]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(notes.len() * NOTE_ENCODED_LEN);
    for note in notes {
        bytes.extend_from_slice(&(note.lane as u32).to_le_bytes());
        bytes.extend_from_slice(&note.time.to_le_bytes());
        bytes.push(u8::from(note.is_hold));
        bytes.extend_from_slice(&note.end_time.to_le_bytes());
    }
    bytes
}

/// Computes the canonical BLAKE3 hash of a converted chart.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
///
/// # Example
/// ```
/// use lanecast_chart::ConvertedNote;
/// use lanecast_chart::hash::notes_hash;
///
/// let hash = notes_hash(&[ConvertedNote::tap(0, 100)]);
/// assert_eq!(hash.len(), 64);
/// ```
pub fn notes_hash(notes: &[ConvertedNote]) -> String {
    blake3::hash(&encode_notes(notes)).to_hex().to_string()
}

/// Computes the BLAKE3 hash of raw source bytes (e.g. an input file).
pub fn source_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_layout() {
        let bytes = encode_notes(&[ConvertedNote::hold(3, 1000, 1500)]);
        assert_eq!(bytes.len(), NOTE_ENCODED_LEN);
        assert_eq!(&bytes[0..4], &3u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1000i32.to_le_bytes());
        assert_eq!(bytes[8], 1);
        assert_eq!(&bytes[9..13], &1500i32.to_le_bytes());
    }

    #[test]
    fn test_hash_stability() {
        let notes = vec![ConvertedNote::tap(0, 100), ConvertedNote::tap(2, 200)];
        assert_eq!(notes_hash(&notes), notes_hash(&notes));
        assert_eq!(notes_hash(&notes).len(), 64);
    }

    #[test]
    fn test_hash_sensitive_to_lane_and_order() {
        let a = vec![ConvertedNote::tap(0, 100), ConvertedNote::tap(1, 100)];
        let b = vec![ConvertedNote::tap(1, 100), ConvertedNote::tap(0, 100)];
        let c = vec![ConvertedNote::tap(0, 100), ConvertedNote::tap(2, 100)];
        assert_ne!(notes_hash(&a), notes_hash(&b));
        assert_ne!(notes_hash(&a), notes_hash(&c));
    }
}
