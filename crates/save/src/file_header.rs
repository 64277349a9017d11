// ---------------------------------------------------------------------------
// file_header – Blob file header with magic bytes, version, length, checksum
// ---------------------------------------------------------------------------
//
// Header format (16 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "LOTK" (0x4C4F544B)
//   [4..8]   Format version (u32)
//   [8..12]  Payload length in bytes (u32)
//   [12..16] xxHash32 checksum of the payload (everything after the header)
//
// On write: prepend header (with checksum of the utf-8 payload)
// On read: check magic -> check length -> validate checksum -> strip header
// Raw: if the first 4 bytes != "LOTK", the whole file is the payload
// (a blob written by hand or by another tool).

use xxhash_rust::xxh32::xxh32;

/// Magic bytes identifying a lot blob file.
pub const MAGIC: [u8; 4] = *b"LOTK";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Current header layout version.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Seed for xxHash32 checksum.
const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub payload_len: u32,
    pub checksum: u32,
}

impl FileHeader {
    /// Create a new header for the given payload.
    pub fn new(payload: &[u8]) -> Self {
        Self {
            format_version: HEADER_FORMAT_VERSION,
            payload_len: payload.len() as u32,
            checksum: xxh32(payload, XXHASH_SEED),
        }
    }
}

/// Wrap a payload with a file header.
///
/// Returns bytes: [header (16 bytes)] ++ [payload].
pub fn wrap_with_header(payload: &[u8]) -> Vec<u8> {
    let header = FileHeader::new(payload);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&header.format_version.to_le_bytes());
    out.extend_from_slice(&header.payload_len.to_le_bytes());
    out.extend_from_slice(&header.checksum.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Result of unwrapping a blob file's bytes.
pub enum UnwrapResult<'a> {
    /// File has a valid header; the payload bytes follow.
    WithHeader {
        header: FileHeader,
        payload: &'a [u8],
    },
    /// File has no header; the entire buffer is the payload.
    Raw(&'a [u8]),
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse and validate the file header from raw bytes.
///
/// # Errors
///
/// Returns an error if:
/// - The magic is present but the file is shorter than a header
/// - The header format version is newer than this build
/// - The payload length does not match the header
/// - The checksum does not match (data corruption)
pub fn unwrap_header(bytes: &[u8]) -> Result<UnwrapResult<'_>, String> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Ok(UnwrapResult::Raw(bytes));
    }

    if bytes.len() < HEADER_SIZE {
        return Err(format!(
            "Blob file has LOTK magic bytes but is too short ({} bytes, \
             need at least {} for header)",
            bytes.len(),
            HEADER_SIZE
        ));
    }

    let format_version = read_u32(bytes, 4);
    let payload_len = read_u32(bytes, 8);
    let checksum = read_u32(bytes, 12);

    if format_version > HEADER_FORMAT_VERSION {
        return Err(format!(
            "Blob file uses header format version {format_version}, but this build only \
             supports up to version {HEADER_FORMAT_VERSION}",
        ));
    }

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_len as usize {
        return Err(format!(
            "Blob file is truncated: header says {} payload bytes, found {}",
            payload_len,
            payload.len()
        ));
    }

    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(format!(
            "Blob file is corrupted: checksum mismatch \
             (expected {checksum:#010X}, got {computed:#010X})",
        ));
    }

    Ok(UnwrapResult::WithHeader {
        header: FileHeader {
            format_version,
            payload_len,
            checksum,
        },
        payload,
    })
}
