//! Multipart upload planning

/// S3 rejects non-final parts smaller than 5 MiB
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// S3 accepts at most 10 000 parts per upload
pub const MAX_PARTS: u64 = 10_000;

/// One contiguous slice of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpec {
    /// 1-based part number
    pub number: i32,
    pub offset: u64,
    pub length: u64,
}

/// Returns the part size actually used for a file of `content_length` bytes
///
/// The requested size is raised to the provider minimum, and further when the
/// file would otherwise need more than [`MAX_PARTS`] parts.
pub fn effective_part_size(content_length: u64, requested: u64) -> u64 {
    requested
        .max(MIN_PART_SIZE)
        .max(content_length.div_ceil(MAX_PARTS))
}

/// Splits `content_length` bytes into consecutive parts
pub fn plan_parts(content_length: u64, requested_part_size: u64) -> Vec<PartSpec> {
    let part_size = effective_part_size(content_length, requested_part_size);
    let mut parts = Vec::with_capacity(content_length.div_ceil(part_size) as usize);
    let mut offset = 0;

    while offset < content_length {
        let length = part_size.min(content_length - offset);
        parts.push(PartSpec {
            number: parts.len() as i32 + 1,
            offset,
            length,
        });
        offset += length;
    }

    parts
}
