use crate::ports::outbound::ChecksumProvider;

/// Checksum provider backed by `crc32fast`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32ChecksumProvider;

impl ChecksumProvider for Crc32ChecksumProvider {
    fn compute_crc32(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }
}
