//! Static device-to-runner assignment.

use gps_core::DeviceId;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| (hash ^ b as u32).wrapping_mul(FNV_PRIME))
}

/// Runner index for `id` among `runners` runners.  A pure function of the id
/// bytes, so a device always lands on the same runner.
#[inline]
pub fn shard(id: DeviceId, runners: usize) -> usize {
    fnv1a(&id.to_bytes()) as usize % runners.max(1)
}
