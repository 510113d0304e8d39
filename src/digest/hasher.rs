//! Frame hashing with BLAKE3 or SHA-256.

use crate::video::Frame;
use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3 - fast, the default.
    #[default]
    Blake3,
    /// SHA-256 - for comparing against external tooling.
    Sha256,
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(format!("unknown hash algorithm: {other}")),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// 32-byte digest of one frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDigest([u8; 32]);

impl FrameDigest {
    /// Returns the digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the digest as lowercase hex.
    pub fn hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Debug for FrameDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameDigest({})", self.hex())
    }
}

impl std::fmt::Display for FrameDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Hashes frames with the configured algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameHasher {
    algorithm: HashAlgorithm,
}

impl FrameHasher {
    /// Creates a hasher using `algorithm`.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Returns the configured algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digests the visible samples of all planes, in plane order.
    pub fn digest(&self, frame: &Frame) -> FrameDigest {
        let rows = frame.planes().iter().flat_map(|plane| {
            (0..plane.height()).map(move |y| plane.row(y))
        });

        let data = match self.algorithm {
            HashAlgorithm::Blake3 => {
                let mut hasher = Blake3Hasher::new();
                for row in rows {
                    hasher.update(row);
                }
                *hasher.finalize().as_bytes()
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for row in rows {
                    hasher.update(row);
                }
                let result = hasher.finalize();
                let mut data = [0u8; 32];
                data.copy_from_slice(&result);
                data
            }
        };

        FrameDigest(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{Frame, PixelFormat, Plane, StreamLayout, PLANE_COUNT};

    fn gray_frame(layout: StreamLayout, value: u16) -> Frame {
        let mut frame = Frame::new(layout, 0);
        for index in 0..PLANE_COUNT {
            frame.plane_mut(index).fill(value);
        }
        frame
    }

    #[test]
    fn test_blake3_matches_plain_hash() {
        let layout = StreamLayout::new(4, 2, PixelFormat::Yuv444p);
        let frame = gray_frame(layout, 7);

        let digest = FrameHasher::new(HashAlgorithm::Blake3).digest(&frame);
        let expected = blake3::hash(&[7u8; 24]);
        assert_eq!(digest.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn test_algorithms_differ() {
        let frame = gray_frame(StreamLayout::new(4, 4, PixelFormat::Yuv420p), 16);

        let blake = FrameHasher::new(HashAlgorithm::Blake3).digest(&frame);
        let sha = FrameHasher::new(HashAlgorithm::Sha256).digest(&frame);
        assert_ne!(blake, sha);
        assert_eq!(sha.hex().len(), 64);
    }

    #[test]
    fn test_content_change_changes_digest() {
        let layout = StreamLayout::new(4, 4, PixelFormat::Yuv420p10);
        let a = gray_frame(layout, 512);
        let mut b = a.clone();
        b.plane_mut(2).set_sample(1, 1, 513);

        let hasher = FrameHasher::default();
        assert_ne!(hasher.digest(&a), hasher.digest(&b));
    }

    #[test]
    fn test_stride_padding_ignored() {
        let layout = StreamLayout::new(4, 2, PixelFormat::Yuv420p);
        let packed = gray_frame(layout, 50);

        let depth = layout.format.depth();
        let mut planes = [
            Plane::with_stride(4, 2, 8, depth),
            Plane::with_stride(2, 1, 8, depth),
            Plane::with_stride(2, 1, 8, depth),
        ];
        for plane in &mut planes {
            plane.data_mut().fill(0xEE);
            plane.fill(50);
        }
        let padded = Frame::from_planes(layout, planes, 0);

        let hasher = FrameHasher::default();
        assert_eq!(hasher.digest(&packed), hasher.digest(&padded));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("BLAKE3".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Blake3));
        assert_eq!("sha256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }
}
