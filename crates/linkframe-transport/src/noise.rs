//! Deterministic line noise for exercising error detection.

use std::io::{Read, Write};

use tracing::debug;

/// Where and how often to damage bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseConfig {
    /// Damage every N-th written byte (1-based). `0` disables noise.
    pub every: usize,
    /// Bit index (0..8) flipped in each damaged byte.
    pub bit: u8,
}

impl NoiseConfig {
    pub const fn off() -> Self {
        Self { every: 0, bit: 0 }
    }

    pub const fn flip_every(every: usize, bit: u8) -> Self {
        Self { every, bit }
    }

    pub fn is_off(&self) -> bool {
        self.every == 0
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::off()
    }
}

/// Wraps a channel and flips one bit in every N-th byte written through it.
///
/// Reads pass through untouched.
#[derive(Debug)]
pub struct NoisyStream<T> {
    inner: T,
    config: NoiseConfig,
    written: usize,
    flipped: usize,
}

impl<T> NoisyStream<T> {
    pub fn new(inner: T, config: NoiseConfig) -> Self {
        Self {
            inner,
            config,
            written: 0,
            flipped: 0,
        }
    }

    /// Number of bytes damaged so far.
    pub fn flipped(&self) -> usize {
        self.flipped
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    fn damage(&self, buf: &[u8]) -> Vec<u8> {
        let mask = 1u8 << (self.config.bit % 8);
        buf.iter()
            .enumerate()
            .map(|(offset, &byte)| {
                if (self.written + offset + 1) % self.config.every == 0 {
                    byte ^ mask
                } else {
                    byte
                }
            })
            .collect()
    }
}

impl<T: Read> Read for NoisyStream<T> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: Write> Write for NoisyStream<T> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.config.is_off() {
            let n = self.inner.write(buf)?;
            self.written += n;
            return Ok(n);
        }

        let damaged = self.damage(buf);
        let n = self.inner.write(&damaged)?;
        self.flipped += damaged[..n]
            .iter()
            .zip(buf)
            .filter(|(sent, orig)| sent != orig)
            .count();
        self.written += n;
        if n > 0 {
            debug!(written = self.written, flipped = self.flipped, "noisy write");
        }
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
