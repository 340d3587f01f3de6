use std::fmt::Display;

use anyhow::{Context, Result};

/// Reports a fatal condition and terminates the process.
pub fn fatal(msg: impl Display) -> ! {
    log::error!("fatal: {msg}");
    // The log filter may drop the record above.
    eprintln!("fatal: {msg}");
    std::process::exit(1)
}

/// Memory reserved up front for the lifetime of the process.
pub struct MemoryPool {
    buf: Vec<u8>,
}

impl MemoryPool {
    pub fn reserve(bytes: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes)
            .with_context(|| format!("Not enough memory free; could not reserve {bytes} bytes"))?;
        Ok(Self { buf })
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserves_requested_capacity() {
        let pool = MemoryPool::reserve(64 * 1024).unwrap();
        assert!(pool.capacity() >= 64 * 1024);
    }

    #[test]
    fn impossible_reservation_fails_with_context() {
        let err = MemoryPool::reserve(usize::MAX).err().unwrap();
        assert!(err.to_string().starts_with("Not enough memory free"));
    }
}
