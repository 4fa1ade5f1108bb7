//! Random scalar and builtin values
//!
//! Numbers are never zero and text is never empty, so a mutator called with a
//! generated value almost always changes the state it writes.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use half::f16;
use rand::distributions::{Distribution, Standard};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::types::{BuiltinKind, ScalarKind};
use crate::value::Value;

/// Seeded source of scalar values.
#[derive(Debug, Clone)]
pub struct ScalarGenerator {
    rng: ChaCha8Rng,
    seed: u64,
    max_array_len: usize,
}

impl ScalarGenerator {
    /// A generator seeded with `seed`, or from entropy when `None`.
    ///
    /// Array lengths are drawn from `1..max_array_len`.
    pub fn new(seed: Option<u64>, max_array_len: usize) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        log::debug!("Scalar generator seeded with {}", seed);
        ScalarGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            max_array_len: max_array_len.max(2),
        }
    }

    /// Seed in use, for replaying a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn nonzero<T>(&mut self) -> T
    where
        Standard: Distribution<T>,
        T: Default + PartialEq,
    {
        loop {
            let value: T = self.rng.gen();
            if value != T::default() {
                return value;
            }
        }
    }

    pub fn random_bool(&mut self) -> bool {
        self.rng.gen()
    }

    pub fn random_i8(&mut self) -> i8 {
        self.nonzero()
    }

    pub fn random_i16(&mut self) -> i16 {
        self.nonzero()
    }

    /// Always positive.
    pub fn random_i32(&mut self) -> i32 {
        self.rng.gen_range(1..i32::MAX)
    }

    pub fn random_i64(&mut self) -> i64 {
        self.nonzero()
    }

    pub fn random_i128(&mut self) -> i128 {
        self.nonzero()
    }

    pub fn random_u8(&mut self) -> u8 {
        self.nonzero()
    }

    pub fn random_u16(&mut self) -> u16 {
        self.nonzero()
    }

    pub fn random_u32(&mut self) -> u32 {
        self.nonzero()
    }

    pub fn random_u64(&mut self) -> u64 {
        self.nonzero()
    }

    /// In `(0, 1)`.
    pub fn random_f16(&mut self) -> f16 {
        loop {
            let value = f16::from_f32(self.rng.gen::<f32>());
            if value != f16::ZERO && value < f16::ONE {
                return value;
            }
        }
    }

    /// In `(0, 1)`.
    pub fn random_f32(&mut self) -> f32 {
        self.nonzero()
    }

    /// In `(0, 1)`.
    pub fn random_f64(&mut self) -> f64 {
        self.nonzero()
    }

    /// Non-NUL, below the surrogate range.
    pub fn random_char(&mut self) -> char {
        let code = self.rng.gen_range(1u32..0xD800);
        char::from_u32(code).unwrap_or('a')
    }

    pub fn random_uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }

    /// A random UUID in its hyphenated form.
    pub fn random_text(&mut self) -> String {
        self.random_uuid().to_string()
    }

    /// Length for a generated array, in `1..max_array_len`.
    pub fn array_len(&mut self) -> usize {
        self.rng.gen_range(1..self.max_array_len)
    }

    /// Uniform index into a non-empty sequence of `len` items.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn random_duration(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(1..=u64::from(u32::MAX)))
    }

    pub fn random_path(&mut self) -> PathBuf {
        PathBuf::from(format!("/tmp/{}.txt", self.random_uuid()))
    }

    pub fn random_ip(&mut self) -> IpAddr {
        IpAddr::V4(Ipv4Addr::from(self.random_u32()))
    }

    pub fn random_socket_addr(&mut self) -> SocketAddr {
        let ip = self.random_ip();
        SocketAddr::new(ip, self.random_u16())
    }

    /// Random bytes terminated by `0xFF`.
    pub fn random_bytes(&mut self) -> Vec<u8> {
        let len = self.array_len();
        let mut bytes: Vec<u8> = (1..len).map(|_| self.rng.gen()).collect();
        bytes.push(0xFF);
        bytes
    }

    pub fn scalar(&mut self, kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Bool => Value::Bool(self.random_bool()),
            ScalarKind::I8 => Value::I8(self.random_i8()),
            ScalarKind::I16 => Value::I16(self.random_i16()),
            ScalarKind::I32 => Value::I32(self.random_i32()),
            ScalarKind::I64 => Value::I64(self.random_i64()),
            ScalarKind::I128 => Value::I128(self.random_i128()),
            ScalarKind::U8 => Value::U8(self.random_u8()),
            ScalarKind::U16 => Value::U16(self.random_u16()),
            ScalarKind::U32 => Value::U32(self.random_u32()),
            ScalarKind::U64 => Value::U64(self.random_u64()),
            ScalarKind::F16 => Value::F16(self.random_f16()),
            ScalarKind::F32 => Value::F32(self.random_f32()),
            ScalarKind::F64 => Value::F64(self.random_f64()),
            ScalarKind::Char => Value::Char(self.random_char()),
        }
    }

    /// Calendar kinds read the current clock.
    pub fn builtin(&mut self, kind: BuiltinKind) -> Value {
        match kind {
            BuiltinKind::Text => Value::Text(self.random_text()),
            BuiltinKind::Uuid => Value::Uuid(self.random_uuid()),
            BuiltinKind::Date => Value::Date(Utc::now().date_naive()),
            BuiltinKind::Time => Value::Time(Utc::now().time()),
            BuiltinKind::DateTime => Value::DateTime(Utc::now().naive_utc()),
            BuiltinKind::Timestamp => Value::Timestamp(Utc::now()),
            BuiltinKind::Duration => Value::Duration(self.random_duration()),
            BuiltinKind::Path => Value::Path(self.random_path()),
            BuiltinKind::IpAddr => Value::IpAddr(self.random_ip()),
            BuiltinKind::SocketAddr => Value::SocketAddr(self.random_socket_addr()),
            BuiltinKind::ByteStream => Value::ByteStream(self.random_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let mut a = ScalarGenerator::new(Some(7), 42);
        let mut b = ScalarGenerator::new(Some(7), 42);
        for _ in 0..20 {
            assert_eq!(a.random_i64(), b.random_i64());
            assert_eq!(a.random_text(), b.random_text());
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_numbers_are_never_zero() {
        let mut generator = ScalarGenerator::new(Some(1), 42);
        for _ in 0..1000 {
            assert!(generator.random_i32() > 0);
            assert_ne!(generator.random_u8(), 0);
            assert_ne!(generator.random_i8(), 0);
            let f = generator.random_f64();
            assert!(f > 0.0 && f < 1.0);
            let h = generator.random_f16();
            assert!(h > f16::ZERO && h < f16::ONE);
            assert_ne!(generator.random_char(), '\0');
        }
    }

    #[test]
    fn test_array_len_bounds() {
        let mut generator = ScalarGenerator::new(Some(3), 4);
        for _ in 0..200 {
            let len = generator.array_len();
            assert!((1..4).contains(&len));
        }
    }

    #[test]
    fn test_byte_stream_ends_with_marker() {
        let mut generator = ScalarGenerator::new(Some(9), 42);
        let bytes = generator.random_bytes();
        assert_eq!(bytes.last(), Some(&0xFF));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_path_is_temporary_text_file() {
        let mut generator = ScalarGenerator::new(Some(5), 42);
        let path = generator.random_path();
        let text = path.display().to_string();
        assert!(text.starts_with("/tmp/") && text.ends_with(".txt"));
    }
}
