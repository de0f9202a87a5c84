// SPDX-License-Identifier: MPL-2.0
use itertools::Itertools;
use rand::{Rng, RngCore};
use std::{
    fmt::{Debug, Display},
    ops::{
        Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
        DivAssign, Index, Mul, MulAssign, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign,
        Sub, SubAssign,
    },
    str::FromStr,
};

pub mod math_algos;
pub mod math_funcs;


/// An unsigned integer of exactly `BITS` bits, stored as `BITS.div_ceil(64)`
/// words with the most significant word first. All arithmetic silently wraps
/// modulo `2^BITS`.
///
/// Different `BITS` are different types; widths can't be mixed without an
/// explicit [`BigUint::resize`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigUint<const BITS: usize> {
    /// words in big endian order, sized once at construction
    words: Box<[u64]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Error {
    #[display("invalid digit {digit:?} at position {position}, input has to be hex")]
    InvalidFormat { digit: char, position: usize },
    #[display("a value of {bits} bits doesn't fit into BigUint<{capacity}>")]
    ValueTooLarge { bits: usize, capacity: usize },
    #[display("invalid range, `from` is greater than `to`")]
    InvalidRange,
    #[display("can't divide by zero")]
    DivisionByZero,
}
impl std::error::Error for Error {}

/// The two digit bases the text form supports. A word holds 16 hex digits;
/// octal runs are chunked 8 digits per word and rendered 22 digits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Hex,
    Oct,
}
/// bit length of an ordered word sequence: the first significant word's bit
/// length plus 64 for every word after it, zero for an all-zero sequence
fn bit_len(words: &[u64]) -> usize {
    words
        .iter()
        .position(|&word| word != 0)
        .map_or(0, |first| {
            (words.len() - first) * 64 - words[first].leading_zeros() as usize
        })
}

impl Radix {
    const fn base(self) -> u32 {
        match self {
            Self::Hex => 16,
            Self::Oct => 8,
        }
    }
    const fn bits_per_digit(self) -> u32 {
        match self {
            Self::Hex => 4,
            Self::Oct => 3,
        }
    }
    /// digits consumed per word when parsing
    const fn digits_per_word(self) -> usize {
        match self {
            Self::Hex => 16,
            Self::Oct => 8,
        }
    }
}

impl<const BITS: usize> BigUint<BITS> {
    /// number of 64-bit words backing one value
    pub const WORDS: usize = BITS.div_ceil(64);
    /// valid bits of the most significant word
    const TOP_MASK: u64 = if BITS % 64 == 0 {
        u64::MAX
    } else {
        (1 << (BITS % 64)) - 1
    };

    pub fn zero() -> Self {
        Self {
            words: vec![0; Self::WORDS].into_boxed_slice(),
        }
    }
    pub fn from_u64(value: u64) -> Self {
        let mut out = Self::zero();
        if let Some(last) = out.words.last_mut() {
            *last = value;
        }
        out.mask_top();
        out
    }

    /// Builds a value from an ordered word sequence, most significant first.
    ///
    /// A sequence longer than [`Self::WORDS`] is accepted as long as every
    /// surplus high word is zero; the low-order words that fit are copied and
    /// the high side is zero padded.
    pub fn from_words(input: &[u64]) -> Result<Self, Error> {
        let too_large = Err(Error::ValueTooLarge {
            bits: bit_len(input),
            capacity: BITS,
        });
        let mut out = Self::zero();
        if input.len() > Self::WORDS {
            let surplus = input.len() - Self::WORDS;
            if input[..surplus].iter().any(|&word| word != 0) {
                return too_large;
            }
            out.words.copy_from_slice(&input[surplus..]);
        } else {
            out.words[Self::WORDS - input.len()..].copy_from_slice(input);
        }
        if out.words.first().is_some_and(|&word| word & !Self::TOP_MASK != 0) {
            return too_large;
        }
        Ok(out)
    }

    /// Parses without validating: a digit that doesn't decode in `radix`
    /// contributes zero, the way a stream extraction would. Input beyond the
    /// representable digit count is truncated by dropping trailing characters.
    pub fn from_radix(s: &str, radix: Radix) -> Self {
        let s = match radix {
            Radix::Hex => s.strip_prefix("0x").unwrap_or(s),
            Radix::Oct => s,
        };
        Self::parse_digits(s, radix)
    }

    /// digit runs are consumed right to left in word-sized chunks; a leftover
    /// partial run becomes the most significant populated word
    fn parse_digits(s: &str, radix: Radix) -> Self {
        let capacity = Self::WORDS * radix.digits_per_word();
        let digits = s.chars().take(capacity).collect_vec();

        let mut out = Self::zero();
        let mut index = Self::WORDS;
        let mut end = digits.len();
        while end > 0 && index > 0 {
            let start = end.saturating_sub(radix.digits_per_word());
            index -= 1;
            out.words[index] = digits[start..end].iter().fold(0, |acc, &c| {
                (acc << radix.bits_per_digit()) | u64::from(c.to_digit(radix.base()).unwrap_or(0))
            });
            end = start;
        }
        out.mask_top();
        out
    }

    fn mask_top(&mut self) {
        if let Some(first) = self.words.first_mut() {
            *first &= Self::TOP_MASK;
        }
    }

    // getter
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }
    /// the word sequence, most significant first
    pub fn words(&self) -> &[u64] {
        &self.words
    }
    /// whole word by word-index, `0` being the most significant
    pub fn word(&self, index: usize) -> u64 {
        self.words[index]
    }
    /// single bit by bit-index, `0` being the least significant
    pub fn bit(&self, index: usize) -> bool {
        assert!(index < BITS, "bit {index} out of range for BigUint<{BITS}>");
        (self.words[Self::WORDS - 1 - index / 64] >> (index % 64)) & 1 != 0
    }

    /// The first nonzero word scanning from the most significant end, or the
    /// least significant word of a zero value.
    ///
    /// Lossy and only meaningful for values that fit in one word; this is
    /// *not* truncation modulo `2^64`.
    pub fn to_u64_lossy(&self) -> u64 {
        self.words
            .iter()
            .copied()
            .find(|&word| word != 0)
            .unwrap_or_else(|| self.words.last().copied().unwrap_or(0))
    }

    /// Converts to another width. Widening zero-extends on the high side;
    /// narrowing fails with [`Error::ValueTooLarge`] when significant bits
    /// would be dropped.
    pub fn resize<const NEW: usize>(&self) -> Result<BigUint<NEW>, Error> {
        let mut out = BigUint::<NEW>::zero();
        if BigUint::<NEW>::WORDS >= Self::WORDS {
            out.words[BigUint::<NEW>::WORDS - Self::WORDS..].copy_from_slice(&self.words);
        } else {
            let surplus = Self::WORDS - BigUint::<NEW>::WORDS;
            if self.words[..surplus].iter().any(|&word| word != 0) {
                return Err(Error::ValueTooLarge {
                    bits: bit_len(&self.words),
                    capacity: NEW,
                });
            }
            out.words.copy_from_slice(&self.words[surplus..]);
        }
        if out.words.first().is_some_and(|&word| word & !BigUint::<NEW>::TOP_MASK != 0) {
            return Err(Error::ValueTooLarge {
                bits: bit_len(&self.words),
                capacity: NEW,
            });
        }
        Ok(out)
    }

    // math
    pub fn inc(&mut self) {
        math_algos::add::assign(self, &Self::from_u64(1));
    }
    pub fn dec(&mut self) {
        math_algos::sub::assign(self, &Self::from_u64(1));
    }

    /// computes `(self / rhs, self % rhs)` by binary long division
    pub fn div_rem(&self, rhs: &Self) -> Result<(Self, Self), Error> {
        if rhs.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(math_algos::div::long_division(self, rhs))
    }
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, Error> {
        self.div_rem(rhs).map(|(quotient, _)| quotient)
    }
    pub fn checked_rem(&self, rhs: &Self) -> Result<Self, Error> {
        self.div_rem(rhs).map(|(_, remainder)| remainder)
    }

    /// Generates a value intended to be uniform over the inclusive range
    /// `[from, to]`.
    ///
    /// A random active word count between the minimal word counts of `from`
    /// and `to` is picked; higher words stay zero, lower words are filled
    /// with full-range random words and the boundary word is drawn from the
    /// corresponding sub-range. This is an approximation: the distribution is
    /// not provably uniform, and when the boundary word lands exactly on a
    /// bound the full-range lower words can still push the result past that
    /// bound. Only the active word count is guaranteed to stay within the
    /// range's word counts.
    pub fn random_range(from: &Self, to: &Self, mut rng: impl RngCore) -> Result<Self, Error> {
        if from > to {
            return Err(Error::InvalidRange);
        }
        if to.is_zero() {
            return Ok(Self::zero());
        }
        let first_nonzero = |value: &Self| {
            Self::WORDS - value.words.iter().position(|&word| word != 0).unwrap_or(Self::WORDS)
        };
        let from_len = first_nonzero(from).max(1);
        let to_len = first_nonzero(to);

        if to_len <= 1 {
            let low = from.words[Self::WORDS - 1];
            let high = to.words[Self::WORDS - 1];
            return Ok(Self::from_u64(rng.gen_range(low..=high)));
        }

        let len = from_len + crate::util::rng::next_bound(to_len - from_len, &mut rng, None);
        let low = if len == from_len { from.to_u64_lossy() } else { 0 };
        let high = if len == to_len { to.to_u64_lossy() } else { u64::MAX };
        let (low, high) = if low <= high { (low, high) } else { (0, u64::MAX) };

        let mut out = Self::zero();
        out.words[Self::WORDS - len] = rng.gen_range(low..=high);
        for word in &mut out.words[Self::WORDS - len + 1..] {
            *word = rng.next_u64();
        }
        out.mask_top();
        Ok(out)
    }
    /// random value in `[0, to]`
    pub fn random_up_to(to: &Self, rng: impl RngCore) -> Self {
        Self::random_range(&Self::zero(), to, rng)
            .unwrap_or_else(|_| unreachable!("0 <= to always holds"))
    }

    fn write_radix(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        radix: Radix,
        upper: bool,
    ) -> std::fmt::Result {
        let Some(first) = self.words.iter().position(|&word| word != 0) else {
            return f.write_str("0");
        };
        for (i, &word) in self.words.iter().enumerate().skip(first) {
            // every word after the first significant one is zero padded to
            // the full per-word digit width to preserve positional value
            match (radix, upper, i == first) {
                (Radix::Hex, false, true) => write!(f, "{word:x}")?,
                (Radix::Hex, false, false) => write!(f, "{word:016x}")?,
                (Radix::Hex, true, true) => write!(f, "{word:X}")?,
                (Radix::Hex, true, false) => write!(f, "{word:016X}")?,
                (Radix::Oct, _, true) => write!(f, "{word:o}")?,
                (Radix::Oct, _, false) => write!(f, "{word:022o}")?,
            }
        }
        Ok(())
    }
}

impl<const BITS: usize> Default for BigUint<BITS> {
    fn default() -> Self {
        Self::zero()
    }
}
impl<const BITS: usize> From<u64> for BigUint<BITS> {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "u64CastFirstSignificant", feature = "u64CastTruncate"))] {
        compile_error!("feature \"u64CastFirstSignificant\" and feature \"u64CastTruncate\" cannot be enabled at the same time");
    } else if #[cfg(feature = "u64CastTruncate")] {
        impl<const BITS: usize> From<&BigUint<BITS>> for u64 {
            fn from(value: &BigUint<BITS>) -> Self {
                value.words.last().copied().unwrap_or(0)
            }
        }
    } else {
        impl<const BITS: usize> From<&BigUint<BITS>> for u64 {
            fn from(value: &BigUint<BITS>) -> Self {
                value.to_u64_lossy()
            }
        }
    }
}

/// Parses a hex token, the strict way: an optional `0x` prefix is stripped
/// and any remaining non-hex digit fails with [`Error::InvalidFormat`].
/// Decimal-looking input is therefore read as hex. Validation happens before
/// capacity truncation.
impl<const BITS: usize> FromStr for BigUint<BITS> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("0x").unwrap_or(s);
        let offset = s.len() - rest.len();
        if let Some((position, digit)) = rest
            .chars()
            .enumerate()
            .find(|(_, digit)| !digit.is_ascii_hexdigit())
        {
            return Err(Error::InvalidFormat {
                digit,
                position: position + offset,
            });
        }
        Ok(Self::parse_digits(rest, Radix::Hex))
    }
}

impl<const BITS: usize> Debug for BigUint<BITS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BigUint<{BITS}> {{ 0x[")?;
        for (pos, word) in self.words.iter().with_position() {
            write!(f, "{word:016x}")?;
            if matches!(
                pos,
                itertools::Position::First | itertools::Position::Middle
            ) {
                f.write_str(", ")?;
            }
        }
        write!(f, "] }}")
    }
}
/// renders hex, same as `LowerHex` without the alternate prefix
impl<const BITS: usize> Display for BigUint<BITS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_radix(f, Radix::Hex, false)
    }
}
impl<const BITS: usize> std::fmt::LowerHex for BigUint<BITS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        self.write_radix(f, Radix::Hex, false)
    }
}
impl<const BITS: usize> std::fmt::UpperHex for BigUint<BITS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "0X")?;
        }
        self.write_radix(f, Radix::Hex, true)
    }
}
impl<const BITS: usize> std::fmt::Octal for BigUint<BITS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "0o")?;
        }
        self.write_radix(f, Radix::Oct, false)
    }
}

impl<const BITS: usize> PartialOrd for BigUint<BITS> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<const BITS: usize> Ord for BigUint<BITS> {
    /// scans high to low, the first differing word decides
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for (lhs, rhs) in self.words.iter().zip(other.words.iter()) {
            let ord = lhs.cmp(rhs);
            if ord.is_ne() {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    }
}

/// word-mode access, `0` being the most significant word
impl<const BITS: usize> Index<usize> for BigUint<BITS> {
    type Output = u64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.words[index]
    }
}

macro_rules! implBigMath {
    ($assign_trait:ident, $assign_func:ident, $trait:ident, $func:ident, $algo:path) => {
        impl<const BITS: usize> $assign_trait<&Self> for BigUint<BITS> {
            fn $assign_func(&mut self, rhs: &Self) {
                $algo(self, rhs);
            }
        }
        impl<const BITS: usize> $assign_trait for BigUint<BITS> {
            fn $assign_func(&mut self, rhs: Self) {
                $algo(self, &rhs);
            }
        }
        impl<const BITS: usize> $trait for BigUint<BITS> {
            type Output = Self;
            fn $func(mut self, rhs: Self) -> Self {
                $algo(&mut self, &rhs);
                self
            }
        }
        impl<const BITS: usize> $trait<&Self> for BigUint<BITS> {
            type Output = Self;
            fn $func(mut self, rhs: &Self) -> Self {
                $algo(&mut self, rhs);
                self
            }
        }
        impl<const BITS: usize> $trait<BigUint<BITS>> for &BigUint<BITS> {
            type Output = BigUint<BITS>;
            fn $func(self, rhs: BigUint<BITS>) -> BigUint<BITS> {
                let mut out = self.clone();
                $algo(&mut out, &rhs);
                out
            }
        }
        impl<const BITS: usize> $trait<&BigUint<BITS>> for &BigUint<BITS> {
            type Output = BigUint<BITS>;
            fn $func(self, rhs: &BigUint<BITS>) -> BigUint<BITS> {
                let mut out = self.clone();
                $algo(&mut out, rhs);
                out
            }
        }
    };
}
implBigMath!(AddAssign, add_assign, Add, add, math_algos::add::assign);
implBigMath!(SubAssign, sub_assign, Sub, sub, math_algos::sub::assign);
implBigMath!(MulAssign, mul_assign, Mul, mul, math_algos::mul::assign);
implBigMath!(DivAssign, div_assign, Div, div, math_algos::div::assign);
implBigMath!(RemAssign, rem_assign, Rem, rem, math_algos::div::assign_rem);
implBigMath!(BitAndAssign, bitand_assign, BitAnd, bitand, math_algos::bit_math::bit_and_assign);
implBigMath!(BitOrAssign, bitor_assign, BitOr, bitor, math_algos::bit_math::bit_or_assign);
implBigMath!(BitXorAssign, bitxor_assign, BitXor, bitxor, math_algos::bit_math::bit_xor_assign);

macro_rules! implShift {
    ($assign_trait:ident, $assign_func:ident, $trait:ident, $func:ident, $algo:path) => {
        impl<const BITS: usize> $assign_trait<usize> for BigUint<BITS> {
            fn $assign_func(&mut self, rhs: usize) {
                $algo(self, rhs);
            }
        }
        impl<const BITS: usize> $trait<usize> for BigUint<BITS> {
            type Output = Self;
            fn $func(mut self, rhs: usize) -> Self {
                $algo(&mut self, rhs);
                self
            }
        }
        impl<const BITS: usize> $trait<usize> for &BigUint<BITS> {
            type Output = BigUint<BITS>;
            fn $func(self, rhs: usize) -> BigUint<BITS> {
                let mut out = self.clone();
                $algo(&mut out, rhs);
                out
            }
        }
    };
}
implShift!(ShlAssign, shl_assign, Shl, shl, math_algos::shift::shl_assign);
implShift!(ShrAssign, shr_assign, Shr, shr, math_algos::shift::shr_assign);

impl<const BITS: usize> Not for BigUint<BITS> {
    type Output = Self;
    fn not(mut self) -> Self {
        math_algos::bit_math::not_assign(&mut self);
        self
    }
}
impl<const BITS: usize> Not for &BigUint<BITS> {
    type Output = BigUint<BITS>;
    fn not(self) -> BigUint<BITS> {
        let mut out = self.clone();
        math_algos::bit_math::not_assign(&mut out);
        out
    }
}
