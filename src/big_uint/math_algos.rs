//! The word-level algorithms. Everything here operates on whole values and
//! keeps the top-word mask invariant intact; wrapping modulo `2^BITS` falls
//! out of that.
use super::BigUint;

pub mod add {
    use super::BigUint;

    /// calculates `lhs` += `rhs`, wrapping modulo `2^BITS`
    ///
    /// words are processed least to most significant with a double-width
    /// accumulator; the high half of the accumulator is the carry
    pub fn assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        let mut carry = false;
        for i in (0..BigUint::<BITS>::WORDS).rev() {
            let acc = u128::from(lhs.words[i]) + u128::from(rhs.words[i]) + u128::from(carry);
            lhs.words[i] = acc as u64;
            carry = acc > u128::from(u64::MAX);
        }
        lhs.mask_top();
    }
}

pub mod sub {
    use super::BigUint;

    /// calculates `lhs` -= `rhs`, wrapping modulo `2^BITS`
    ///
    /// a word smaller than its subtrahend wraps and the borrow ripples
    /// leftward until a word absorbs it
    pub fn assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        let mut borrow = false;
        for i in (0..BigUint::<BITS>::WORDS).rev() {
            let (diff, underflow_1) = lhs.words[i].overflowing_sub(rhs.words[i]);
            let (diff, underflow_2) = diff.overflowing_sub(u64::from(borrow));
            lhs.words[i] = diff;
            borrow = underflow_1 | underflow_2;
        }
        lhs.mask_top();
    }
}

pub mod mul {
    use super::{add, shift, BigUint};

    /// binary double-and-add: add the progressively left-shifted multiplicand
    /// whenever the multiplier's low bit is set; cost is linear in the bit
    /// width
    pub fn double_and_add<const BITS: usize>(
        lhs: &BigUint<BITS>,
        rhs: &BigUint<BITS>,
    ) -> BigUint<BITS> {
        let mut out = BigUint::zero();
        let mut addend = lhs.clone();
        let mut multiplier = rhs.clone();
        while !multiplier.is_zero() {
            if multiplier.bit(0) {
                add::assign(&mut out, &addend);
            }
            shift::shl_assign(&mut addend, 1);
            shift::shr_assign(&mut multiplier, 1);
        }
        out
    }
    pub fn assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        *lhs = double_and_add(lhs, rhs);
    }
}

pub mod div {
    use super::{bit_math, shift, sub, BigUint};

    /// Computes `(lhs / rhs, lhs % rhs)` by binary long division: double a
    /// divisor copy and a quotient-bit tracker while the copy fits, then
    /// halve both, subtracting and OR-ing the tracker into the result
    /// whenever the remainder still covers the shifted divisor.
    ///
    /// The doubling loop also stops once the copy's top bit is set, so
    /// fixed-width doubling can't wrap around.
    ///
    /// `rhs` must be nonzero, the callers check.
    pub fn long_division<const BITS: usize>(
        lhs: &BigUint<BITS>,
        rhs: &BigUint<BITS>,
    ) -> (BigUint<BITS>, BigUint<BITS>) {
        debug_assert!(!rhs.is_zero(), "division by zero");
        if rhs > lhs {
            return (BigUint::zero(), lhs.clone());
        }
        if rhs == lhs {
            return (BigUint::from_u64(1), BigUint::zero());
        }

        let mut divisor = rhs.clone();
        let mut tracker = BigUint::from_u64(1);
        while divisor <= *lhs && !divisor.bit(BITS - 1) {
            shift::shl_assign(&mut divisor, 1);
            shift::shl_assign(&mut tracker, 1);
        }
        if divisor > *lhs {
            shift::shr_assign(&mut divisor, 1);
            shift::shr_assign(&mut tracker, 1);
        }

        let mut remainder = lhs.clone();
        let mut quotient = BigUint::zero();
        while !tracker.is_zero() {
            if remainder >= divisor {
                sub::assign(&mut remainder, &divisor);
                bit_math::bit_or_assign(&mut quotient, &tracker);
            }
            shift::shr_assign(&mut divisor, 1);
            shift::shr_assign(&mut tracker, 1);
        }
        (quotient, remainder)
    }
    pub fn assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        assert!(!rhs.is_zero(), "can't divide by zero");
        *lhs = long_division(lhs, rhs).0;
    }
    pub fn assign_rem<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        assert!(!rhs.is_zero(), "can't divide by zero");
        *lhs = long_division(lhs, rhs).1;
    }
}

pub mod bit_math {
    use super::BigUint;

    fn op_assign_zipped<const BITS: usize>(
        lhs: &mut BigUint<BITS>,
        rhs: &BigUint<BITS>,
        op: impl Fn(&mut u64, u64),
    ) {
        for (word, rhs) in lhs.words.iter_mut().zip(rhs.words.iter()) {
            op(word, *rhs);
        }
    }

    pub fn bit_or_assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        op_assign_zipped(lhs, rhs, |word, rhs| *word |= rhs);
    }
    pub fn bit_and_assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        op_assign_zipped(lhs, rhs, |word, rhs| *word &= rhs);
    }
    pub fn bit_xor_assign<const BITS: usize>(lhs: &mut BigUint<BITS>, rhs: &BigUint<BITS>) {
        op_assign_zipped(lhs, rhs, |word, rhs| *word ^= rhs);
    }
    pub fn not_assign<const BITS: usize>(value: &mut BigUint<BITS>) {
        for word in value.words.iter_mut() {
            *word = !*word;
        }
        value.mask_top();
    }
}

pub mod shift {
    use super::BigUint;

    /// `value` <<= `by`; shifting by the full width or more yields zero
    pub fn shl_assign<const BITS: usize>(value: &mut BigUint<BITS>, by: usize) {
        let words = BigUint::<BITS>::WORDS;
        if by >= BITS {
            value.words.fill(0);
            return;
        }
        let full = by / 64;
        let partial = by % 64;
        if full > 0 {
            for i in 0..words - full {
                value.words[i] = value.words[i + full];
            }
            value.words[words - full..].fill(0);
        }
        if partial != 0 {
            // a double-width intermediate captures the overflow, which is
            // folded into the next more significant word
            for i in 0..words {
                let wide = u128::from(value.words[i]) << partial;
                value.words[i] = wide as u64;
                if i > 0 {
                    value.words[i - 1] |= (wide >> 64) as u64;
                }
            }
        }
        value.mask_top();
    }

    /// `value` >>= `by`; shifting by the full width or more yields zero
    pub fn shr_assign<const BITS: usize>(value: &mut BigUint<BITS>, by: usize) {
        let words = BigUint::<BITS>::WORDS;
        if by >= BITS {
            value.words.fill(0);
            return;
        }
        let full = by / 64;
        let partial = by % 64;
        if full > 0 {
            for i in (full..words).rev() {
                value.words[i] = value.words[i - full];
            }
            value.words[..full].fill(0);
        }
        if partial != 0 {
            // walk from the low end so the bits shifted out of the next more
            // significant word are captured before that word is overwritten
            for i in (full..words).rev() {
                value.words[i] >>= partial;
                if i > full {
                    value.words[i] |= value.words[i - 1] << (64 - partial);
                }
            }
        }
    }
}
