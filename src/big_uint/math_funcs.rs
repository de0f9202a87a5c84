//! log2, power and factorial on top of the comparison, arithmetic and shift
//! engines.
use super::BigUint;

/// recursive halving count: `log2(n)` for `n > 1`, zero for 0 and 1
pub fn log2<const BITS: usize>(n: &BigUint<BITS>) -> BigUint<BITS> {
    if *n > BigUint::from_u64(1) {
        BigUint::from_u64(1) + log2(&(n >> 1))
    } else {
        BigUint::zero()
    }
}

/// binary exponentiation (square and multiply), wrapping modulo `2^BITS`
pub fn pow<const BITS: usize>(base: &BigUint<BITS>, exp: &BigUint<BITS>) -> BigUint<BITS> {
    let mut out = BigUint::from_u64(1);
    let mut square = base.clone();
    let mut exp = exp.clone();
    while !exp.is_zero() {
        if exp.bit(0) {
            out *= &square;
        }
        square = &square * &square;
        exp >>= 1;
    }
    out
}

/// Divide-and-conquer factorial: partial products over runs of consecutive
/// odd integers, then a left shift by `n - popcount(n)` reinstates the
/// factors of two.
///
/// `n` is taken from the least significant word; only validated for inputs
/// whose intermediate products stay representable.
pub fn factorial<const BITS: usize>(n: &BigUint<BITS>) -> BigUint<BITS> {
    let n = n.words.last().copied().unwrap_or(0);
    let mut odd_product = BigUint::from_u64(1);
    let mut out = BigUint::from_u64(1);
    odd_factorial(n, &mut odd_product, &mut out);
    out << (n - u64::from(n.count_ones())) as usize
}

fn odd_factorial<const BITS: usize>(n: u64, p: &mut BigUint<BITS>, r: &mut BigUint<BITS>) {
    if n <= 2 {
        return;
    }
    odd_factorial(n / 2, p, r);
    *p *= part_product(n / 2 + 1 + ((n / 2) & 1), n - 1 + (n & 1));
    *r *= &*p;
}

fn part_product<const BITS: usize>(n: u64, m: u64) -> BigUint<BITS> {
    if m <= n + 1 {
        return BigUint::from_u64(n);
    }
    if m == n + 2 {
        return BigUint::from_u64(n) * BigUint::from_u64(m);
    }
    let mut k = (n + m) / 2;
    if k & 1 != 1 {
        k -= 1;
    }
    part_product(n, k) * part_product(k + 2, m)
}
