pub mod big_uint;

pub use big_uint::{math_funcs, BigUint, Error, Radix};

pub type U256 = BigUint<256>;
pub type U512 = BigUint<512>;
pub type U1024 = BigUint<1024>;

mod util {
    pub mod rng;
}
