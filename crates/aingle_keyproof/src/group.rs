//! Prime-order subgroup of a safe-prime multiplicative group
//!
//! For a safe prime `p = 2q + 1` the quadratic residues modulo `p` form a
//! subgroup of prime order `q`. Both generators are derived by hashing into
//! `Z_p` and squaring, so no party knows the discrete log of `h` to base `g`.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{KeyproofError, Result};
use crate::lookup::BaseLookup;
use crate::names::Handle;

/// Oakley group 2 prime from RFC 2409, little-endian 32-bit digits
const OAKLEY_GROUP_2: [u32; 32] = [
    0xffffffff, 0xffffffff, 0xece65381, 0x49286651, 0x7c4b1fe6, 0xae9f2411, 0x5a899fa5, 0xee386bfb,
    0xf406b7ed, 0x0bff5cb6, 0xa637ed6b, 0xf44c42e9, 0x625e7ec6, 0xe485b576, 0x6d51c245, 0x4fe1356d,
    0xf25f1437, 0x302b0a6d, 0xcd3a431b, 0xef9519b3, 0x8e3404dd, 0x514a0879, 0x3b139b22, 0x020bbea6,
    0x8a67cc74, 0x29024e08, 0x80dc1cd1, 0xc4c6628b, 0x2168c234, 0xc90fdaa2, 0xffffffff, 0xffffffff,
];

const BASE_DOMAIN: &[u8] = b"aingle_keyproof_group_base";

/// Algebraic group the proofs run in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    modulus: BigUint,
    order: BigUint,
    order_signed: BigInt,
    g: BigUint,
    h: BigUint,
}

impl Group {
    /// Build the group for a safe prime `p`
    ///
    /// Primality is the caller's responsibility; only the shape of `p` is
    /// checked here.
    pub fn from_safe_prime(p: BigUint) -> Result<Self> {
        if p <= BigUint::from(7u32) {
            return Err(KeyproofError::InvalidGroup("modulus too small".into()));
        }
        if p.mod_floor(&BigUint::from(4u32)) != BigUint::from(3u32) {
            return Err(KeyproofError::InvalidGroup(
                "a safe prime greater than 7 is 3 mod 4".into(),
            ));
        }
        Ok(Self::build(p))
    }

    /// 1024-bit Oakley group 2 (RFC 2409)
    pub fn rfc2409_1024() -> Self {
        Self::build(BigUint::from_slice(&OAKLEY_GROUP_2))
    }

    fn build(modulus: BigUint) -> Self {
        let order: BigUint = (&modulus - BigUint::one()) >> 1;
        let g = derive_base(&modulus, b"g");
        let h = derive_base(&modulus, b"h");
        Self {
            order_signed: BigInt::from(order.clone()),
            modulus,
            order,
            g,
            h,
        }
    }

    /// The modulus `p`
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The order bound `q = (p - 1) / 2`
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Bit length of the order bound
    pub fn order_bits(&self) -> u64 {
        self.order.bits()
    }

    /// Generator `g`
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Generator `h`
    pub fn h(&self) -> &BigUint {
        &self.h
    }

    /// Reduce an integer into `[0, q)`
    pub fn order_mod(&self, value: &BigInt) -> BigInt {
        value.mod_floor(&self.order_signed)
    }

    /// `base^exponent mod p` for any signed exponent
    ///
    /// The exponent is reduced modulo `q`, which is exact for elements of
    /// the subgroup.
    pub fn exp(&self, base: &BigUint, exponent: &BigInt) -> BigUint {
        let reduced = self.order_mod(exponent);
        base.modpow(reduced.magnitude(), &self.modulus)
    }

    /// `a * b mod p`
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Check that `element` lies in the order-`q` subgroup
    pub fn contains(&self, element: &BigUint) -> bool {
        !element.is_zero()
            && *element < self.modulus
            && element.modpow(&self.order, &self.modulus).is_one()
    }
}

impl BaseLookup for Group {
    fn base(&self, handle: Handle) -> Option<&BigUint> {
        match handle {
            Handle::G => Some(&self.g),
            Handle::H => Some(&self.h),
            _ => None,
        }
    }
}

/// Hash `label` into `Z_p` and square into the residue subgroup
fn derive_base(modulus: &BigUint, label: &[u8]) -> BigUint {
    // 16 extra bytes keep the reduction close to uniform
    let len = (modulus.bits() as usize).div_ceil(8) + 16;
    let mut counter = 0u32;
    loop {
        let mut hasher = blake3::Hasher::new();
        hasher.update(BASE_DOMAIN);
        hasher.update(label);
        hasher.update(&modulus.to_bytes_be());
        hasher.update(&counter.to_le_bytes());
        let mut bytes = vec![0u8; len];
        hasher.finalize_xof().fill(&mut bytes);

        let x = BigUint::from_bytes_be(&bytes) % modulus;
        let base = (&x * &x) % modulus;
        if base > BigUint::one() {
            return base;
        }
        counter += 1;
    }
}
