// from http://supertech.csail.mit.edu/papers/debruijn.pdf
const MULTIPLY_DE_BRUIJN_BIT_POSITION: [u8; 32] = [
    0, 9, 1, 10, 13, 21, 2, 29, 11, 14, 16, 18, 22, 25, 3, 30, 8, 12, 20, 28, 15, 17, 24, 7, 19,
    27, 23, 6, 26, 5, 4, 31,
];

const DE_BRUIJN_SEQUENCE: [u8; 64] = [
    0, 47, 1, 56, 48, 27, 2, 60, 57, 49, 41, 37, 28, 16, 3, 61, 54, 58, 35, 52, 50, 42, 21, 44,
    38, 32, 29, 23, 17, 11, 4, 62, 46, 55, 26, 59, 40, 36, 15, 53, 34, 51, 20, 43, 31, 22, 10, 45,
    25, 39, 14, 33, 19, 30, 9, 24, 13, 18, 8, 12, 7, 6, 5, 63,
];

fn get_msb32(in_val: u32) -> u32 {
    let mut v = in_val;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;

    MULTIPLY_DE_BRUIJN_BIT_POSITION[(v.wrapping_mul(0x07C4_ACDD) >> 27) as usize] as u32
}

fn get_msb64(in_val: u64) -> u64 {
    let mut t = in_val;
    t |= t >> 1;
    t |= t >> 2;
    t |= t >> 4;
    t |= t >> 8;
    t |= t >> 16;
    t |= t >> 32;

    DE_BRUIJN_SEQUENCE[(t.wrapping_mul(0x03F7_9D71_B4CB_0A89) >> 58) as usize] as u64
}

/// Index of the most significant set bit. Zero maps to zero.
pub trait Msb {
    /// Position of the highest set bit.
    fn get_msb(self) -> Self;
}

impl Msb for u32 {
    fn get_msb(self) -> Self {
        get_msb32(self)
    }
}

impl Msb for u64 {
    fn get_msb(self) -> Self {
        get_msb64(self)
    }
}

impl Msb for usize {
    fn get_msb(self) -> Self {
        get_msb64(self as u64) as usize
    }
}

/// Smallest power of two that is `>= value`, with `round_up_power_2(0) == 1`.
pub fn round_up_power_2(value: usize) -> usize {
    if value <= 1 {
        return 1;
    }
    let msb = value.get_msb();
    if (1usize << msb) == value {
        value
    } else {
        1usize << (msb + 1)
    }
}
