/// bit twiddling on machine integers
pub mod bitop;
/// exact 256/512-bit unsigned arithmetic and conversions to and from the scalar field
pub mod uint256;
