use crate::numeric::bitop::Msb;

/// Number of worker threads used to split polynomial work.
///
/// With the `multithreading` feature this is the machine's core count rounded down to a power
/// of two, so that domain sizes divide evenly between threads. Without it, one.
pub(crate) fn compute_num_threads() -> usize {
    #[cfg(feature = "multithreading")]
    let num_threads: usize = num_cpus::get().max(1);
    #[cfg(not(feature = "multithreading"))]
    let num_threads: usize = 1;

    1 << num_threads.get_msb()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_count_is_power_of_two() {
        let n = compute_num_threads();
        assert!(n.is_power_of_two());
        #[cfg(not(feature = "multithreading"))]
        assert_eq!(n, 1);
    }
}
