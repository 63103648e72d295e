pub(crate) mod max_threads;
