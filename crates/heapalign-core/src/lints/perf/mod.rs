pub(crate) mod aligned_operator_new;
