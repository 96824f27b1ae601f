//! Board tests, one file per area: perft node counts, draw rules,
//! make/unmake symmetry, rule edge cases and randomized properties.

mod perft;
