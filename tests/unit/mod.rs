//! Unit test modules.

mod summary_test;
mod targets_test;
mod title_test;
mod tokens_test;
mod zones_test;
