pub mod fixtures;

mod unit_tests;
