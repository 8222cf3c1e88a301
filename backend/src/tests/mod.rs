pub mod common;

mod hello_routes_test;
