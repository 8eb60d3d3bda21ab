//! End-to-end tests for crawling, storage and prompt augmentation

mod augment_tests;
mod common;
mod crawl_tests;
mod store_tests;
