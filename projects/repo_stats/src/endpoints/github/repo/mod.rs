pub mod read_all;
